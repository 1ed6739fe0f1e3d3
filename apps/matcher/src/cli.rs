use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "matcher",
    version,
    about = "Analyze a candidate's resume against a job description using an LLM"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare one resume against one job description
    Analyze {
        /// Path to the job description file (PDF, DOCX, or TXT)
        #[arg(long)]
        job: PathBuf,
        /// Path to the candidate resume file (PDF, DOCX, or TXT)
        #[arg(long)]
        resume: PathBuf,
        /// Path to save the output JSON file (overwritten if present)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Serve the upload form over HTTP
    Serve {
        /// Port to listen on (default: PORT env or 8080)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_requires_job_and_resume() {
        assert!(Cli::try_parse_from(["matcher", "analyze", "--job", "j.txt"]).is_err());
        let cli = Cli::try_parse_from([
            "matcher", "analyze", "--job", "j.txt", "--resume", "r.pdf", "-o", "out.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze { job, resume, output } => {
                assert_eq!(job, PathBuf::from("j.txt"));
                assert_eq!(resume, PathBuf::from("r.pdf"));
                assert_eq!(output, Some(PathBuf::from("out.json")));
            }
            Commands::Serve { .. } => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_serve_port_optional() {
        let cli = Cli::try_parse_from(["matcher", "serve"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: None }));
    }
}
