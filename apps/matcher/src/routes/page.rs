//! HTML for the single-page upload form and its results view.

use crate::analysis::models::AnalysisResult;

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Resume Matcher</title>
<style>
body { font-family: system-ui, sans-serif; max-width: 52rem; margin: 2rem auto; padding: 0 1rem; color: #1f2933; }
form { display: grid; gap: 0.75rem; padding: 1rem; border: 1px solid #d9e2ec; border-radius: 6px; }
.error { background: #fde8e8; color: #9b1c1c; padding: 0.75rem; border-radius: 6px; }
.score { font-size: 2rem; font-weight: 600; }
pre { background: #f5f7fa; padding: 1rem; overflow-x: auto; border-radius: 6px; }
</style>
</head>
<body>
<h1>Resume Matcher</h1>
"#;

const FORM: &str = r#"<form method="post" action="/" enctype="multipart/form-data">
<label>Job description (PDF, DOCX, or TXT) <input type="file" name="job" accept=".pdf,.docx,.txt" required></label>
<label>Candidate resume (PDF, DOCX, or TXT) <input type="file" name="resume" accept=".pdf,.docx,.txt" required></label>
<button type="submit">Analyze</button>
</form>
"#;

const TAIL: &str = "</body>\n</html>\n";

/// Renders the form, an optional inline error, and an optional result.
/// `summary` and `json` are the pre-rendered report texts for `result`.
pub fn render(error: Option<&str>, result: Option<(&AnalysisResult, &str, &str)>) -> String {
    let mut html = String::from(HEAD);

    if let Some(message) = error {
        html.push_str(&format!("<p class=\"error\">{}</p>\n", escape(message)));
    }

    html.push_str(FORM);

    if let Some((result, summary, json)) = result {
        html.push_str(&format!(
            "<h2>Results</h2>\n<p class=\"score\">{}/100</p>\n",
            result.matching_score
        ));
        html.push_str(&list_section("Matched skills", &result.matched_skills));
        html.push_str(&list_section("Missing skills", &result.missing_skills));
        html.push_str(&list_section("Matched experience", &result.matched_experience));
        html.push_str(&list_section("Missing experience", &result.missing_experience));
        html.push_str(&format!(
            "<h3>Summary</h3>\n<pre>{}</pre>\n<h3>JSON</h3>\n<pre>{}</pre>\n",
            escape(summary),
            escape(json)
        ));
    }

    html.push_str(TAIL);
    html
}

fn list_section(title: &str, items: &[String]) -> String {
    let body = if items.is_empty() {
        "<p>None</p>".to_string()
    } else {
        let lis: String = items
            .iter()
            .map(|i| format!("<li>{}</li>", escape(i)))
            .collect();
        format!("<ul>{lis}</ul>")
    };
    format!("<h3>{title}</h3>\n{body}\n")
}

/// Minimal HTML escaping for text and attribute content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
