// Analysis: prompt building, the single LLM call, output validation and
// cost accounting. All LLM calls go through llm_client.

pub mod cost;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod validator;
