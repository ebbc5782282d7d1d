// Content assistance: analysis and generation against a session's style guide.
// All LLM calls go through llm_client, never to Anthropic directly.

pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod service;
pub mod session;
