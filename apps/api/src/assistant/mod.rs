// AI assistant operations: parse, rewrite, job match, persona variants.
// All model calls go through llm_client. None of these functions touch the
// session; handlers apply results through it.

pub mod handlers;
pub mod job_match;
pub mod parse;
pub mod prompts;
pub mod rewrite;
pub mod variants;
