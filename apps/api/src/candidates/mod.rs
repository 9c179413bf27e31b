// Candidates: resume intake and AI profile extraction.
// Extraction goes through llm_client::TextGenerator like every other AI call.

pub mod extraction;
pub mod handlers;
pub mod prompts;
