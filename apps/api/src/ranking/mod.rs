// Candidate-to-job matching and ranking.
// Skill matching and scoring are pure; recommendation text and persistence
// sit behind traits so the engine can run against stubs.

pub mod engine;
pub mod handlers;
pub mod prompts;
pub mod recommendation;
pub mod score;
pub mod skills;
pub mod store;
