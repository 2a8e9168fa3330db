// Recommendation engine: profile normalization, scoring, ranking and explanations.
// All text generation goes through llm_client, no direct API calls here.

pub mod explanation;
pub mod geo;
pub mod handlers;
pub mod profile;
pub mod prompts;
pub mod scorer;
pub mod weights;
