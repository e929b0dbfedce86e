// The analysis pipeline: prompt construction, response normalization and the
// orchestrator that ties extraction, the model call and persistence together.
// All model calls go through llm_client — no direct provider calls here.

pub mod handlers;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
