// Bark analysis: model classification of an audio clip, validation of the
// model's output, persistence of results, and per-dog aggregates.
// All model calls go through llm_client via the BarkClassifier trait.

pub mod analyzer;
pub mod audio_format;
pub mod clips;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod stats;
pub mod store;
pub mod validation;
