//! Validation for the `[generation]` section.

use crate::schema::Web3ChatConfig;

use super::helpers::check_range;

pub(crate) fn validate_generation(errors: &mut Vec<String>, config: &Web3ChatConfig) {
    let generation = &config.generation;

    if generation.model.trim().is_empty() {
        errors.push("generation.model must not be empty".into());
    }
    check_range(
        errors,
        "generation.temperature",
        generation.temperature,
        0.0..=2.0,
    );
    check_range(errors, "generation.max_tokens", generation.max_tokens, 1..=32768);
}
