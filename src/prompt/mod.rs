//! Prompt composition - turns a structured description into instructions
//! for the image backend

pub mod clauses;
pub mod input;

pub use input::{ClothingItem, DescriptionInput, TryOnRequest};

use tracing::debug;

/// Prompt for generating a new model wearing the described outfit
pub fn compose_model_prompt(input: &DescriptionInput) -> String {
    let prompt = clauses::render(clauses::MODEL_CLAUSES, input);
    debug!(prompt = %prompt, "Composed model prompt");
    prompt
}

/// Prompt for changing only the clothing on a reference image
pub fn compose_edit_prompt(input: &DescriptionInput) -> String {
    let prompt = clauses::render(clauses::EDIT_CLAUSES, input);
    debug!(prompt = %prompt, "Composed edit prompt");
    prompt
}
