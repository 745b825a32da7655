//! Ordered clause tables for the two prompt kinds.
//!
//! Each clause renders to `Some(text)` when it applies to the input and to
//! `None` when it is skipped. Tables are evaluated top to bottom, so their
//! order is the order of sentences in the final prompt.

use super::input::{present, ClothingItem, DescriptionInput};

/// One step of a prompt
pub struct Clause {
    pub name: &'static str,
    /// Separator placed before this clause when it is not the first
    pub lead: &'static str,
    pub render: fn(&DescriptionInput) -> Option<String>,
}

const fn sentence(name: &'static str, render: fn(&DescriptionInput) -> Option<String>) -> Clause {
    Clause {
        name,
        lead: " ",
        render,
    }
}

/// Clauses for generating a new model image
pub const MODEL_CLAUSES: &[Clause] = &[
    sentence("subject", subject),
    sentence("ethnicity", ethnicity),
    sentence("age", age),
    sentence("build", build),
    sentence("mood", mood),
    sentence("style", style),
    sentence("setting", setting),
    sentence("pose", pose),
    sentence("top", model_top),
    sentence("bottom", model_bottom),
    sentence("accessories", model_accessories),
    sentence("footwear", model_footwear),
    sentence("eyes", eyes),
    sentence("hair", hair),
    Clause {
        name: "additional_context",
        lead: "\n\n",
        render: additional_context,
    },
];

/// Clauses for changing the clothing on a reference image
pub const EDIT_CLAUSES: &[Clause] = &[
    sentence("preserve_subject", preserve_subject),
    sentence("top", edit_top),
    sentence("bottom", edit_bottom),
    sentence("accessories", edit_accessories),
    sentence("footwear", edit_footwear),
];

/// Render a clause table against an input
pub fn render(clauses: &[Clause], input: &DescriptionInput) -> String {
    let mut prompt = String::new();

    for clause in clauses {
        if let Some(text) = (clause.render)(input) {
            if !prompt.is_empty() {
                prompt.push_str(clause.lead);
            }
            prompt.push_str(&text);
        }
    }

    prompt
}

fn garment(item: &Option<ClothingItem>) -> Option<String> {
    item.as_ref().and_then(ClothingItem::describe)
}

fn subject(input: &DescriptionInput) -> Option<String> {
    Some(match present(&input.gender) {
        Some(gender) => format!("Create a high-fashion image of a {} model.", gender),
        None => "Create a high-fashion image of a model.".to_string(),
    })
}

fn ethnicity(input: &DescriptionInput) -> Option<String> {
    present(&input.ethnicity).map(|e| format!("The model has {} features.", e))
}

fn age(input: &DescriptionInput) -> Option<String> {
    present(&input.age).map(|a| format!("The model is in their {} years.", a))
}

fn build(input: &DescriptionInput) -> Option<String> {
    Some(match present(&input.body_type) {
        Some(body_type) => format!("The model has a {} build.", body_type),
        None => "The model has an elegant build.".to_string(),
    })
}

fn mood(input: &DescriptionInput) -> Option<String> {
    Some(match present(&input.mood) {
        Some(mood) => format!("The model should be styled with {} expressions.", mood),
        None => "The model should exude confidence and grace.".to_string(),
    })
}

fn style(input: &DescriptionInput) -> Option<String> {
    present(&input.style).map(|s| format!("The model has a {} fashion sense.", s))
}

fn setting(input: &DescriptionInput) -> Option<String> {
    Some(match present(&input.occasion) {
        Some(occasion) => format!(
            "The background should be realistic and sophisticated, matching the occasion of {}.",
            occasion
        ),
        None => "The background should be an elegant, neutral setting.".to_string(),
    })
}

fn pose(_: &DescriptionInput) -> Option<String> {
    Some(
        "The model should be posed in a front-facing full-body stance, showcasing the outfit \
         from head to toe, with a natural, confident posture."
            .to_string(),
    )
}

fn model_top(input: &DescriptionInput) -> Option<String> {
    garment(&input.top).map(|g| {
        format!(
            "The model is wearing a {} top, with refined details and high-quality fabric.",
            g
        )
    })
}

fn model_bottom(input: &DescriptionInput) -> Option<String> {
    garment(&input.bottom)
        .map(|g| format!("Paired with {} bottoms that emphasize both comfort and luxury.", g))
}

fn model_accessories(input: &DescriptionInput) -> Option<String> {
    garment(&input.accessories).map(|g| {
        format!(
            "Complete the look with {} accessories, adding an extra touch of elegance.",
            g
        )
    })
}

fn model_footwear(input: &DescriptionInput) -> Option<String> {
    garment(&input.footwear).map(|g| {
        format!(
            "The footwear is {}, designed to complement the outfit's overall aesthetic.",
            g
        )
    })
}

fn eyes(input: &DescriptionInput) -> Option<String> {
    present(&input.eyes).map(|e| format!("The model's eyes are {}.", e))
}

fn hair(input: &DescriptionInput) -> Option<String> {
    present(&input.hair).map(|h| format!("Their hair is styled in a {} fashion.", h))
}

fn additional_context(input: &DescriptionInput) -> Option<String> {
    present(&input.additional_context).map(|c| format!("Additional details: {}", c))
}

fn preserve_subject(_: &DescriptionInput) -> Option<String> {
    Some(
        "Modify the clothing of the person in the provided reference image. \
         Keep the person's face, hair, body shape, pose, and overall appearance exactly the same. \
         Only change the clothing items as described below:"
            .to_string(),
    )
}

fn edit_top(input: &DescriptionInput) -> Option<String> {
    garment(&input.top).map(|g| format!("Change the top to a {}.", g))
}

fn edit_bottom(input: &DescriptionInput) -> Option<String> {
    garment(&input.bottom).map(|g| format!("Change the bottoms to {}.", g))
}

fn edit_accessories(input: &DescriptionInput) -> Option<String> {
    garment(&input.accessories).map(|g| format!("Add {} accessories.", g))
}

fn edit_footwear(input: &DescriptionInput) -> Option<String> {
    garment(&input.footwear).map(|g| format!("Change the footwear to {}.", g))
}
