//! Structured description supplied by the client

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A single garment, described by color and type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingItem {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub r#type: Option<String>,
}

impl ClothingItem {
    pub fn new(color: Option<&str>, kind: Option<&str>) -> Self {
        Self {
            color: color.map(str::to_string),
            r#type: kind.map(str::to_string),
        }
    }

    /// "color type", skipping whichever part is blank. `None` when both are.
    pub fn describe(&self) -> Option<String> {
        let parts: Vec<&str> = [present(&self.color), present(&self.r#type)]
            .into_iter()
            .flatten()
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Demographic, styling and clothing attributes for one request.
///
/// Every field is optional. Blank strings are treated the same as missing
/// fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionInput {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub ethnicity: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub body_type: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,

    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub occasion: Option<String>,

    #[serde(default)]
    pub top: Option<ClothingItem>,
    #[serde(default)]
    pub bottom: Option<ClothingItem>,
    #[serde(default)]
    pub accessories: Option<ClothingItem>,
    #[serde(default)]
    pub footwear: Option<ClothingItem>,

    #[serde(default)]
    pub eyes: Option<String>,
    #[serde(default)]
    pub hair: Option<String>,

    /// Free text appended to the generation prompt
    #[serde(default)]
    pub additional_context: Option<String>,
}

impl DescriptionInput {
    /// Names of the model-related fields that carry a value
    pub fn populated_demographics(&self) -> Vec<&'static str> {
        [
            ("gender", &self.gender),
            ("ethnicity", &self.ethnicity),
            ("age", &self.age),
            ("body_type", &self.body_type),
            ("mood", &self.mood),
        ]
        .into_iter()
        .filter(|(_, value)| present(value).is_some())
        .map(|(name, _)| name)
        .collect()
    }

    /// Rejects model-related fields, which conflict with a supplied subject image
    pub fn ensure_no_demographics(&self) -> Result<()> {
        let populated = self.populated_demographics();
        if populated.is_empty() {
            return Ok(());
        }

        Err(AppError::Validation(format!(
            "Model-related inputs are not accepted when a reference image is provided: {}",
            populated.join(", ")
        )))
    }
}

/// Body of the `user_request` form field
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TryOnRequest {
    pub user_input: DescriptionInput,
}

/// Trimmed value of an optional field, `None` if missing or blank
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
