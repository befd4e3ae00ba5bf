use serde::Serialize;

use crate::CoreError;

/// A downstream generative engine the master prompt is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetModel {
    pub id: &'static str,
    pub name: &'static str,
}

pub const TARGET_MODELS: &[TargetModel] = &[
    TargetModel {
        id: "midjourney",
        name: "Midjourney v6",
    },
    TargetModel {
        id: "sora",
        name: "OpenAI Sora",
    },
    TargetModel {
        id: "veo",
        name: "Google Veo",
    },
    TargetModel {
        id: "kling",
        name: "Kling AI",
    },
    TargetModel {
        id: "runway",
        name: "Runway Gen-3",
    },
];

/// Looks up a catalogue entry by id, case-insensitively.
///
/// # Errors
///
/// Returns [`CoreError::UnknownTargetModel`] if no entry matches.
pub fn find_target_model(id: &str) -> Result<&'static TargetModel, CoreError> {
    let wanted = id.trim();
    TARGET_MODELS
        .iter()
        .find(|m| m.id.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| CoreError::UnknownTargetModel(id.to_string()))
}
