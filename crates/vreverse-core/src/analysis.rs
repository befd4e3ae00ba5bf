//! Analysis request and result contract.
//!
//! [`AnalysisResult`] mirrors the JSON document the model is constrained to
//! produce. Field names on the wire are the camelCase names of the response
//! schema (`subjectDNA`, `socialKit`, ...); every field except
//! `groundingSources` is required when deserializing.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Upper bound for the percentage knobs.
pub const MAX_PERCENT: u8 = 100;

/// Caller-supplied knobs interpolated into the instruction text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// How literal the reconstruction should be, 0–100.
    pub fidelity: u8,
    /// How technical the master prompt should be, 0–100.
    pub detail_level: u8,
    /// Free-form base style label, e.g. `"Cinematic Hyper-Realism"`.
    pub prompt_style: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fidelity: 95,
            detail_level: 90,
            prompt_style: "Cinematic Hyper-Realism".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Builds a validated config.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if a percentage exceeds 100 or the
    /// style is blank.
    pub fn new(
        fidelity: u8,
        detail_level: u8,
        prompt_style: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let config = Self {
            fidelity,
            detail_level,
            prompt_style: prompt_style.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the percentage bounds and that a style label is present.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] describing the first violation.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.fidelity > MAX_PERCENT {
            return Err(CoreError::InvalidConfig(format!(
                "fidelity must be between 0 and {MAX_PERCENT}, got {}",
                self.fidelity
            )));
        }
        if self.detail_level > MAX_PERCENT {
            return Err(CoreError::InvalidConfig(format!(
                "detail level must be between 0 and {MAX_PERCENT}, got {}",
                self.detail_level
            )));
        }
        if self.prompt_style.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "prompt style must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    File,
    Url,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::File => write!(f, "file"),
            InputKind::Url => write!(f, "url"),
        }
    }
}

/// The media to analyze: raw bytes with their mime type, or a URL the model
/// has to research on its own.
#[derive(Clone, PartialEq, Eq)]
pub enum MediaInput {
    File { bytes: Vec<u8>, mime_type: String },
    Url { url: String },
}

impl std::fmt::Debug for MediaInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaInput::File { bytes, mime_type } => f
                .debug_struct("File")
                .field("len", &bytes.len())
                .field("mime_type", mime_type)
                .finish(),
            MediaInput::Url { url } => f.debug_struct("Url").field("url", url).finish(),
        }
    }
}

impl MediaInput {
    #[must_use]
    pub fn kind(&self) -> InputKind {
        match self {
            MediaInput::File { .. } => InputKind::File,
            MediaInput::Url { .. } => InputKind::Url,
        }
    }

    /// Rejects empty payloads before anything is sent upstream.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] for empty bytes, a blank mime type,
    /// or a blank URL.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            MediaInput::File { bytes, mime_type } => {
                if bytes.is_empty() {
                    return Err(CoreError::InvalidInput("file is empty".to_string()));
                }
                if mime_type.trim().is_empty() {
                    return Err(CoreError::InvalidInput(
                        "file mime type is missing".to_string(),
                    ));
                }
            }
            MediaInput::Url { url } => {
                if url.trim().is_empty() {
                    return Err(CoreError::InvalidInput("url is empty".to_string()));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(rename = "subjectDNA")]
    pub subject_dna: String,
    #[serde(rename = "styleDNA")]
    pub style_dna: String,
    #[serde(rename = "environmentDNA")]
    pub environment_dna: String,
    pub full_master_prompt: String,
    pub social_kit: SocialKit,
    pub thumbnail_blueprint: ThumbnailBlueprint,
    pub viral_variations: Vec<ViralVariation>,
    pub negative_prompt: String,
    /// Citations from retrieval; only present for URL inputs that produced any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_sources: Option<Vec<GroundingSource>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialKit {
    pub title_with_hashtags: String,
    pub title_plain: String,
    pub description_with_hashtags: String,
    pub description_plain: String,
    pub hashtags: Vec<String>,
    pub hook: String,
    pub sfx_direction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailBlueprint {
    pub prompt: String,
    pub visual_composition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViralVariation {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub strategy: String,
    pub full_modified_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}
