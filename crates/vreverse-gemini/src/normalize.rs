//! Turns the model's JSON text into an [`AnalysisResult`].

use vreverse_core::AnalysisResult;

use crate::error::AnalysisError;
use crate::grounding::sources_from_metadata;
use crate::types::GroundingMetadata;

/// Parses `raw_text` strictly and attaches citations from `metadata`.
///
/// Any `groundingSources` the model wrote itself are discarded: citations
/// only ever come from provider metadata. The field is left `None` when no
/// usable web source exists.
///
/// # Errors
///
/// Returns [`AnalysisError::MalformedResponse`] when the text is not JSON or
/// lacks a required field.
pub fn normalize(
    raw_text: &str,
    metadata: Option<&GroundingMetadata>,
) -> Result<AnalysisResult, AnalysisError> {
    let mut result: AnalysisResult = serde_json::from_str(raw_text.trim())
        .map_err(|e| AnalysisError::malformed("model output", e.to_string()))?;

    result.grounding_sources = metadata
        .map(sources_from_metadata)
        .filter(|sources| !sources.is_empty());

    Ok(result)
}
