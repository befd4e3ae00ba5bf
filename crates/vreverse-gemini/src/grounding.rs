//! Citation extraction from search-grounding metadata.

use vreverse_core::GroundingSource;

use crate::types::GroundingMetadata;

/// Converts web grounding chunks into citations, preserving provider order.
///
/// Chunks without a `web` reference or with a blank URI are skipped. A
/// missing or blank title falls back to the URI.
#[must_use]
pub fn sources_from_metadata(metadata: &GroundingMetadata) -> Vec<GroundingSource> {
    metadata
        .grounding_chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| {
            let uri = web.uri.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
            let title = web
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(uri);
            Some(GroundingSource {
                title: title.to_string(),
                uri: uri.to_string(),
            })
        })
        .collect()
}
