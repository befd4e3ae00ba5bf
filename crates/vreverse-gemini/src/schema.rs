//! Structured-output schema declared to the provider.
//!
//! Uses the OpenAPI subset Gemini accepts (`OBJECT`, `STRING`, `ARRAY`,
//! `required`). It covers every [`AnalysisResult`](vreverse_core::AnalysisResult)
//! field except `groundingSources`, which is filled locally from metadata.

use serde_json::{json, Value};

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn social_kit() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "titleWithHashtags": string(),
            "titlePlain": string(),
            "descriptionWithHashtags": string(),
            "descriptionPlain": string(),
            "hashtags": { "type": "ARRAY", "items": string() },
            "hook": string(),
            "sfxDirection": string()
        },
        "required": [
            "titleWithHashtags",
            "titlePlain",
            "descriptionWithHashtags",
            "descriptionPlain",
            "hashtags",
            "hook",
            "sfxDirection"
        ]
    })
}

fn thumbnail_blueprint() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "prompt": string(),
            "visualComposition": string()
        },
        "required": ["prompt", "visualComposition"]
    })
}

fn viral_variations() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "type": string(),
                "title": string(),
                "strategy": string(),
                "fullModifiedPrompt": string()
            },
            "required": ["type", "title", "strategy", "fullModifiedPrompt"]
        }
    })
}

/// The full response schema.
#[must_use]
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "subjectDNA": string(),
            "styleDNA": string(),
            "environmentDNA": string(),
            "fullMasterPrompt": string(),
            "socialKit": social_kit(),
            "thumbnailBlueprint": thumbnail_blueprint(),
            "viralVariations": viral_variations(),
            "negativePrompt": string()
        },
        "required": [
            "subjectDNA",
            "styleDNA",
            "environmentDNA",
            "fullMasterPrompt",
            "socialKit",
            "thumbnailBlueprint",
            "viralVariations",
            "negativePrompt"
        ]
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use vreverse_core::{AnalysisResult, SocialKit, ThumbnailBlueprint, ViralVariation};

    use super::*;

    fn keys(value: &Value) -> BTreeSet<String> {
        value
            .as_object()
            .expect("object")
            .keys()
            .cloned()
            .collect()
    }

    fn required(schema: &Value) -> BTreeSet<String> {
        schema["required"]
            .as_array()
            .expect("required array")
            .iter()
            .map(|v| v.as_str().expect("string").to_string())
            .collect()
    }

    fn sample() -> AnalysisResult {
        AnalysisResult {
            subject_dna: String::new(),
            style_dna: String::new(),
            environment_dna: String::new(),
            full_master_prompt: String::new(),
            social_kit: SocialKit {
                title_with_hashtags: String::new(),
                title_plain: String::new(),
                description_with_hashtags: String::new(),
                description_plain: String::new(),
                hashtags: vec![],
                hook: String::new(),
                sfx_direction: String::new(),
            },
            thumbnail_blueprint: ThumbnailBlueprint {
                prompt: String::new(),
                visual_composition: String::new(),
            },
            viral_variations: vec![ViralVariation {
                kind: String::new(),
                title: String::new(),
                strategy: String::new(),
                full_modified_prompt: String::new(),
            }],
            negative_prompt: String::new(),
            grounding_sources: None,
        }
    }

    #[test]
    fn schema_properties_match_result_fields() {
        let schema = response_schema();
        let serialized = serde_json::to_value(sample()).unwrap();

        assert_eq!(keys(&schema["properties"]), keys(&serialized));
        assert_eq!(required(&schema), keys(&serialized));
    }

    #[test]
    fn nested_schemas_match_nested_fields() {
        let schema = response_schema();
        let serialized = serde_json::to_value(sample()).unwrap();

        for field in ["socialKit", "thumbnailBlueprint"] {
            let nested = &schema["properties"][field];
            assert_eq!(keys(&nested["properties"]), keys(&serialized[field]));
            assert_eq!(required(nested), keys(&serialized[field]));
        }

        let item = &schema["properties"]["viralVariations"]["items"];
        assert_eq!(
            keys(&item["properties"]),
            keys(&serialized["viralVariations"][0])
        );
        assert_eq!(required(item), keys(&serialized["viralVariations"][0]));
    }

    #[test]
    fn hashtags_are_an_array_of_strings() {
        let schema = response_schema();
        let hashtags = &schema["properties"]["socialKit"]["properties"]["hashtags"];
        assert_eq!(hashtags["type"], "ARRAY");
        assert_eq!(hashtags["items"]["type"], "STRING");
    }
}
