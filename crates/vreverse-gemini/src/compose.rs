//! Request composition: instruction text, multimodal parts, schema, tools.
//!
//! Everything here is deterministic and infallible. Semantic demands made in
//! the instruction (word counts, five archetypes) are requests to the model,
//! not checks performed locally.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use vreverse_core::{AnalysisConfig, MediaInput};

use crate::schema::response_schema;
use crate::types::{
    Content, GenerateContentRequest, GenerationConfig, GoogleSearch, InlineData, Part, Tool,
};

/// The five variation archetypes, in the order the model must emit them.
pub const VARIATION_ARCHETYPES: [(&str, &str); 5] = [
    (
        "Atmospheric Weight",
        "slightly enhance volumetrics, haze and light scattering without changing the subject",
    ),
    (
        "Optical Depth Shift",
        "change lens focal length and aperture for a different focus falloff while keeping the composition",
    ),
    (
        "Material Micro-Detail",
        "intensify surface textures, micro-scratches and PBR material accuracy",
    ),
    (
        "Color Science Refinement",
        "adjust color grading, white balance and spectral response for a different film-stock feel",
    ),
    (
        "Shadow & Contrast Geometry",
        "adjust lighting ratios and shadow softness for more or less dramatic tension",
    ),
];

const MASTER_PROMPT_MIN_WORDS: u32 = 600;

/// Everything needed for one `generateContent` call.
#[derive(Debug, Clone)]
pub struct ComposedRequest {
    pub instruction: String,
    pub parts: Vec<Part>,
    pub schema: serde_json::Value,
    /// `true` iff the input is a URL; gates the search tool.
    pub retrieval_enabled: bool,
}

impl ComposedRequest {
    #[must_use]
    pub fn into_request(self) -> GenerateContentRequest {
        let tools = if self.retrieval_enabled {
            vec![Tool {
                google_search: GoogleSearch::default(),
            }]
        } else {
            Vec::new()
        };

        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::text(self.instruction)],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: self.parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: self.schema,
            },
            tools,
        }
    }
}

/// Builds the instruction, parts and schema for `input`.
#[must_use]
pub fn compose(input: &MediaInput, target_model: &str, config: &AnalysisConfig) -> ComposedRequest {
    let mut parts = vec![Part::text(task_statement(target_model, config))];

    let retrieval_enabled = match input {
        MediaInput::File { bytes, mime_type } => {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: mime_type.clone(),
                    data: BASE64.encode(bytes),
                },
            });
            false
        }
        MediaInput::Url { url } => {
            parts.push(Part::text(format!(
                "Media to analyze is published at this URL. Research it before answering: {url}"
            )));
            true
        }
    };

    ComposedRequest {
        instruction: system_instruction(target_model, config),
        parts,
        schema: response_schema(),
        retrieval_enabled,
    }
}

fn task_statement(target_model: &str, config: &AnalysisConfig) -> String {
    format!(
        "Reverse engineer this media for the {target_model} workstation. \
         Fidelity: {}%. Style override: {}. Generate subtle technical variations.",
        config.fidelity, config.prompt_style
    )
}

/// Renders the system instruction for `target_model` under `config`.
#[must_use]
pub fn system_instruction(target_model: &str, config: &AnalysisConfig) -> String {
    let mut variations = String::new();
    for (index, (name, brief)) in VARIATION_ARCHETYPES.iter().enumerate() {
        variations.push_str(&format!(
            "     - Variation {}: \"{name}\" ({brief}).\n",
            index + 1
        ));
    }

    format!(
        r#"You are the lead visual architect of V-Reverse Pro, a workstation for
high-fidelity visual deconstruction and technical prompt reconstruction.

WORKSTATION CONFIG:
  - Target Engine: {target_model}
  - Fidelity Temperature: {fidelity}%
  - Technical Detail: {detail}%
  - Base Style Profile: {style}

REQUIREMENTS:
  1. DNA: summarize the subject, the style and the environment separately.
  2. MASTER PROMPT: a technical blueprint of more than {min_words} words written for {target_model}.
     Cover light transport, spectral dispersion, subsurface scattering, materials, and the
     exact virtual camera and lens hardware (for example "Cooke Anamorphic /i 75mm T2.3").
  3. SOCIAL KIT: viral metadata with titles and descriptions both with and without hashtags,
     a hashtag list, an opening hook and sound-effect direction.
  4. THUMBNAIL: a click-through optimized thumbnail prompt and its visual composition.
  5. VARIATIONS: exactly 5 subtle refinements of the MASTER PROMPT, not style changes. Each keeps
     about 90% of the original DNA and tweaks specific technical parameters:
{variations}  6. NEGATIVE PROMPT: the artifacts and attributes the target engine must avoid.

OUTPUT RULES:
  - Return ONLY valid JSON matching the response schema. No markdown, no code fences.
  - Write every field in English, whatever language the user interface uses.
"#,
        fidelity = config.fidelity,
        detail = config.detail_level,
        style = config.prompt_style,
        min_words = MASTER_PROMPT_MIN_WORDS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            fidelity: 95,
            detail_level: 90,
            prompt_style: "Cinematic".to_string(),
        }
    }

    fn file_input() -> MediaInput {
        MediaInput::File {
            bytes: vec![0x89, b'P', b'N', b'G'],
            mime_type: "image/png".to_string(),
        }
    }

    fn url_input() -> MediaInput {
        MediaInput::Url {
            url: "https://example.com/v".to_string(),
        }
    }

    fn inline_parts(parts: &[Part]) -> usize {
        parts
            .iter()
            .filter(|p| matches!(p, Part::InlineData { .. }))
            .count()
    }

    fn parts_mentioning(parts: &[Part], needle: &str) -> usize {
        parts
            .iter()
            .filter(|p| matches!(p, Part::Text { text } if text.contains(needle)))
            .count()
    }

    #[test]
    fn instruction_interpolates_config() {
        let instruction = system_instruction("sora", &config());
        assert!(instruction.contains("Target Engine: sora"));
        assert!(instruction.contains("Fidelity Temperature: 95%"));
        assert!(instruction.contains("Technical Detail: 90%"));
        assert!(instruction.contains("Base Style Profile: Cinematic"));
    }

    #[test]
    fn instruction_states_output_rules_and_sections() {
        let instruction = system_instruction("veo", &config());
        assert!(instruction.contains("ONLY valid JSON"));
        assert!(instruction.contains("No markdown"));
        assert!(instruction.contains("English"));
        assert!(instruction.contains("more than 600 words"));
        assert!(instruction.contains("NEGATIVE PROMPT"));
        assert!(instruction.contains("THUMBNAIL"));
        assert!(instruction.contains("exactly 5"));
        for (name, _) in VARIATION_ARCHETYPES {
            assert!(instruction.contains(name), "missing archetype {name}");
        }
    }

    #[test]
    fn instruction_is_deterministic() {
        assert_eq!(
            system_instruction("kling", &config()),
            system_instruction("kling", &config())
        );
    }

    #[test]
    fn file_input_gets_task_text_then_inline_data() {
        let composed = compose(&file_input(), "sora", &config());
        assert_eq!(composed.parts.len(), 2);
        assert!(
            matches!(&composed.parts[0], Part::Text { text } if text.contains("sora") && text.contains("95%"))
        );
        match &composed.parts[1] {
            Part::InlineData { inline_data } => {
                assert_eq!(inline_data.mime_type, "image/png");
                assert_eq!(inline_data.data, "iVBORw==");
            }
            Part::Text { .. } => panic!("expected inline data part"),
        }
    }

    #[test]
    fn url_input_gets_task_text_then_url_text() {
        let composed = compose(&url_input(), "sora", &config());
        assert_eq!(composed.parts.len(), 2);
        assert!(
            matches!(&composed.parts[1], Part::Text { text } if text.contains("https://example.com/v"))
        );
    }

    #[test]
    fn retrieval_enabled_only_for_urls() {
        assert!(!compose(&file_input(), "sora", &config()).retrieval_enabled);
        assert!(compose(&url_input(), "sora", &config()).retrieval_enabled);
    }

    #[test]
    fn search_tool_only_requested_for_urls() {
        let file_request = compose(&file_input(), "sora", &config()).into_request();
        let url_request = compose(&url_input(), "sora", &config()).into_request();
        assert!(file_request.tools.is_empty());
        assert_eq!(url_request.tools.len(), 1);
    }

    #[test]
    fn payload_never_mixes_inline_data_and_url() {
        let file = compose(&file_input(), "sora", &config());
        assert_eq!(inline_parts(&file.parts), 1);
        assert_eq!(parts_mentioning(&file.parts, "https://"), 0);

        let url = compose(&url_input(), "sora", &config());
        assert_eq!(inline_parts(&url.parts), 0);
        assert_eq!(parts_mentioning(&url.parts, "https://example.com/v"), 1);
    }

    #[test]
    fn request_carries_instruction_schema_and_json_mime() {
        let request = compose(&file_input(), "runway", &config()).into_request();
        let value = serde_json::to_value(&request).unwrap();
        assert!(value["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Target Engine: runway"));
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(value["generationConfig"]["responseSchema"], response_schema());
        assert_eq!(value["contents"][0]["role"], "user");
    }
}
