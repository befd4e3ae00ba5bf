//! `analyze` command: one Gemini call, printed as a report or raw JSON.
//!
//! This is an operator tool; it does not consult the subscription gate.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use vreverse_core::{find_target_model, AnalysisConfig, AnalysisResult, AppConfig, MediaInput};
use vreverse_gemini::GeminiClient;

#[derive(Debug, Args)]
#[command(group(clap::ArgGroup::new("source").required(true).args(["file", "url"])))]
pub struct AnalyzeArgs {
    /// Local image or video to upload inline
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Published media URL for the model to research
    #[arg(long)]
    pub url: Option<String>,
    /// Target engine id (see `targets`)
    #[arg(long, default_value = "midjourney")]
    pub target: String,
    /// Fidelity percentage, 0-100
    #[arg(long, default_value_t = 95)]
    pub fidelity: u8,
    /// Technical detail percentage, 0-100
    #[arg(long, default_value_t = 90)]
    pub detail: u8,
    #[arg(long, default_value = "Cinematic Hyper-Realism")]
    pub style: String,
    /// Override the mime type inferred from the file extension
    #[arg(long)]
    pub mime: Option<String>,
    /// Print the raw result JSON instead of a report
    #[arg(long)]
    pub json: bool,
}

/// Infers a mime type from the file extension.
pub(crate) fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "mp4" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "webm" => Some("video/webm"),
        "mpeg" | "mpg" => Some("video/mpeg"),
        "avi" => Some("video/x-msvideo"),
        _ => None,
    }
}

fn build_input(args: &AnalyzeArgs, max_bytes: usize) -> anyhow::Result<MediaInput> {
    if let Some(url) = &args.url {
        return Ok(MediaInput::Url { url: url.clone() });
    }
    let path = args
        .file
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("either --file or --url is required"))?;

    let mime_type = match &args.mime {
        Some(mime) => mime.clone(),
        None => mime_for_path(path)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "cannot infer a mime type for '{}'; pass --mime",
                    path.display()
                )
            })?
            .to_string(),
    };

    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
    if bytes.len() > max_bytes {
        anyhow::bail!(
            "'{}' is {} bytes; the upload limit is {max_bytes}",
            path.display(),
            bytes.len()
        );
    }

    Ok(MediaInput::File { bytes, mime_type })
}

fn print_report(result: &AnalysisResult) {
    println!("== SUBJECT DNA ==\n{}\n", result.subject_dna);
    println!("== STYLE DNA ==\n{}\n", result.style_dna);
    println!("== ENVIRONMENT DNA ==\n{}\n", result.environment_dna);
    println!("== MASTER PROMPT ==\n{}\n", result.full_master_prompt);
    println!("== NEGATIVE PROMPT ==\n{}\n", result.negative_prompt);

    let kit = &result.social_kit;
    println!("== SOCIAL KIT ==");
    println!("title:       {}", kit.title_plain);
    println!("hook:        {}", kit.hook);
    println!("hashtags:    {}", kit.hashtags.join(" "));
    println!("sfx:         {}\n", kit.sfx_direction);

    println!("== THUMBNAIL ==\n{}\n", result.thumbnail_blueprint.prompt);

    println!("== VARIATIONS ==");
    for (index, variation) in result.viral_variations.iter().enumerate() {
        println!(
            "{}. [{}] {}: {}",
            index + 1,
            variation.kind,
            variation.title,
            variation.strategy
        );
    }

    if let Some(sources) = &result.grounding_sources {
        println!("\n== SOURCES ==");
        for source in sources {
            println!("- {} <{}>", source.title, source.uri);
        }
    }
}

/// Runs one analysis and prints it.
///
/// # Errors
///
/// Returns an error if the target is unknown, the input cannot be read, the
/// API key is missing, or the analysis fails.
pub(crate) async fn run_analyze(config: &AppConfig, args: &AnalyzeArgs) -> anyhow::Result<()> {
    let target = find_target_model(&args.target)?;
    let analysis_config = AnalysisConfig::new(args.fidelity, args.detail, args.style.clone())?;
    let input = build_input(args, config.max_upload_bytes)?;

    let client = GeminiClient::with_base_url(
        config.require_gemini_api_key()?,
        &config.gemini_model,
        config.gemini_timeout_secs,
        &config.gemini_base_url,
    )?
    .with_strict_variations(config.strict_variations);

    tracing::info!(target_model = target.id, input_kind = %input.kind(), "analyze: requesting");
    let result = client.analyze(&input, target.id, &analysis_config).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Target: {}\n", target.name);
        print_report(&result);
    }
    Ok(())
}
