//! Shared domain types and configuration for V-Reverse.
//!
//! Holds the analysis request/result contract, the target-model catalogue,
//! the subscription gate policy, payment webhook normalization, and the
//! env-driven application config.

pub mod analysis;
pub mod app_config;
pub mod config;
pub mod payment;
pub mod subscription;
pub mod targets;

use thiserror::Error;

pub use analysis::{
    AnalysisConfig, AnalysisResult, GroundingSource, InputKind, MediaInput, SocialKit,
    ThumbnailBlueprint, ViralVariation,
};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use payment::{parse_payment_notification, PaymentOutcome};
pub use subscription::{normalize_email, AccessPolicy};
pub use targets::{find_target_model, TargetModel, TARGET_MODELS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid analysis config: {0}")]
    InvalidConfig(String),

    #[error("invalid media input: {0}")]
    InvalidInput(String),

    #[error("unknown target model: {0}")]
    UnknownTargetModel(String),
}
