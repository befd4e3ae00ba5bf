//! Gemini-backed media analysis.
//!
//! [`compose`] renders the instruction and multimodal payload, [`GeminiClient`]
//! performs the single `generateContent` call, and [`normalize`] turns the
//! model's text into an [`AnalysisResult`](vreverse_core::AnalysisResult).

pub mod client;
pub mod compose;
pub mod error;
pub mod grounding;
pub mod normalize;
pub mod schema;
pub mod types;

pub use client::GeminiClient;
pub use compose::{compose, ComposedRequest, VARIATION_ARCHETYPES};
pub use error::{AnalysisError, ErrorKind};
pub use normalize::normalize;
