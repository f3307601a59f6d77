//! # Lesson Core
//!
//! Core library for generating differentiated lesson packages.
//!
//! This crate provides the lesson data model, the deterministic template
//! engine, the AI provider interface and the resolver that ties them
//! together, plus the pipeline that drives a [`DocumentAssembler`].
//!
//! ## Features
//!
//! - Validated lesson requests (JSON or YAML input)
//! - Deterministic template content for every subject
//! - AI-primary content with guaranteed template fallback
//! - Step-by-step pipeline with a uniform success/error result
//!
//! ## Example
//!
//! ```rust,ignore
//! use lesson_core::{ContentResolver, LessonRequestInput};
//!
//! let request = LessonRequestInput::new("7", "Physics", "Newton's Laws", "2").validate()?;
//! let content = ContentResolver::template_only().resolve(&request).await;
//! assert_eq!(content.differentiated_outcomes.len(), 3);
//! ```

pub mod error;
pub mod request;
pub mod content;
pub mod subject;
pub mod template;
pub mod provider;
pub mod prompt;
pub mod extract;
pub mod resolver;
pub mod assembler;
pub mod pipeline;
pub mod config;

pub use error::{LessonError, Result};
pub use request::{Grade, LessonRequest, LessonRequestInput, Period};
pub use content::{AbilityTier, LessonContent};
pub use template::TemplateEngine;
pub use provider::{AiProvider, ProviderConfig};
pub use resolver::{ContentResolver, ContentSource, FallbackReason, ResolvedContent};
pub use assembler::{AssemblyJob, DocumentAssembler};
pub use pipeline::{LessonPipeline, PackageManifest, PackageResult, PipelineObserver, PipelineStep};
pub use config::{AiBackend, AiSettings, LessonConfig};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        LessonRequest, LessonRequestInput, LessonContent, AbilityTier,
        TemplateEngine, ContentResolver, AiProvider, ProviderConfig,
        LessonPipeline, PackageResult, DocumentAssembler,
        LessonError, Result,
    };
}
