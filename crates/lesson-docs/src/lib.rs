//! # Lesson Docs
//!
//! Reference [`DocumentAssembler`](lesson_core::DocumentAssembler) that
//! renders lesson packages as Markdown and bundles them into a zip archive.
//!
//! ```rust,ignore
//! use lesson_core::{ContentResolver, LessonPipeline};
//! use lesson_docs::MarkdownAssembler;
//!
//! let pipeline = LessonPipeline::new(ContentResolver::template_only(), MarkdownAssembler::new("output")?);
//! let result = pipeline.generate_package(&request).await;
//! ```

mod markdown;
mod package;
mod view;

pub use markdown::MarkdownAssembler;
pub use package::write_archive;
