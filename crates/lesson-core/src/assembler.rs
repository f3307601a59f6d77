//! Document assembly boundary.
//!
//! The pipeline hands resolved content to a [`DocumentAssembler`], which
//! renders each artifact and bundles them into an archive. Output formats
//! are entirely the assembler's business.

use crate::{LessonContent, LessonRequest, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;

/// Everything an assembler needs to render one artifact.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyJob<'a> {
    pub request: &'a LessonRequest,
    pub content: &'a LessonContent,
    /// Unique per run; prefix for every file the run writes.
    pub file_stem: &'a str,
}

/// Renders lesson artifacts and packages them.
///
/// Each method returns the path of the file it wrote. Implementations must
/// only read the content; any error aborts the run.
#[async_trait]
pub trait DocumentAssembler: Send + Sync {
    async fn lesson_plan(&self, job: &AssemblyJob<'_>) -> Result<PathBuf>;

    async fn worksheets(&self, job: &AssemblyJob<'_>) -> Result<PathBuf>;

    async fn rubrics(&self, job: &AssemblyJob<'_>) -> Result<PathBuf>;

    async fn question_bank(&self, job: &AssemblyJob<'_>) -> Result<PathBuf>;

    async fn slide_deck(&self, job: &AssemblyJob<'_>) -> Result<PathBuf>;

    /// Bundle previously written files into one archive.
    async fn package(&self, file_stem: &str, files: &[PathBuf]) -> Result<PathBuf>;
}

/// Build a file stem that no concurrent run will reuse:
/// topic slug, UTC timestamp and a short random token.
pub fn unique_file_stem(topic: &str) -> String {
    let token = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}",
        slugify(topic),
        Utc::now().format("%Y%m%d_%H%M%S"),
        &token[..8]
    )
}

/// Lowercase ASCII slug, at most 40 characters, never empty.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }

    let slug: String = slug.trim_matches('_').chars().take(40).collect();
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "lesson".to_string()
    } else {
        slug.to_string()
    }
}
