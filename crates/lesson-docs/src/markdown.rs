//! Markdown document assembler.
//!
//! Renders each artifact from an embedded handlebars template and writes it
//! to the output directory as `<stem>_<artifact>.md`.

use crate::package::write_archive;
use crate::view::LessonView;
use async_trait::async_trait;
use handlebars::{handlebars_helper, Handlebars};
use lesson_core::{AssemblyJob, DocumentAssembler, LessonError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

const LESSON_PLAN: &str = "lesson_plan";
const WORKSHEETS: &str = "worksheets";
const RUBRICS: &str = "rubrics";
const QUESTION_BANK: &str = "question_bank";
const SLIDES: &str = "slides";

const TEMPLATES: [(&str, &str); 5] = [
    (LESSON_PLAN, include_str!("../templates/lesson_plan.md.hbs")),
    (WORKSHEETS, include_str!("../templates/worksheets.md.hbs")),
    (RUBRICS, include_str!("../templates/rubrics.md.hbs")),
    (QUESTION_BANK, include_str!("../templates/question_bank.md.hbs")),
    (SLIDES, include_str!("../templates/slides.md.hbs")),
];

handlebars_helper!(add1: |index: u64| index + 1);

/// Writes lesson documents as Markdown files.
pub struct MarkdownAssembler {
    output_dir: PathBuf,
    registry: Handlebars<'static>,
}

impl MarkdownAssembler {
    /// Create an assembler writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_helper("add1", Box::new(add1));

        for (name, source) in TEMPLATES {
            registry
                .register_template_string(name, source)
                .map_err(|e| LessonError::ConfigError(format!("template '{}': {}", name, e)))?;
        }

        Ok(Self {
            output_dir: output_dir.into(),
            registry,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render one document to a string.
    pub fn render(&self, artifact: &str, job: &AssemblyJob<'_>) -> Result<String> {
        let view = LessonView::new(job);
        self.registry
            .render(artifact, &view)
            .map_err(|e| LessonError::Assembly(format!("{}: {}", artifact, e)))
    }

    async fn write(&self, artifact: &str, job: &AssemblyJob<'_>) -> Result<PathBuf> {
        let body = self.render(artifact, job)?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| LessonError::Assembly(format!("{}: {}", self.output_dir.display(), e)))?;

        let path = self.output_dir.join(format!("{}_{}.md", job.file_stem, artifact));
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| LessonError::Assembly(format!("{}: {}", path.display(), e)))?;

        debug!("Wrote {}", path.display());
        Ok(path)
    }
}

impl std::fmt::Debug for MarkdownAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownAssembler")
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

#[async_trait]
impl DocumentAssembler for MarkdownAssembler {
    async fn lesson_plan(&self, job: &AssemblyJob<'_>) -> Result<PathBuf> {
        self.write(LESSON_PLAN, job).await
    }

    async fn worksheets(&self, job: &AssemblyJob<'_>) -> Result<PathBuf> {
        self.write(WORKSHEETS, job).await
    }

    async fn rubrics(&self, job: &AssemblyJob<'_>) -> Result<PathBuf> {
        self.write(RUBRICS, job).await
    }

    async fn question_bank(&self, job: &AssemblyJob<'_>) -> Result<PathBuf> {
        self.write(QUESTION_BANK, job).await
    }

    async fn slide_deck(&self, job: &AssemblyJob<'_>) -> Result<PathBuf> {
        self.write(SLIDES, job).await
    }

    async fn package(&self, file_stem: &str, files: &[PathBuf]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| LessonError::Packaging(format!("{}: {}", self.output_dir.display(), e)))?;

        let target = self.output_dir.join(format!("{}_package.zip", file_stem));
        write_archive(&target, files).await
    }
}
