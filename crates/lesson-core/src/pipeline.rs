//! Lesson Pipeline - resolve content, assemble documents, package.
//!
//! The pipeline never lets an error escape: callers always receive either a
//! complete [`PackageManifest`] or a single error message.

use crate::assembler::{unique_file_stem, AssemblyJob, DocumentAssembler};
use crate::resolver::ContentSource;
use crate::{ContentResolver, LessonError, LessonRequest, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// One reported stage of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Content,
    LessonPlan,
    Worksheets,
    Rubrics,
    QuestionBank,
    SlideDeck,
    Package,
}

impl PipelineStep {
    pub const TOTAL: u8 = 7;

    pub fn number(self) -> u8 {
        match self {
            PipelineStep::Content => 1,
            PipelineStep::LessonPlan => 2,
            PipelineStep::Worksheets => 3,
            PipelineStep::Rubrics => 4,
            PipelineStep::QuestionBank => 5,
            PipelineStep::SlideDeck => 6,
            PipelineStep::Package => 7,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PipelineStep::Content => "Generating lesson content",
            PipelineStep::LessonPlan => "Creating lesson plan document",
            PipelineStep::Worksheets => "Creating worksheets",
            PipelineStep::Rubrics => "Creating rubrics",
            PipelineStep::QuestionBank => "Creating question bank",
            PipelineStep::SlideDeck => "Creating slide deck",
            PipelineStep::Package => "Packaging files",
        }
    }
}

/// Trait for observing pipeline progress (logging, UI).
pub trait PipelineObserver: Send + Sync {
    /// Called when a step starts.
    fn on_step(&self, step: PipelineStep);

    /// Called once content is resolved.
    fn on_content(&self, _source: &ContentSource) {}

    /// Called when the package is complete.
    fn on_success(&self, manifest: &PackageManifest);

    /// Called when a step fails and the run is abandoned.
    fn on_failure(&self, step: PipelineStep, error: &str);
}

pub type ObserverPtr = Arc<dyn PipelineObserver>;

/// Observer that reports progress through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_step(&self, step: PipelineStep) {
        info!("Step {}/{}: {}...", step.number(), PipelineStep::TOTAL, step.description());
    }

    fn on_content(&self, source: &ContentSource) {
        match source {
            ContentSource::Ai { provider } => info!("Content generated by {}", provider),
            ContentSource::Template { reason } => info!("Content generated from templates ({})", reason),
        }
    }

    fn on_success(&self, manifest: &PackageManifest) {
        info!("Package ready: {}", manifest.package);
    }

    fn on_failure(&self, step: PipelineStep, error: &str) {
        error!("Step {} ({}) failed: {}", step.number(), step.description(), error);
    }
}

/// File names of every artifact in a finished package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub lesson_plan: String,
    pub worksheets: String,
    pub rubrics: String,
    pub question_bank: String,
    pub powerpoint: String,
    pub package: String,
}

/// Outcome of a pipeline run, in the shape returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PackageResult {
    Success {
        files: PackageManifest,
        download_url: String,
    },
    Error {
        message: String,
    },
}

impl PackageResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PackageResult::Success { .. })
    }
}

/// Sequences content resolution, document assembly and packaging.
pub struct LessonPipeline<A: DocumentAssembler> {
    resolver: ContentResolver,
    assembler: A,
    observer: ObserverPtr,
    download_prefix: String,
}

impl<A: DocumentAssembler> LessonPipeline<A> {
    pub fn new(resolver: ContentResolver, assembler: A) -> Self {
        Self {
            resolver,
            assembler,
            observer: Arc::new(TracingObserver),
            download_prefix: "/api/download".to_string(),
        }
    }

    /// Replace the progress observer.
    pub fn with_observer(mut self, observer: ObserverPtr) -> Self {
        self.observer = observer;
        self
    }

    /// Set the prefix of the returned download locator.
    pub fn with_download_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.download_prefix = prefix.into();
        self
    }

    /// Generate the complete package for a request.
    #[instrument(skip(self, request), fields(topic = %request.topic()))]
    pub async fn generate_package(&self, request: &LessonRequest) -> PackageResult {
        match self.run(request).await {
            Ok(files) => {
                self.observer.on_success(&files);
                let download_url = format!(
                    "{}/{}",
                    self.download_prefix.trim_end_matches('/'),
                    files.package
                );
                PackageResult::Success { files, download_url }
            }
            Err((step, e)) => {
                let message = e.to_string();
                self.observer.on_failure(step, &message);
                PackageResult::Error { message }
            }
        }
    }

    async fn run(&self, request: &LessonRequest) -> std::result::Result<PackageManifest, (PipelineStep, LessonError)> {
        self.observer.on_step(PipelineStep::Content);
        let resolved = self.resolver.resolve_detailed(request).await;
        self.observer.on_content(&resolved.source);

        let file_stem = unique_file_stem(request.topic());
        let job = AssemblyJob {
            request,
            content: &resolved.content,
            file_stem: &file_stem,
        };

        let lesson_plan = self.step(PipelineStep::LessonPlan, self.assembler.lesson_plan(&job)).await?;
        let worksheets = self.step(PipelineStep::Worksheets, self.assembler.worksheets(&job)).await?;
        let rubrics = self.step(PipelineStep::Rubrics, self.assembler.rubrics(&job)).await?;
        let question_bank = self.step(PipelineStep::QuestionBank, self.assembler.question_bank(&job)).await?;
        let slides = self.step(PipelineStep::SlideDeck, self.assembler.slide_deck(&job)).await?;

        let package = self
            .step(
                PipelineStep::Package,
                self.assembler.package(
                    &file_stem,
                    &[
                        lesson_plan.clone(),
                        worksheets.clone(),
                        rubrics.clone(),
                        question_bank.clone(),
                        slides.clone(),
                    ],
                ),
            )
            .await?;

        build_manifest([&lesson_plan, &worksheets, &rubrics, &question_bank, &slides, &package])
            .map_err(|e| (PipelineStep::Package, e))
    }

    async fn step(
        &self,
        step: PipelineStep,
        work: impl std::future::Future<Output = Result<PathBuf>>,
    ) -> std::result::Result<PathBuf, (PipelineStep, LessonError)> {
        self.observer.on_step(step);
        work.await.map_err(|e| (step, e))
    }
}

fn build_manifest(paths: [&Path; 6]) -> Result<PackageManifest> {
    let [lesson_plan, worksheets, rubrics, question_bank, powerpoint, package] = paths.map(file_name);
    Ok(PackageManifest {
        lesson_plan: lesson_plan?,
        worksheets: worksheets?,
        rubrics: rubrics?,
        question_bank: question_bank?,
        powerpoint: powerpoint?,
        package: package?,
    })
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| LessonError::Assembly(format!("artifact path {} has no file name", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockProvider;
    use crate::{LessonContent, LessonRequestInput};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Assembler that records calls and can fail on a chosen step.
    #[derive(Default)]
    struct FakeAssembler {
        fail_on: Option<PipelineStep>,
        seen_content: Mutex<Vec<LessonContent>>,
    }

    impl FakeAssembler {
        fn write(&self, step: PipelineStep, job: &AssemblyJob<'_>, suffix: &str) -> Result<PathBuf> {
            if self.fail_on == Some(step) {
                return Err(LessonError::Assembly(format!("{} broke", suffix)));
            }
            self.seen_content.lock().unwrap().push(job.content.clone());
            Ok(PathBuf::from("out").join(format!("{}_{}", job.file_stem, suffix)))
        }
    }

    #[async_trait]
    impl DocumentAssembler for FakeAssembler {
        async fn lesson_plan(&self, job: &AssemblyJob<'_>) -> Result<PathBuf> {
            self.write(PipelineStep::LessonPlan, job, "lesson_plan.md")
        }

        async fn worksheets(&self, job: &AssemblyJob<'_>) -> Result<PathBuf> {
            self.write(PipelineStep::Worksheets, job, "worksheets.md")
        }

        async fn rubrics(&self, job: &AssemblyJob<'_>) -> Result<PathBuf> {
            self.write(PipelineStep::Rubrics, job, "rubrics.md")
        }

        async fn question_bank(&self, job: &AssemblyJob<'_>) -> Result<PathBuf> {
            self.write(PipelineStep::QuestionBank, job, "question_bank.md")
        }

        async fn slide_deck(&self, job: &AssemblyJob<'_>) -> Result<PathBuf> {
            self.write(PipelineStep::SlideDeck, job, "slides.md")
        }

        async fn package(&self, file_stem: &str, files: &[PathBuf]) -> Result<PathBuf> {
            if self.fail_on == Some(PipelineStep::Package) {
                return Err(LessonError::Packaging("disk full".to_string()));
            }
            assert_eq!(files.len(), 5);
            Ok(PathBuf::from("out").join(format!("{}_package.zip", file_stem)))
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        steps: Mutex<Vec<PipelineStep>>,
        failures: Mutex<Vec<PipelineStep>>,
    }

    impl PipelineObserver for RecordingObserver {
        fn on_step(&self, step: PipelineStep) {
            self.steps.lock().unwrap().push(step);
        }

        fn on_success(&self, _manifest: &PackageManifest) {}

        fn on_failure(&self, step: PipelineStep, _error: &str) {
            self.failures.lock().unwrap().push(step);
        }
    }

    fn request() -> LessonRequest {
        LessonRequestInput::new("7", "Physics", "Newton's Laws", "2")
            .validate()
            .unwrap()
    }

    #[tokio::test]
    async fn test_successful_run() {
        let observer = Arc::new(RecordingObserver::default());
        let pipeline = LessonPipeline::new(ContentResolver::template_only(), FakeAssembler::default())
            .with_observer(observer.clone());

        let result = pipeline.generate_package(&request()).await;
        let PackageResult::Success { files, download_url } = result else {
            panic!("expected a successful package");
        };

        assert!(files.lesson_plan.starts_with("newton_s_laws_"));
        assert!(files.powerpoint.ends_with("_slides.md"));
        assert_eq!(download_url, format!("/api/download/{}", files.package));
        assert_eq!(observer.steps.lock().unwrap().len(), PipelineStep::TOTAL as usize);

        let seen = pipeline.assembler.seen_content.lock().unwrap();
        assert!(seen.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn test_assembly_failure_aborts_run() {
        let observer = Arc::new(RecordingObserver::default());
        let assembler = FakeAssembler {
            fail_on: Some(PipelineStep::Rubrics),
            ..Default::default()
        };
        let pipeline = LessonPipeline::new(ContentResolver::template_only(), assembler)
            .with_observer(observer.clone());

        let result = pipeline.generate_package(&request()).await;
        assert_eq!(
            result,
            PackageResult::Error {
                message: "Document assembly failed: rubrics.md broke".to_string()
            }
        );

        let steps = observer.steps.lock().unwrap();
        assert_eq!(steps.last(), Some(&PipelineStep::Rubrics));
        assert!(!steps.contains(&PipelineStep::Package));
        assert_eq!(*observer.failures.lock().unwrap(), vec![PipelineStep::Rubrics]);
    }

    #[tokio::test]
    async fn test_packaging_failure_is_reported() {
        let assembler = FakeAssembler {
            fail_on: Some(PipelineStep::Package),
            ..Default::default()
        };
        let pipeline = LessonPipeline::new(ContentResolver::template_only(), assembler);

        let result = pipeline.generate_package(&request()).await;
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_ai_failure_is_not_an_error() {
        let pipeline = LessonPipeline::new(
            ContentResolver::new(MockProvider::failing("503 Service Unavailable")),
            FakeAssembler::default(),
        );
        assert!(pipeline.generate_package(&request()).await.is_success());
    }

    #[test]
    fn test_result_contract_shape() {
        let error = PackageResult::Error { message: "boom".to_string() };
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            serde_json::json!({"status": "error", "message": "boom"})
        );

        let success = PackageResult::Success {
            files: PackageManifest {
                lesson_plan: "a.md".into(),
                worksheets: "b.md".into(),
                rubrics: "c.md".into(),
                question_bank: "d.md".into(),
                powerpoint: "e.md".into(),
                package: "f.zip".into(),
            },
            download_url: "/api/download/f.zip".into(),
        };
        let value = serde_json::to_value(&success).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["files"]["powerpoint"], "e.md");
        assert!(value.get("message").is_none());
    }
}
