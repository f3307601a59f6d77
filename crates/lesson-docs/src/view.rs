//! Render context shared by every document template.

use lesson_core::content::{Activity, AdekIntegration, TieredTask};
use lesson_core::{AbilityTier, AssemblyJob};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct LessonView<'a> {
    pub header: Header<'a>,
    pub objectives: &'a str,
    pub vocabulary: &'a [String],
    pub resources: &'a [String],
    pub skills: &'a [String],
    pub starter: &'a Activity,
    pub teaching_method: &'a str,
    pub teaching_steps: &'a [String],
    pub tiers: Vec<TierView<'a>>,
    pub plenary: &'a Activity,
    pub world_application: &'a str,
    pub adek: &'a AdekIntegration,
}

#[derive(Debug, Serialize)]
pub(crate) struct Header<'a> {
    pub grade: String,
    pub subject: &'a str,
    pub topic: &'a str,
    pub period: u8,
    pub stage: &'a str,
    pub date: &'a str,
    pub semester: &'a str,
    pub value: &'a str,
    pub standards: String,
    pub digital_platform: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct TierView<'a> {
    pub key: &'static str,
    pub label: &'static str,
    pub dok: String,
    pub outcome: &'a str,
    pub cooperative: Option<&'a TieredTask>,
    pub independent: Option<&'a TieredTask>,
}

impl<'a> LessonView<'a> {
    pub fn new(job: &AssemblyJob<'a>) -> Self {
        let request = job.request;
        let content = job.content;

        let tiers = content
            .tiers()
            .into_iter()
            .map(|tier: AbilityTier| TierView {
                key: tier.key(),
                label: tier.label(),
                dok: tier.dok_label(),
                outcome: content
                    .differentiated_outcomes
                    .get(&tier)
                    .map(String::as_str)
                    .unwrap_or_default(),
                cooperative: content.cooperative_tasks.get(&tier),
                independent: content.independent_tasks.get(&tier),
            })
            .collect();

        let standards = if request.standards().is_empty() {
            "Not specified".to_string()
        } else {
            request.standards().join(", ")
        };

        Self {
            header: Header {
                grade: request.grade().to_string(),
                subject: request.subject(),
                topic: request.topic(),
                period: request.period().number(),
                stage: request.period().stage(),
                date: request.date(),
                semester: request.semester(),
                value: request.value(),
                standards,
                digital_platform: request.digital_platform().unwrap_or("Not specified"),
            },
            objectives: &content.objectives,
            vocabulary: &content.vocabulary,
            resources: &content.resources,
            skills: &content.skills,
            starter: &content.starter,
            teaching_method: &content.teaching_component.method,
            teaching_steps: &content.teaching_component.steps,
            tiers,
            plenary: &content.plenary,
            world_application: &content.world_application,
            adek: &content.adek_integration,
        }
    }
}
