//! Canonical lesson content.
//!
//! [`LessonContent`] is the single structure every generation path produces
//! and every document consumer reads. Its JSON form is also the shape the AI
//! is asked to return, so field names here are part of the prompt contract.

use crate::{LessonError, LessonRequest, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Differentiation bucket for a classroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityTier {
    Assistance,
    Average,
    Upper,
    Gifted,
}

impl AbilityTier {
    /// Tiers present in every lesson.
    pub const CORE: [AbilityTier; 3] = [AbilityTier::Assistance, AbilityTier::Average, AbilityTier::Upper];

    /// Tiers a request calls for, in display order.
    pub fn for_request(gifted_talented: bool) -> Vec<AbilityTier> {
        let mut tiers = Self::CORE.to_vec();
        if gifted_talented {
            tiers.push(AbilityTier::Gifted);
        }
        tiers
    }

    /// Key used in JSON and prompts.
    pub fn key(self) -> &'static str {
        match self {
            AbilityTier::Assistance => "assistance",
            AbilityTier::Average => "average",
            AbilityTier::Upper => "upper",
            AbilityTier::Gifted => "gifted",
        }
    }

    /// Heading used in rendered documents.
    pub fn label(self) -> &'static str {
        match self {
            AbilityTier::Assistance => "Assistance",
            AbilityTier::Average => "Average",
            AbilityTier::Upper => "Upper",
            AbilityTier::Gifted => "Gifted & Talented",
        }
    }

    /// Lowest and highest depth-of-knowledge level for this tier.
    pub fn dok_range(self) -> (u8, u8) {
        match self {
            AbilityTier::Assistance => (1, 2),
            AbilityTier::Average => (2, 3),
            AbilityTier::Upper => (3, 4),
            AbilityTier::Gifted => (4, 4),
        }
    }

    /// "DOK 1-2" style label, or "DOK 4" for a single level.
    pub fn dok_label(self) -> String {
        match self.dok_range() {
            (lo, hi) if lo == hi => format!("DOK {}", lo),
            (lo, hi) => format!("DOK {}-{}", lo, hi),
        }
    }
}

impl fmt::Display for AbilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-tier map. Ordered so rendering and serialization are stable.
pub type Tiered<T> = BTreeMap<AbilityTier, T>;

/// A timed activity with its guiding questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub activity: String,
    pub questions: Vec<String>,
}

/// Direct-instruction segment of the lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeachingComponent {
    pub method: String,
    pub steps: Vec<String>,
}

/// A differentiated task for one ability tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredTask {
    pub activity: String,
    pub questions: Vec<String>,
    /// Visual / auditory / kinesthetic elements.
    pub vak: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoralEducation {
    pub pillar: String,
    pub connection: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Steam {
    pub science: String,
    pub technology: String,
    pub engineering: String,
    pub art: String,
    pub math: String,
}

/// UAE / ADEK curriculum integration block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdekIntegration {
    pub my_identity: String,
    pub moral_education: MoralEducation,
    pub steam: Steam,
    pub links_to_subjects: String,
    pub environment: String,
}

/// Everything the document assembler needs to render a lesson package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonContent {
    pub objectives: String,
    pub differentiated_outcomes: Tiered<String>,
    pub vocabulary: Vec<String>,
    pub resources: Vec<String>,
    pub skills: Vec<String>,
    pub starter: Activity,
    pub teaching_component: TeachingComponent,
    pub cooperative_tasks: Tiered<TieredTask>,
    pub independent_tasks: Tiered<TieredTask>,
    pub plenary: Activity,
    pub world_application: String,
    pub adek_integration: AdekIntegration,
}

impl LessonContent {
    /// Tiers used by this content, taken from the outcomes map.
    pub fn tiers(&self) -> Vec<AbilityTier> {
        self.differentiated_outcomes.keys().copied().collect()
    }

    /// Check the content is usable for `request`.
    ///
    /// All tiered maps must carry exactly the tiers the request calls for,
    /// and the headline fields must not be empty.
    pub fn check_against(&self, request: &LessonRequest) -> Result<()> {
        let expected = AbilityTier::for_request(request.gifted_talented());

        let sections: [(&str, Vec<AbilityTier>); 3] = [
            ("differentiated_outcomes", self.differentiated_outcomes.keys().copied().collect()),
            ("cooperative_tasks", self.cooperative_tasks.keys().copied().collect()),
            ("independent_tasks", self.independent_tasks.keys().copied().collect()),
        ];

        for (name, tiers) in sections {
            if tiers != expected {
                return Err(LessonError::InconsistentTiers(format!(
                    "{} has tiers {:?}, expected {:?}",
                    name, tiers, expected
                )));
            }
        }

        if self.objectives.trim().is_empty() {
            return Err(LessonError::Parse("objectives are empty".to_string()));
        }
        if self.vocabulary.is_empty() {
            return Err(LessonError::Parse("vocabulary is empty".to_string()));
        }

        Ok(())
    }
}
