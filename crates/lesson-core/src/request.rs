//! Lesson request model and validation.
//!
//! A [`LessonRequestInput`] is whatever arrives from outside (a JSON or YAML
//! file, a form post). [`LessonRequestInput::validate`] turns it into a
//! [`LessonRequest`], which is the only form the rest of the pipeline accepts.

use crate::{LessonError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// UAE core value used when the request does not name one.
pub const DEFAULT_VALUE: &str = "Respect/Care";

/// A scalar that may be written as either text or a number in request files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(i64),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n)
    }
}

/// Unvalidated lesson request, as read from external input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonRequestInput {
    pub grade: Scalar,
    pub subject: String,
    pub topic: String,
    pub period: Scalar,
    #[serde(default)]
    pub date: String,
    #[serde(default = "default_semester")]
    pub semester: Scalar,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub standards: Vec<String>,
    #[serde(default)]
    pub digital_platform: Option<String>,
    #[serde(default)]
    pub gifted_talented: bool,
}

fn default_semester() -> Scalar {
    Scalar::Text(String::new())
}

impl LessonRequestInput {
    /// Create an input with the required fields; the rest take their defaults.
    pub fn new(
        grade: impl Into<Scalar>,
        subject: impl Into<String>,
        topic: impl Into<String>,
        period: impl Into<Scalar>,
    ) -> Self {
        Self {
            grade: grade.into(),
            subject: subject.into(),
            topic: topic.into(),
            period: period.into(),
            date: String::new(),
            semester: default_semester(),
            value: None,
            standards: Vec::new(),
            digital_platform: None,
            gifted_talented: false,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_semester(mut self, semester: impl Into<Scalar>) -> Self {
        self.semester = semester.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_standard(mut self, standard: impl Into<String>) -> Self {
        self.standards.push(standard.into());
        self
    }

    pub fn with_digital_platform(mut self, platform: impl Into<String>) -> Self {
        self.digital_platform = Some(platform.into());
        self
    }

    pub fn with_gifted_talented(mut self, enabled: bool) -> Self {
        self.gifted_talented = enabled;
        self
    }

    /// Load a request from a `.json`, `.yaml` or `.yml` file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        if is_yaml {
            serde_yaml_ng::from_str(&raw).map_err(|e| {
                LessonError::ConfigError(format!("Invalid YAML in {}: {}", path.display(), e))
            })
        } else {
            Ok(serde_json::from_str(&raw)?)
        }
    }

    /// Validate the input into an immutable [`LessonRequest`].
    pub fn validate(self) -> Result<LessonRequest> {
        let grade: Grade = self.grade.into_text().parse()?;
        let period: Period = self.period.into_text().parse()?;

        let subject = required_text("subject", &self.subject)?;
        let topic = required_text("topic", &self.topic)?;

        let standards = self
            .standards
            .iter()
            .map(|s| required_text("standards", s))
            .collect::<Result<Vec<_>>>()?;

        let value = self
            .value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_VALUE)
            .to_string();

        let digital_platform = self
            .digital_platform
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(LessonRequest {
            grade,
            subject,
            topic,
            period,
            date: self.date,
            semester: self.semester.into_text(),
            value,
            standards,
            digital_platform,
            gifted_talented: self.gifted_talented,
        })
    }
}

fn required_text(field: &'static str, raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LessonError::validation(field, "must not be blank"));
    }
    Ok(trimmed.to_string())
}

/// School grade: KG1, KG2 or 1 through 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    Kindergarten(u8),
    Year(u8),
}

impl std::str::FromStr for Grade {
    type Err = LessonError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_ascii_uppercase()
            .trim_start_matches("GRADE")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let grade = match normalized.strip_prefix("KG") {
            Some(level) => level.parse::<u8>().ok().filter(|n| (1..=2).contains(n)).map(Grade::Kindergarten),
            None => normalized.parse::<u8>().ok().filter(|n| (1..=12).contains(n)).map(Grade::Year),
        };

        grade.ok_or_else(|| {
            LessonError::validation("grade", format!("'{}' is not one of KG1, KG2, 1-12", s.trim()))
        })
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Kindergarten(n) => write!(f, "KG{}", n),
            Grade::Year(n) => write!(f, "{}", n),
        }
    }
}

/// Lesson period within a unit. Selects the pedagogical focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Introduction,
    Development,
    Mastery,
}

impl Period {
    /// Ordinal used in request files and prompts.
    pub fn number(self) -> u8 {
        match self {
            Period::Introduction => 1,
            Period::Development => 2,
            Period::Mastery => 3,
        }
    }

    /// Stage name shown in documents.
    pub fn stage(self) -> &'static str {
        match self {
            Period::Introduction => "Introduction",
            Period::Development => "Development",
            Period::Mastery => "Mastery",
        }
    }

    /// What a lesson in this period should concentrate on.
    pub fn focus(self) -> &'static str {
        match self {
            Period::Introduction => "foundational concepts and introduction",
            Period::Development => "development and application of concepts",
            Period::Mastery => "mastery and higher-order thinking",
        }
    }
}

impl std::str::FromStr for Period {
    type Err = LessonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" => Ok(Period::Introduction),
            "2" => Ok(Period::Development),
            "3" => Ok(Period::Mastery),
            other => Err(LessonError::validation(
                "period",
                format!("'{}' is not one of 1, 2, 3", other),
            )),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A validated lesson request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonRequest {
    grade: Grade,
    subject: String,
    topic: String,
    period: Period,
    date: String,
    semester: String,
    value: String,
    standards: Vec<String>,
    digital_platform: Option<String>,
    gifted_talented: bool,
}

impl LessonRequest {
    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn semester(&self) -> &str {
        &self.semester
    }

    /// UAE core value; never empty.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn standards(&self) -> &[String] {
        &self.standards
    }

    pub fn digital_platform(&self) -> Option<&str> {
        self.digital_platform.as_deref()
    }

    pub fn gifted_talented(&self) -> bool {
        self.gifted_talented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physics() -> LessonRequestInput {
        LessonRequestInput::new("7", "Physics", "Newton's Laws", "2")
            .with_date("2024-01-15")
            .with_semester("1")
    }

    #[test]
    fn test_validate_defaults() {
        let request = physics().validate().unwrap();
        assert_eq!(request.grade(), Grade::Year(7));
        assert_eq!(request.period(), Period::Development);
        assert_eq!(request.value(), DEFAULT_VALUE);
        assert!(request.standards().is_empty());
        assert!(request.digital_platform().is_none());
        assert!(!request.gifted_talented());
    }

    #[test]
    fn test_grade_parsing() {
        assert_eq!("KG2".parse::<Grade>().unwrap(), Grade::Kindergarten(2));
        assert_eq!("kg 1".parse::<Grade>().unwrap(), Grade::Kindergarten(1));
        assert_eq!("Grade 12".parse::<Grade>().unwrap(), Grade::Year(12));
        assert!("13".parse::<Grade>().is_err());
        assert!("KG3".parse::<Grade>().is_err());
        assert!("seven".parse::<Grade>().is_err());
        assert_eq!(Grade::Kindergarten(1).to_string(), "KG1");
    }

    #[test]
    fn test_period_accepts_number_or_text() {
        let numeric = LessonRequestInput::new(9i64, "Math", "Fractions", 3i64).validate().unwrap();
        assert_eq!(numeric.period(), Period::Mastery);
        assert!(LessonRequestInput::new("9", "Math", "Fractions", "4").validate().is_err());
    }

    #[test]
    fn test_blank_fields_rejected() {
        let err = LessonRequestInput::new("7", "  ", "Topic", "1").validate().unwrap_err();
        assert!(matches!(err, LessonError::Validation { field: "subject", .. }));

        let err = physics().with_standard(" ").validate().unwrap_err();
        assert!(matches!(err, LessonError::Validation { field: "standards", .. }));
    }

    #[test]
    fn test_blank_platform_and_value_normalized() {
        let request = physics()
            .with_digital_platform("  ")
            .with_value("")
            .validate()
            .unwrap();
        assert!(request.digital_platform().is_none());
        assert_eq!(request.value(), DEFAULT_VALUE);
    }

    #[test]
    fn test_deserialize_json_input() {
        let json = r#"{
            "grade": "7", "subject": "Physics", "topic": "Newton's Laws",
            "period": "2", "date": "2024-01-15", "semester": "1",
            "value": "Respect/Care", "standards": [],
            "digital_platform": null, "gifted_talented": false
        }"#;
        let input: LessonRequestInput = serde_json::from_str(json).unwrap();
        assert_eq!(input, physics().with_value("Respect/Care"));
    }

    #[test]
    fn test_deserialize_yaml_input() {
        let yaml = "grade: 10\nsubject: Chemistry\ntopic: Bonding\nperiod: 1\ngifted_talented: true\n";
        let input: LessonRequestInput = serde_yaml_ng::from_str(yaml).unwrap();
        let request = input.validate().unwrap();
        assert_eq!(request.grade(), Grade::Year(10));
        assert!(request.gifted_talented());
    }
}
