//! Prompt construction for AI lesson generation.

use crate::content::AbilityTier;
use crate::provider::GenerationRequest;
use crate::LessonRequest;
use serde_json::{json, Map, Value};

/// System prompt shared by every lesson request.
pub const SYSTEM_PROMPT: &str = "You are an expert UAE curriculum designer. \
Generate detailed, pedagogically sound lesson plans that:\n\
1. Follow UAE/ADEK curriculum standards\n\
2. Include HOT (Higher Order Thinking) objectives\n\
3. Provide DOK-level differentiated outcomes\n\
4. Integrate UAE values authentically\n\
5. Include specific, actionable activities\n\
6. Provide clear assessment strategies\n\
7. Connect to real-world applications in a UAE context\n\n\
Always output a single valid JSON object with exactly the structure requested.";

/// Build the full generation request for a lesson.
pub fn build_request(lesson: &LessonRequest) -> GenerationRequest {
    GenerationRequest {
        system_prompt: SYSTEM_PROMPT.to_string(),
        prompt: build_user_prompt(lesson),
    }
}

/// The lesson-specific prompt: every request field plus the required shape.
pub fn build_user_prompt(lesson: &LessonRequest) -> String {
    let standards = if lesson.standards().is_empty() {
        "Not specified".to_string()
    } else {
        lesson.standards().join(", ")
    };

    let shape = serde_json::to_string_pretty(&response_shape(lesson.gifted_talented()))
        .unwrap_or_default();

    let gifted_rule = if lesson.gifted_talented() {
        "Include the \"gifted\" tier in differentiated_outcomes, cooperative_tasks and independent_tasks."
    } else {
        "Do NOT include a \"gifted\" tier anywhere; use only assistance, average and upper."
    };

    format!(
        "Generate a complete, detailed lesson plan in JSON format.\n\n\
         LESSON DETAILS:\n\
         - Grade: {grade}\n\
         - Subject: {subject}\n\
         - Topic: {topic}\n\
         - Period: {period} ({stage})\n\
         - Date: {date}\n\
         - Semester: {semester}\n\
         - UAE Value: {value}\n\
         - Standards: {standards}\n\
         - Digital Platform: {platform}\n\
         - Gifted/Talented: {gifted}\n\n\
         REQUIRED JSON STRUCTURE:\n{shape}\n\n\
         SPECIFIC REQUIREMENTS:\n\
         1. All activities must include SPECIFIC guiding questions (not generic)\n\
         2. Differentiation must be CLEAR and PRACTICAL\n\
         3. UAE context must be AUTHENTIC (not just mentioned)\n\
         4. Include REAL examples and specific instructions\n\
         5. Make content GRADE-APPROPRIATE for grade {grade}\n\
         6. For Period {period}, focus on: {focus}\n\
         7. {gifted_rule}\n\n\
         Output ONLY valid JSON, no additional text.",
        grade = lesson.grade(),
        subject = lesson.subject(),
        topic = lesson.topic(),
        period = lesson.period(),
        stage = lesson.period().stage(),
        date = lesson.date(),
        semester = lesson.semester(),
        value = lesson.value(),
        standards = standards,
        platform = lesson.digital_platform().unwrap_or("Not specified"),
        gifted = if lesson.gifted_talented() { "Yes" } else { "No" },
        shape = shape,
        focus = lesson.period().focus(),
        gifted_rule = gifted_rule,
    )
}

/// Annotated example of the JSON object the model must return.
fn response_shape(gifted_talented: bool) -> Value {
    let tiers = AbilityTier::for_request(gifted_talented);

    let mut outcomes = Map::new();
    let mut cooperative = Map::new();
    let mut independent = Map::new();
    for tier in &tiers {
        outcomes.insert(
            tier.key().to_string(),
            json!(format!("{} outcomes for {} learners", tier.dok_label(), tier.key())),
        );
        cooperative.insert(tier.key().to_string(), task_shape(*tier, "group activity"));
        independent.insert(tier.key().to_string(), task_shape(*tier, "independent task"));
    }

    json!({
        "objectives": "3-4 HOT objectives using Bloom's Taxonomy verbs. Format: 'Students will be able to [VERB] [specific content] through [method].'",
        "differentiated_outcomes": outcomes,
        "vocabulary": ["8-10 subject-specific key terms"],
        "resources": ["5-7 specific resources needed"],
        "skills": ["Critical Thinking", "Problem Solving", "Collaboration", "Communication", "Digital Literacy"],
        "starter": {
            "activity": "5-minute engaging starter activity with specific instructions",
            "questions": ["3-4 specific guiding questions"]
        },
        "teaching_component": {
            "method": "Specific teaching methodology (10 minutes maximum)",
            "steps": ["Step 1", "Step 2", "Step 3", "Step 4", "Step 5"]
        },
        "cooperative_tasks": cooperative,
        "independent_tasks": independent,
        "plenary": {
            "activity": "5-minute plenary activity to consolidate learning",
            "questions": ["3-4 reflection questions"]
        },
        "world_application": "Specific real-world application in a UAE context, 2-3 paragraphs",
        "adek_integration": {
            "my_identity": "How the lesson connects to UAE identity, culture and national development",
            "moral_education": {
                "pillar": "Character and Morality / Ethics and Values / Community and Civic Responsibility",
                "connection": "Specific connection to moral education"
            },
            "steam": {
                "science": "Science connection",
                "technology": "Technology connection",
                "engineering": "Engineering connection",
                "art": "Art connection",
                "math": "Math connection"
            },
            "links_to_subjects": "Specific links to other subjects",
            "environment": "Connection to sustainability and environmental awareness"
        }
    })
}

fn task_shape(tier: AbilityTier, what: &str) -> Value {
    json!({
        "activity": format!("{} {} for {} learners", tier.dok_label(), what, tier.key()),
        "questions": ["5 specific guiding questions, each prefixed with its DOK level like [DOK 2]"],
        "vak": "Visual/Auditory/Kinesthetic elements"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LessonRequestInput;

    fn lesson(gifted: bool) -> LessonRequest {
        LessonRequestInput::new("7", "Physics", "Newton's Laws", "2")
            .with_date("2024-01-15")
            .with_standard("PHY.7.2")
            .with_gifted_talented(gifted)
            .validate()
            .unwrap()
    }

    #[test]
    fn test_prompt_embeds_request_fields() {
        let prompt = build_user_prompt(&lesson(false));
        assert!(prompt.contains("- Grade: 7"));
        assert!(prompt.contains("- Topic: Newton's Laws"));
        assert!(prompt.contains("- Standards: PHY.7.2"));
        assert!(prompt.contains("- Digital Platform: Not specified"));
        assert!(prompt.contains("development and application of concepts"));
        assert!(prompt.contains("- Gifted/Talented: No"));
    }

    #[test]
    fn test_shape_omits_gifted_when_not_requested() {
        let shape = response_shape(false);
        assert!(shape["cooperative_tasks"].get("gifted").is_none());
        assert!(shape["differentiated_outcomes"].get("upper").is_some());

        let shape = response_shape(true);
        assert!(shape["independent_tasks"].get("gifted").is_some());
    }

    #[test]
    fn test_build_request_uses_system_prompt() {
        let request = build_request(&lesson(true));
        assert_eq!(request.system_prompt, SYSTEM_PROMPT);
        assert!(request.prompt.contains("Include the \"gifted\" tier"));
    }
}
