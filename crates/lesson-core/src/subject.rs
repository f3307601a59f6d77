//! Subject areas the template engine knows about.

/// Vocabulary used for any subject the engine does not recognize.
pub const GENERIC_VOCABULARY: [&str; 8] = [
    "Concept",
    "Analysis",
    "Evaluation",
    "Application",
    "Synthesis",
    "Evidence",
    "Reasoning",
    "Conclusion",
];

pub const PHYSICS_VOCABULARY: [&str; 8] = [
    "Force",
    "Mass",
    "Acceleration",
    "Velocity",
    "Inertia",
    "Friction",
    "Gravity",
    "Momentum",
];

const MATHEMATICS_VOCABULARY: [&str; 8] = [
    "Equation",
    "Variable",
    "Coefficient",
    "Expression",
    "Function",
    "Ratio",
    "Proportion",
    "Graph",
];

const CHEMISTRY_VOCABULARY: [&str; 8] = [
    "Atom",
    "Molecule",
    "Element",
    "Compound",
    "Reaction",
    "Chemical Bond",
    "Ion",
    "Mole",
];

const BIOLOGY_VOCABULARY: [&str; 8] = [
    "Cell",
    "Organism",
    "Tissue",
    "Organ",
    "Photosynthesis",
    "Respiration",
    "Ecosystem",
    "Adaptation",
];

const SCIENCE_VOCABULARY: [&str; 8] = [
    "Hypothesis",
    "Experiment",
    "Variable",
    "Observation",
    "Data",
    "Conclusion",
    "Evidence",
    "Prediction",
];

const ENGLISH_VOCABULARY: [&str; 9] = [
    "Theme",
    "Character",
    "Setting",
    "Plot",
    "Conflict",
    "Narrator",
    "Figurative Language",
    "Inference",
    "Summary",
];

const COMPUTING_VOCABULARY: [&str; 10] = [
    "Algorithm",
    "Variable",
    "Loop",
    "Condition",
    "Function",
    "Debugging",
    "Input",
    "Output",
    "Data Type",
    "Sequence",
];

const SOCIAL_STUDIES_VOCABULARY: [&str; 8] = [
    "Culture",
    "Heritage",
    "Citizenship",
    "Government",
    "Economy",
    "Geography",
    "Tradition",
    "Community",
];

/// A recognized school subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectArea {
    Mathematics,
    Physics,
    Chemistry,
    Biology,
    Science,
    English,
    Computing,
    SocialStudies,
}

impl SubjectArea {
    /// Match a free-text subject name. Case and surrounding whitespace are ignored.
    pub fn recognize(subject: &str) -> Option<Self> {
        let area = match subject.trim().to_lowercase().as_str() {
            "mathematics" | "math" | "maths" => SubjectArea::Mathematics,
            "physics" => SubjectArea::Physics,
            "chemistry" => SubjectArea::Chemistry,
            "biology" => SubjectArea::Biology,
            "science" | "general science" => SubjectArea::Science,
            "english" | "english language" => SubjectArea::English,
            "computer science" | "computing" | "ict" => SubjectArea::Computing,
            "social studies" | "moral, social and cultural studies" => SubjectArea::SocialStudies,
            _ => return None,
        };
        Some(area)
    }

    pub fn vocabulary(self) -> &'static [&'static str] {
        match self {
            SubjectArea::Mathematics => &MATHEMATICS_VOCABULARY,
            SubjectArea::Physics => &PHYSICS_VOCABULARY,
            SubjectArea::Chemistry => &CHEMISTRY_VOCABULARY,
            SubjectArea::Biology => &BIOLOGY_VOCABULARY,
            SubjectArea::Science => &SCIENCE_VOCABULARY,
            SubjectArea::English => &ENGLISH_VOCABULARY,
            SubjectArea::Computing => &COMPUTING_VOCABULARY,
            SubjectArea::SocialStudies => &SOCIAL_STUDIES_VOCABULARY,
        }
    }

    /// Cross-curricular links suggested for this subject.
    pub fn subject_links(self) -> &'static str {
        match self {
            SubjectArea::Mathematics => {
                "Science (measurement and data), ICT (spreadsheets and graphing tools), English (explaining reasoning in writing)"
            }
            SubjectArea::Physics | SubjectArea::Chemistry | SubjectArea::Biology | SubjectArea::Science => {
                "Mathematics (equations, graphs and data handling), English (scientific report writing), ICT (simulations and data logging)"
            }
            SubjectArea::English => {
                "Social Studies (texts about UAE heritage), Arabic (comparing language features), ICT (digital publishing)"
            }
            SubjectArea::Computing => {
                "Mathematics (logic and sequences), Science (data collection), Art (digital design)"
            }
            SubjectArea::SocialStudies => {
                "English (research and presentation), Mathematics (population and economic data), Arabic (primary sources)"
            }
        }
    }

    /// A UAE landmark or institution that makes the subject concrete.
    pub fn uae_context(self) -> &'static str {
        match self {
            SubjectArea::Mathematics => "the financial planning behind Expo City Dubai",
            SubjectArea::Physics => "the engineering of the Dubai Metro and the Barakah nuclear energy plant",
            SubjectArea::Chemistry => "desalination plants and the petrochemical industry in Ruwais",
            SubjectArea::Biology => "mangrove conservation in Abu Dhabi and the Arabian oryx breeding programme",
            SubjectArea::Science => "the Emirates Mars Mission and research at Masdar City",
            SubjectArea::English => "the Sharjah International Book Fair and UAE literary voices",
            SubjectArea::Computing => "the UAE's smart government services and AI strategy",
            SubjectArea::SocialStudies => "Qasr Al Hosn and the story of the union of the Emirates",
        }
    }
}

/// Vocabulary for a subject name, falling back to [`GENERIC_VOCABULARY`].
pub fn vocabulary_for(subject: &str) -> Vec<String> {
    let terms: &[&str] = match SubjectArea::recognize(subject) {
        Some(area) => area.vocabulary(),
        None => &GENERIC_VOCABULARY,
    };
    terms.iter().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognize_is_case_insensitive() {
        assert_eq!(SubjectArea::recognize("  PHYSICS "), Some(SubjectArea::Physics));
        assert_eq!(SubjectArea::recognize("Maths"), Some(SubjectArea::Mathematics));
        assert_eq!(SubjectArea::recognize("ICT"), Some(SubjectArea::Computing));
        assert_eq!(SubjectArea::recognize("Underwater Basket Weaving"), None);
    }

    #[test]
    fn test_unknown_subject_gets_generic_list() {
        let vocab = vocabulary_for("Astrology");
        assert_eq!(vocab.len(), 8);
        assert_eq!(vocab, GENERIC_VOCABULARY.map(String::from).to_vec());
    }

    #[test]
    fn test_vocabulary_sizes_follow_convention() {
        for area in [
            SubjectArea::Mathematics,
            SubjectArea::Physics,
            SubjectArea::Chemistry,
            SubjectArea::Biology,
            SubjectArea::Science,
            SubjectArea::English,
            SubjectArea::Computing,
            SubjectArea::SocialStudies,
        ] {
            let n = area.vocabulary().len();
            assert!((8..=10).contains(&n), "{:?} has {} terms", area, n);
        }
    }
}
