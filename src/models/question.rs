use std::fmt;

use serde::{Deserialize, Serialize};

/// Subjects known to the question bank, in display order.
pub const SUBJECTS: [&str; 5] = ["Physics", "Chemistry", "Botany", "Zoology", "Mental Agility Test"];

/// Opaque question identifier.
///
/// The service hands out numeric ids today, but nothing here depends on that:
/// the id is sent back exactly as it was received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{}", n),
            QuestionId::Text(s) => f.write_str(s),
        }
    }
}

/// A question as served to a test-taker: no answer, no explanation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuizQuestion {
    pub id: QuestionId,
    #[serde(default)]
    pub subject: Option<String>,
    pub question: String,
    pub options: [String; 4],
}

impl QuizQuestion {
    /// Position of `text` among the options, if any.
    pub fn option_index(&self, text: &str) -> Option<usize> {
        self.options.iter().position(|o| o == text)
    }
}

/// A full question-bank record as seen by administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankQuestion {
    pub id: QuestionId,
    pub subject: String,
    pub question: String,
    pub options: [String; 4],
    pub answer: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl BankQuestion {
    /// Options joined into a single cell for table display.
    pub fn options_cell(&self) -> String {
        self.options.join(" | ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Next (or previous) difficulty, wrapping around.
    pub fn cycle(self, forward: bool) -> Self {
        let pos = Self::ALL.iter().position(|d| *d == self).unwrap_or(1);
        let len = Self::ALL.len();
        let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
        Self::ALL[next]
    }
}

impl From<String> for Difficulty {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject filter for the admin list. `All` is the service's sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubjectFilter {
    #[default]
    All,
    Subject(String),
}

impl SubjectFilter {
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("all") {
            SubjectFilter::All
        } else {
            SubjectFilter::Subject(name.to_string())
        }
    }

    /// Value sent in the `subject` query parameter.
    pub fn query_value(&self) -> &str {
        match self {
            SubjectFilter::All => "All",
            SubjectFilter::Subject(name) => name,
        }
    }

    /// Step through `All` followed by every known subject.
    pub fn cycle(&self, forward: bool) -> Self {
        let len = SUBJECTS.len() + 1;
        let pos = match self {
            SubjectFilter::All => 0,
            SubjectFilter::Subject(name) => SUBJECTS
                .iter()
                .position(|s| s == name)
                .map(|i| i + 1)
                .unwrap_or(0),
        };
        let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
        if next == 0 {
            SubjectFilter::All
        } else {
            SubjectFilter::Subject(SUBJECTS[next - 1].to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_id_keeps_wire_form() {
        let ids: Vec<QuestionId> = serde_json::from_str(r#"[7, "q-7"]"#).unwrap();
        assert_eq!(ids[0], QuestionId::Number(7));
        assert_eq!(ids[1], QuestionId::Text("q-7".to_string()));
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[7,"q-7"]"#);
        assert_eq!(ids[0].to_string(), "7");
    }

    #[test]
    fn test_difficulty_is_lenient() {
        let parsed: Vec<Difficulty> = serde_json::from_str(r#"["easy", "HARD", "Medium", "tricky"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![Difficulty::Easy, Difficulty::Hard, Difficulty::Medium, Difficulty::Medium]
        );
        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"Hard\"");
    }

    #[test]
    fn test_bank_question_defaults() {
        let json = r#"{"id": 1, "subject": "Physics", "question": "Q?",
            "options": ["a", "b", "c", "d"], "answer": "b"}"#;
        let q: BankQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(q.difficulty, Difficulty::Medium);
        assert_eq!(q.explanation, None);
        assert_eq!(q.options_cell(), "a | b | c | d");
    }

    #[test]
    fn test_quiz_question_rejects_wrong_option_count() {
        let json = r#"{"id": 1, "question": "Q?", "options": ["a", "b", "c"]}"#;
        assert!(serde_json::from_str::<QuizQuestion>(json).is_err());
    }

    #[test]
    fn test_subject_filter_cycle() {
        let all = SubjectFilter::from_name("all");
        assert_eq!(all, SubjectFilter::All);
        let physics = all.cycle(true);
        assert_eq!(physics, SubjectFilter::Subject("Physics".to_string()));
        assert_eq!(physics.cycle(false), SubjectFilter::All);
        assert_eq!(
            SubjectFilter::All.cycle(false),
            SubjectFilter::Subject("Mental Agility Test".to_string())
        );
        assert_eq!(physics.query_value(), "Physics");
    }
}
