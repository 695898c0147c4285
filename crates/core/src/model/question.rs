use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Structural validation errors for generated questions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("expected {expected} options, got {got}")]
    WrongOptionCount { expected: usize, got: usize },

    #[error("duplicate option: {0}")]
    DuplicateOption(String),

    #[error("correct option is not among the options: {0}")]
    CorrectOptionMissing(String),

    #[error("cloze prompt must contain exactly one blank marker, found {0}")]
    BadBlankCount(usize),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Marker a cloze prompt uses for the blank to fill.
pub const BLANK_MARKER: &str = "_______";

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// Exercise shape of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Pick the right answer to a free-form prompt.
    MultipleChoice,
    /// Fill the single blank in the prompt.
    Cloze,
}

/// Bilingual example sentence shown with the explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamplePair {
    pub target: String,
    pub native: String,
}

/// One quiz exercise produced by the question generation service.
///
/// Questions are immutable once built. A missed question is never edited in
/// place; [`Question::review_copy`] produces the entity that gets appended to
/// the session queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    kind: QuestionKind,
    prompt: String,
    options: Vec<String>,
    correct_option: String,
    explanation: String,
    example: ExamplePair,
    review: bool,
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// - `EmptyPrompt` if the prompt is blank
    /// - `WrongOptionCount` / `DuplicateOption` if the options are not 4 unique strings
    /// - `CorrectOptionMissing` if the correct option is not among the options
    /// - `BadBlankCount` if a cloze prompt does not contain exactly one blank marker
    pub fn new(
        kind: QuestionKind,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: impl Into<String>,
        explanation: impl Into<String>,
        example: ExamplePair,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let correct_option = correct_option.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount {
                expected: OPTION_COUNT,
                got: options.len(),
            });
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].contains(option) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }
        if !options.contains(&correct_option) {
            return Err(QuestionError::CorrectOptionMissing(correct_option));
        }
        if kind == QuestionKind::Cloze {
            let blanks = prompt.matches(BLANK_MARKER).count();
            if blanks != 1 {
                return Err(QuestionError::BadBlankCount(blanks));
            }
        }

        Ok(Self {
            kind,
            prompt,
            options,
            correct_option,
            explanation: explanation.into(),
            example,
            review: false,
        })
    }

    /// Copy of this question flagged for review, appended to the queue after
    /// a miss so the concept resurfaces later in the same session.
    #[must_use]
    pub fn review_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.review = true;
        copy
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.correct_option
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn example(&self) -> &ExamplePair {
        &self.example
    }

    /// True for requeued copies of a missed question.
    #[must_use]
    pub fn is_review(&self) -> bool {
        self.review
    }

    /// Whether the given option is the correct one.
    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_option == option
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["le".into(), "la".into(), "les".into(), "l'".into()]
    }

    fn example() -> ExamplePair {
        ExamplePair {
            target: "Je la regarde.".into(),
            native: "La guardo.".into(),
        }
    }

    #[test]
    fn builds_a_multiple_choice_question() {
        let q = Question::new(
            QuestionKind::MultipleChoice,
            "Come si dice 'La guardo'?",
            options(),
            "la",
            "Il pronome COD va prima del verbo.",
            example(),
        )
        .unwrap();

        assert!(!q.is_review());
        assert!(q.is_correct("la"));
        assert!(!q.is_correct("le"));
    }

    #[test]
    fn rejects_correct_option_outside_options() {
        let err = Question::new(
            QuestionKind::MultipleChoice,
            "Prompt",
            options(),
            "nous",
            "",
            example(),
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::CorrectOptionMissing(o) if o == "nous"));
    }

    #[test]
    fn rejects_wrong_option_count_and_duplicates() {
        let err = Question::new(
            QuestionKind::MultipleChoice,
            "Prompt",
            vec!["a".into(), "b".into()],
            "a",
            "",
            example(),
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::WrongOptionCount { got: 2, .. }));

        let err = Question::new(
            QuestionKind::MultipleChoice,
            "Prompt",
            vec!["a".into(), "b".into(), "a".into(), "c".into()],
            "a",
            "",
            example(),
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::DuplicateOption(o) if o == "a"));
    }

    #[test]
    fn cloze_needs_exactly_one_blank() {
        let ok = Question::new(
            QuestionKind::Cloze,
            format!("Je {BLANK_MARKER} regarde."),
            options(),
            "la",
            "",
            example(),
        );
        assert!(ok.is_ok());

        let err = Question::new(
            QuestionKind::Cloze,
            "Je regarde.",
            options(),
            "la",
            "",
            example(),
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::BadBlankCount(0)));

        let err = Question::new(
            QuestionKind::Cloze,
            format!("{BLANK_MARKER} je {BLANK_MARKER}."),
            options(),
            "la",
            "",
            example(),
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::BadBlankCount(2)));
    }

    #[test]
    fn review_copy_keeps_fields_and_sets_flag() {
        let q = Question::new(
            QuestionKind::MultipleChoice,
            "Prompt",
            options(),
            "la",
            "Spiegazione",
            example(),
        )
        .unwrap();

        let copy = q.review_copy();
        assert!(copy.is_review());
        assert_eq!(copy.prompt(), q.prompt());
        assert_eq!(copy.options(), q.options());
        assert_eq!(copy.correct_option(), q.correct_option());

        // A review copy of a review copy stays flagged.
        assert!(copy.review_copy().is_review());
    }
}
