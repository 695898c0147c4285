use tutor_core::model::{AttemptId, ProficiencyLevel, Question, TopicId};
use tutor_core::pacing;

use crate::error::QuizError;

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Lifecycle phase of a practice session.
///
/// Explicit phases instead of loading flags: a late generation result can be
/// checked against the phase (and attempt id) and dropped once the session
/// has moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Learner is choosing level and time budget.
    Setup,
    /// A generation round-trip is outstanding; input is rejected.
    Loading,
    /// Stepping through the question queue.
    Playing,
    /// All questions answered; final score available.
    Finished,
}

/// What happened to a generation result handed to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Questions accepted; the session is now playing.
    Started,
    /// The batch was empty; the session returned to setup for a retry.
    ReturnedToSetup,
    /// The session was reset or re-started meanwhile; result dropped.
    IgnoredStale,
}

/// Feedback emitted once per answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct_option: String,
}

/// Result of advancing past an answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next question.
    Next,
    /// The queue is exhausted; the session is finished.
    Finished,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory playthrough state for one practice session.
///
/// Owns the question queue, cursor, score, and streak. Missed questions are
/// requeued as review copies at the end of the queue so the concept
/// resurfaces later in the same session.
#[derive(Debug, Clone)]
pub struct QuizSession {
    topic: TopicId,
    level: ProficiencyLevel,
    minutes: u32,
    target_count: usize,
    phase: QuizPhase,
    attempt: Option<AttemptId>,
    questions: Vec<Question>,
    cursor: usize,
    answered_current: bool,
    score: u32,
    streak: u32,
}

impl QuizSession {
    /// Creates a session in setup with default configuration.
    #[must_use]
    pub fn new(topic: TopicId) -> Self {
        Self {
            topic,
            level: ProficiencyLevel::A2,
            minutes: 5,
            target_count: 0,
            phase: QuizPhase::Setup,
            attempt: None,
            questions: Vec::new(),
            cursor: 0,
            answered_current: false,
            score: 0,
            streak: 0,
        }
    }

    /// Stores the chosen level and time budget. Does not transition.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotInSetup` outside the setup phase.
    pub fn configure(&mut self, level: ProficiencyLevel, minutes: u32) -> Result<(), QuizError> {
        if self.phase != QuizPhase::Setup {
            return Err(QuizError::NotInSetup);
        }
        self.level = level;
        self.minutes = minutes;
        Ok(())
    }

    /// Moves to loading and sizes the session.
    ///
    /// Returns the attempt id the eventual generation result must carry and
    /// the number of questions to request.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotInSetup` outside the setup phase.
    pub fn begin_loading(&mut self) -> Result<(AttemptId, usize), QuizError> {
        if self.phase != QuizPhase::Setup {
            return Err(QuizError::NotInSetup);
        }
        self.target_count = pacing::exercise_count(self.level, self.minutes);
        let attempt = AttemptId::new();
        self.attempt = Some(attempt);
        self.phase = QuizPhase::Loading;
        Ok((attempt, self.target_count))
    }

    /// Applies a generation result to the loading session.
    ///
    /// Stale results (wrong attempt id, or the session left the loading
    /// phase) are ignored. An empty batch sends the session back to setup.
    pub fn complete_loading(
        &mut self,
        attempt: AttemptId,
        questions: Vec<Question>,
    ) -> LoadOutcome {
        if self.phase != QuizPhase::Loading || self.attempt != Some(attempt) {
            return LoadOutcome::IgnoredStale;
        }
        if questions.is_empty() {
            self.phase = QuizPhase::Setup;
            return LoadOutcome::ReturnedToSetup;
        }

        self.questions = questions;
        self.cursor = 0;
        self.answered_current = false;
        self.score = 0;
        self.streak = 0;
        self.phase = QuizPhase::Playing;
        LoadOutcome::Started
    }

    /// Records a failed generation attempt, returning the session to setup.
    ///
    /// Stale failures are ignored like stale results.
    pub fn fail_loading(&mut self, attempt: AttemptId) -> LoadOutcome {
        if self.phase != QuizPhase::Loading || self.attempt != Some(attempt) {
            return LoadOutcome::IgnoredStale;
        }
        self.phase = QuizPhase::Setup;
        LoadOutcome::ReturnedToSetup
    }

    /// Scores the selected option against the current question.
    ///
    /// Once per question instance: a second call for the same cursor is a
    /// no-op returning `None`. Does not advance the cursor.
    ///
    /// A correct answer increments the streak, and the score unless the
    /// question is a review copy (a concept never scores twice). A miss
    /// resets the streak and appends a review copy to the end of the queue.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotPlaying` outside the playing phase.
    pub fn answer(&mut self, selected: &str) -> Result<Option<AnswerFeedback>, QuizError> {
        if self.phase != QuizPhase::Playing {
            return Err(QuizError::NotPlaying);
        }
        if self.answered_current {
            return Ok(None);
        }
        self.answered_current = true;

        let question = &self.questions[self.cursor];
        let is_correct = question.is_correct(selected);
        let correct_option = question.correct_option().to_string();

        if is_correct {
            if !question.is_review() {
                self.score += 1;
            }
            self.streak += 1;
        } else {
            self.streak = 0;
            let review = question.review_copy();
            self.questions.push(review);
        }

        Ok(Some(AnswerFeedback {
            is_correct,
            correct_option,
        }))
    }

    /// Steps to the next question, or finishes the session at the end of the
    /// queue.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotPlaying` outside the playing phase and
    /// `QuizError::CurrentUnanswered` if the current question has not been
    /// answered yet.
    pub fn advance(&mut self) -> Result<Advance, QuizError> {
        if self.phase != QuizPhase::Playing {
            return Err(QuizError::NotPlaying);
        }
        if !self.answered_current {
            return Err(QuizError::CurrentUnanswered);
        }

        if self.cursor + 1 < self.questions.len() {
            self.cursor += 1;
            self.answered_current = false;
            Ok(Advance::Next)
        } else {
            self.phase = QuizPhase::Finished;
            Ok(Advance::Finished)
        }
    }

    /// Returns to setup from any phase, discarding the playthrough.
    ///
    /// Also invalidates the attempt id, so a generation result that arrives
    /// after the reset is dropped.
    pub fn reset(&mut self) {
        self.phase = QuizPhase::Setup;
        self.attempt = None;
        self.questions.clear();
        self.cursor = 0;
        self.answered_current = false;
        self.score = 0;
        self.streak = 0;
    }

    #[must_use]
    pub fn topic(&self) -> TopicId {
        self.topic
    }

    #[must_use]
    pub fn level(&self) -> ProficiencyLevel {
        self.level
    }

    #[must_use]
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Number of questions requested for the current attempt.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Zero-based position in the queue.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Queue length including requeued review copies.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == QuizPhase::Playing {
            self.questions.get(self.cursor)
        } else {
            None
        }
    }

    /// Whether the current question has already been answered.
    #[must_use]
    pub fn current_answered(&self) -> bool {
        self.answered_current
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::model::{ExamplePair, QuestionKind};

    fn question(prompt: &str, correct: &str) -> Question {
        let mut options = vec!["le".to_string(), "la".to_string(), "les".to_string()];
        if !options.iter().any(|o| o == correct) {
            options.push(correct.to_string());
        } else {
            options.push("l'".to_string());
        }
        Question::new(
            QuestionKind::MultipleChoice,
            prompt,
            options,
            correct,
            "Spiegazione",
            ExamplePair {
                target: "Je la regarde.".into(),
                native: "La guardo.".into(),
            },
        )
        .unwrap()
    }

    fn playing_session(questions: Vec<Question>) -> QuizSession {
        let mut session = QuizSession::new(TopicId::Cod);
        let (attempt, _) = session.begin_loading().unwrap();
        assert_eq!(
            session.complete_loading(attempt, questions),
            LoadOutcome::Started
        );
        session
    }

    #[test]
    fn configure_is_setup_only() {
        let mut session = QuizSession::new(TopicId::Cod);
        session.configure(ProficiencyLevel::C1, 10).unwrap();
        assert_eq!(session.level(), ProficiencyLevel::C1);
        assert_eq!(session.minutes(), 10);

        session.begin_loading().unwrap();
        let err = session.configure(ProficiencyLevel::A1, 5).unwrap_err();
        assert!(matches!(err, QuizError::NotInSetup));
    }

    #[test]
    fn begin_loading_sizes_the_session() {
        let mut session = QuizSession::new(TopicId::Cod);
        session.configure(ProficiencyLevel::A1, 15).unwrap();
        let (_, count) = session.begin_loading().unwrap();
        assert_eq!(count, 45);
        assert_eq!(session.phase(), QuizPhase::Loading);
        assert!(session.begin_loading().is_err());
    }

    #[test]
    fn empty_batch_returns_to_setup() {
        let mut session = QuizSession::new(TopicId::Cod);
        let (attempt, _) = session.begin_loading().unwrap();
        assert_eq!(
            session.complete_loading(attempt, Vec::new()),
            LoadOutcome::ReturnedToSetup
        );
        assert_eq!(session.phase(), QuizPhase::Setup);
    }

    #[test]
    fn stale_results_are_ignored() {
        let mut session = QuizSession::new(TopicId::Cod);
        let (attempt, _) = session.begin_loading().unwrap();
        session.reset();

        let outcome = session.complete_loading(attempt, vec![question("Q", "la")]);
        assert_eq!(outcome, LoadOutcome::IgnoredStale);
        assert_eq!(session.phase(), QuizPhase::Setup);
        assert_eq!(session.total_questions(), 0);

        // A result from a previous attempt loses to the newer one.
        let (old, _) = session.begin_loading().unwrap();
        session.reset();
        let (new, _) = session.begin_loading().unwrap();
        assert_eq!(
            session.complete_loading(old, vec![question("Q", "la")]),
            LoadOutcome::IgnoredStale
        );
        assert_eq!(
            session.complete_loading(new, vec![question("Q", "la")]),
            LoadOutcome::Started
        );
    }

    #[test]
    fn correct_answer_scores_and_extends_streak() {
        let mut session = playing_session(vec![question("Q1", "la"), question("Q2", "le")]);

        let feedback = session.answer("la").unwrap().unwrap();
        assert!(feedback.is_correct);
        assert_eq!(feedback.correct_option, "la");
        assert_eq!(session.score(), 1);
        assert_eq!(session.streak(), 1);
        assert_eq!(session.total_questions(), 2);
    }

    #[test]
    fn miss_requeues_one_identical_review_copy() {
        let mut session = playing_session(vec![question("Q1", "la"), question("Q2", "le")]);
        let before = session.total_questions();
        let original = session.current_question().unwrap().clone();

        let feedback = session.answer("le").unwrap().unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(session.streak(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.total_questions(), before + 1);

        let copy = session.questions.last().unwrap();
        assert!(copy.is_review());
        assert_eq!(copy.options(), original.options());
        assert_eq!(copy.correct_option(), original.correct_option());
    }

    #[test]
    fn answer_is_once_per_question_instance() {
        let mut session = playing_session(vec![question("Q1", "la")]);
        assert!(session.answer("le").unwrap().is_some());
        // Second call is a no-op: no extra requeue, no state change.
        assert!(session.answer("la").unwrap().is_none());
        assert_eq!(session.total_questions(), 2);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn advance_before_answer_is_an_error() {
        let mut session = playing_session(vec![question("Q1", "la"), question("Q2", "le")]);
        let err = session.advance().unwrap_err();
        assert!(matches!(err, QuizError::CurrentUnanswered));
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn advance_steps_and_finishes() {
        let mut session = playing_session(vec![question("Q1", "la"), question("Q2", "le")]);

        session.answer("la").unwrap();
        assert_eq!(session.advance().unwrap(), Advance::Next);
        assert_eq!(session.cursor(), 1);

        session.answer("le").unwrap();
        assert_eq!(session.advance().unwrap(), Advance::Finished);
        assert_eq!(session.phase(), QuizPhase::Finished);
        assert!(session.current_question().is_none());
        assert!(session.answer("la").is_err());
    }

    #[test]
    fn streak_counts_consecutive_correct_answers() {
        let mut session = playing_session(vec![
            question("Q1", "la"),
            question("Q2", "le"),
            question("Q3", "les"),
        ]);

        session.answer("la").unwrap();
        session.advance().unwrap();
        session.answer("le").unwrap();
        session.advance().unwrap();
        assert_eq!(session.streak(), 2);

        session.answer("la").unwrap(); // miss
        assert_eq!(session.streak(), 0);
    }

    #[test]
    fn full_playthrough_with_one_miss() {
        // Q1 correct, Q2 missed, Q3 correct, review copy of Q2 correct.
        let mut session = playing_session(vec![
            question("Q1", "la"),
            question("Q2", "le"),
            question("Q3", "les"),
        ]);

        session.answer("la").unwrap();
        session.advance().unwrap();
        session.answer("les").unwrap(); // miss, requeues Q2
        session.advance().unwrap();
        session.answer("les").unwrap();
        session.advance().unwrap();

        let review = session.current_question().unwrap();
        assert!(review.is_review());
        assert_eq!(review.prompt(), "Q2");

        session.answer("le").unwrap();
        assert_eq!(session.advance().unwrap(), Advance::Finished);

        // The review success rebuilds the streak but never re-scores the
        // concept.
        assert_eq!(session.total_questions(), 4);
        assert_eq!(session.score(), 2);
        assert_eq!(session.streak(), 2);
    }

    #[test]
    fn score_never_exceeds_distinct_questions() {
        let mut session = playing_session(vec![question("Q1", "la"), question("Q2", "le")]);

        // Miss both, then clear both review copies correctly.
        session.answer("le").unwrap();
        session.advance().unwrap();
        session.answer("la").unwrap();
        session.advance().unwrap();
        session.answer("la").unwrap();
        session.advance().unwrap();
        session.answer("le").unwrap();
        session.advance().unwrap();

        assert_eq!(session.phase(), QuizPhase::Finished);
        assert_eq!(session.total_questions(), 4);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn reset_discards_playthrough() {
        let mut session = playing_session(vec![question("Q1", "la")]);
        session.answer("la").unwrap();
        session.reset();

        assert_eq!(session.phase(), QuizPhase::Setup);
        assert_eq!(session.score(), 0);
        assert_eq!(session.streak(), 0);
        assert_eq!(session.total_questions(), 0);
    }
}
