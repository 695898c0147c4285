use std::sync::Arc;

use crate::error::QuizError;
use crate::generation::QuestionGenerator;
use crate::sessions::service::{LoadOutcome, QuizSession};

/// Drives a session through its loading phase against a question generator.
///
/// The state machine stays synchronous; this is the only place where a
/// session transition waits on the network.
#[derive(Clone)]
pub struct QuizLoopService {
    generator: Arc<dyn QuestionGenerator>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(generator: Arc<dyn QuestionGenerator>) -> Self {
        Self { generator }
    }

    /// Sizes the session, fetches questions, and starts playing.
    ///
    /// On any failure the session is returned to setup so the learner can
    /// retry with the same or different settings.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotInSetup` if the session is not in setup,
    /// `QuizError::NoQuestions` if the generator yielded an empty batch, and
    /// `QuizError::Generation` for service failures.
    pub async fn start(&self, session: &mut QuizSession) -> Result<(), QuizError> {
        let (attempt, count) = session.begin_loading()?;

        let questions = match self
            .generator
            .generate(session.topic(), session.level(), count)
            .await
        {
            Ok(questions) => questions,
            Err(err) => {
                session.fail_loading(attempt);
                return Err(err.into());
            }
        };

        match session.complete_loading(attempt, questions) {
            LoadOutcome::Started => Ok(()),
            LoadOutcome::ReturnedToSetup => Err(QuizError::NoQuestions),
            LoadOutcome::IgnoredStale => {
                // The session was reset while the request was in flight.
                tracing::debug!("discarding generation result for a stale attempt");
                Ok(())
            }
        }
    }
}
