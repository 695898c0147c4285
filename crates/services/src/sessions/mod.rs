//! Quiz playthrough state machine and its loading workflow.

mod service;
mod workflow;

pub use service::{Advance, AnswerFeedback, LoadOutcome, QuizPhase, QuizSession};
pub use workflow::QuizLoopService;
