#![forbid(unsafe_code)]

pub mod dialogue;
pub mod error;
pub mod generation;
pub mod roleplay;
pub mod sessions;
pub mod speech;

pub use tutor_core::Clock;

pub use error::{DialogueError, GenerationError, QuizError, RoleplayError, SpeechError};

pub use dialogue::{DialogueGenerator, HttpDialogueGenerator};
pub use generation::{GeneratorConfig, HttpQuestionGenerator, QuestionGenerator};
pub use roleplay::RoleplayService;
pub use sessions::{
    Advance, AnswerFeedback, LoadOutcome, QuizLoopService, QuizPhase, QuizSession,
};
pub use speech::{
    SpeechInput, SpeechOutput, SpeechRequest, SpeechSequencer, Voice, VoiceSettings,
};
