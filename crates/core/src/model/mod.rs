mod conversation;
mod ids;
mod level;
mod persona;
mod question;
mod topic;

pub use conversation::{Conversation, ConversationTurn, Correction, Speaker};
pub use ids::AttemptId;
pub use level::{LevelError, ProficiencyLevel};
pub use persona::Persona;
pub use question::{BLANK_MARKER, ExamplePair, OPTION_COUNT, Question, QuestionError, QuestionKind};
pub use topic::TopicId;
