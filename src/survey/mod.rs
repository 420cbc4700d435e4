pub mod agent;
pub mod questions;
pub mod responses;

pub use agent::{parse_reply, survey_prompt, PersonaAgent, Responder, StdinResponder};
pub use questions::{load_questions, Question, QuestionBank};
pub use responses::{load_response_file, missing_items, ResponseFile};
