// Interview Orchestration Engine
// Implements: resume keyword extraction, question bank construction, the
// conversation state machine, per-candidate sessions and their HTTP surface.

pub mod chooser;
pub mod extractor;
pub mod handlers;
pub mod question_bank;
pub mod session;
pub mod state_machine;
pub mod store;
