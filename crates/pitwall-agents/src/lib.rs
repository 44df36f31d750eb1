//! Pitwall agents: the planner that routes each query, the race QA
//! assembler, and the text agents. Every agent answers even when the
//! generation backend is down.

mod assistant;
pub mod nlp;
pub mod offline;
mod planner;
pub mod prompts;
pub mod qa;

#[cfg(test)]
mod testing;

pub use assistant::{AgentSettings, Assistant};
pub use offline::{GENERIC_ANSWER, offline_answer};
pub use planner::NO_LIVE_DATA;
pub use qa::{EMPTY_QUESTION_ANSWER, QaStage};
