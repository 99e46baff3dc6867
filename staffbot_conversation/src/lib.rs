#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Per-user conversation state for the fallback assistant.
//!
//! Sessions are loaded fail-open (any storage problem degrades to an empty
//! history), truncated to a bounded window after every user turn, and saved
//! whole, last-writer-wins. A background sweep removes sessions that have
//! been idle too long.

mod history;
mod manager;
mod session;

pub use history::truncate_oldest;
pub use manager::{ConversationConfig, ConversationManager, SessionManager};
pub use session::ConversationSession;
