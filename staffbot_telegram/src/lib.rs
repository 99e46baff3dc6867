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

//! Telegram transport: dispatcher wiring, command handling and the
//! per-message gate → classify → resolve → converse pipeline.

mod auth;
mod bot;
mod command;
mod error;
mod handler;
mod pipeline;
mod ratelimit;

pub use auth::is_admin;
pub use bot::TelegramBot;
pub use command::Command;
pub use error::{Error, Result};
pub use pipeline::MessagePipeline;
pub use ratelimit::RateLimiter;
