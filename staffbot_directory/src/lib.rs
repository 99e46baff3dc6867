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

//! Directory query pipeline: admission gate, entity extraction and the
//! ordered strategy chain that answers employee questions.
//!
//! Control flow for one message: [`classifier::is_directory_query`] decides
//! whether the text is in scope at all; only then does
//! [`resolver::DirectoryResolver`] run its strategies against the record
//! store. A [`resolver::Resolution::Conversation`] outcome means the caller
//! falls through to the conversational assistant.

pub mod classifier;
pub mod extract;
pub mod format;
pub mod resolver;
pub mod validate;

pub use classifier::is_directory_query;
pub use extract::{extract_capitalized_token, extract_email, extract_name};
pub use format::{CLARIFY_PROMPT, NOT_FOUND, format_employee_info};
pub use resolver::{DirectoryResolver, Resolution};
pub use validate::validate_new_employee;
