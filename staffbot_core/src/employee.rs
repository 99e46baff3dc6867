//! Employee record shared across the directory pipeline and storage.

use serde::{Deserialize, Serialize};

/// A directory record. Identity is `id`; everything else is mutable
/// best-effort data entered by humans. `position` is frequently empty while
/// `department` carries a "Company, Role" string, so the role of a person may
/// only exist after the comma of `department`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub birthday_day: Option<u8>,
    pub birthday_month: Option<u8>,
}

impl Employee {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// A birthday is displayable only when both halves are present.
    #[must_use]
    pub const fn birthday(&self) -> Option<(u8, u8)> {
        match (self.birthday_day, self.birthday_month) {
            (Some(day), Some(month)) => Some((day, month)),
            _ => None,
        }
    }
}

/// Payload for creating an employee. Validation happens before this reaches
/// the store; the store itself accepts anything.
#[derive(Debug, Clone, Default)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub birthday_day: Option<u8>,
    pub birthday_month: Option<u8>,
}
