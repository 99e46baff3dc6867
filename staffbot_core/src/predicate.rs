//! Closed predicate algebra for record-store queries.
//!
//! The resolver builds its strategy queries out of these values, so the whole
//! chain is type-checked down to the store. All string comparison is
//! case-insensitive; `Contains` is plain substring containment with no token
//! boundaries ("Иван" matches "Иванов").

use crate::Employee;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Position,
    Department,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Equals,
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Test {
        field: Field,
        mode: MatchMode,
        value: String,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    #[must_use]
    pub fn equals(field: Field, value: impl Into<String>) -> Self {
        Self::Test {
            field,
            mode: MatchMode::Equals,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn contains(field: Field, value: impl Into<String>) -> Self {
        Self::Test {
            field,
            mode: MatchMode::Contains,
            value: value.into(),
        }
    }

    /// Evaluate against a record. Absent fields never match.
    #[must_use]
    pub fn matches(&self, employee: &Employee) -> bool {
        match self {
            Self::Test { field, mode, value } => {
                field_value(employee, *field).is_some_and(|field_value| {
                    let haystack = field_value.to_lowercase();
                    let needle = value.to_lowercase();
                    match mode {
                        MatchMode::Equals => haystack == needle,
                        MatchMode::Contains => haystack.contains(&needle),
                    }
                })
            }
            Self::And(parts) => parts.iter().all(|p| p.matches(employee)),
            Self::Or(parts) => parts.iter().any(|p| p.matches(employee)),
        }
    }
}

fn field_value(employee: &Employee, field: Field) -> Option<&str> {
    match field {
        Field::FirstName => Some(employee.first_name.as_str()),
        Field::LastName => Some(employee.last_name.as_str()),
        Field::Email => employee.email.as_deref(),
        Field::Position => employee.position.as_deref(),
        Field::Department => employee.department.as_deref(),
    }
}
