//! Employee record store.
//!
//! Predicates are evaluated in Rust over the fetched rows instead of being
//! translated to SQL: SQLite's default collation is not case-insensitive for
//! Cyrillic, and the staff table is small enough that a full scan per query
//! is the simpler contract. `find_first` therefore returns matches in id
//! (insertion) order — implementation-defined, not contractual.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use staffbot_core::{Employee, NewEmployee, Predicate, RecordStore};
use staffbot_entities::employees;
use tracing::info;

use crate::StorageEngine;

fn to_employee(model: employees::Model) -> Employee {
    Employee {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        phone: model.phone,
        position: model.position,
        department: model.department,
        birthday_day: model.birthday_day.and_then(|d| u8::try_from(d).ok()),
        birthday_month: model.birthday_month.and_then(|m| u8::try_from(m).ok()),
    }
}

impl StorageEngine {
    async fn fetch_all_ordered(&self) -> anyhow::Result<Vec<Employee>> {
        let models = employees::Entity::find()
            .order_by_asc(employees::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(to_employee).collect())
    }

    /// Insert a new employee. Uniqueness of the email is the caller's
    /// responsibility; the store accepts anything validated upstream.
    pub async fn insert_employee(&self, data: NewEmployee) -> anyhow::Result<Employee> {
        let model = employees::ActiveModel {
            first_name: Set(data.first_name),
            last_name: Set(data.last_name),
            email: Set(data.email),
            phone: Set(data.phone),
            position: Set(data.position),
            department: Set(data.department),
            birthday_day: Set(data.birthday_day.map(i16::from)),
            birthday_month: Set(data.birthday_month.map(i16::from)),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Inserted employee {} {}", model.first_name, model.last_name);
        Ok(to_employee(model))
    }

    /// All employees ordered by last name, for the `/employees` listing.
    pub async fn list_employees(&self) -> anyhow::Result<Vec<Employee>> {
        let models = employees::Entity::find()
            .order_by_asc(employees::Column::LastName)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(to_employee).collect())
    }
}

#[async_trait]
impl RecordStore for StorageEngine {
    async fn find_first(&self, predicate: &Predicate) -> anyhow::Result<Option<Employee>> {
        Ok(self
            .fetch_all_ordered()
            .await?
            .into_iter()
            .find(|emp| predicate.matches(emp)))
    }

    async fn find_all(&self, predicate: &Predicate) -> anyhow::Result<Vec<Employee>> {
        Ok(self
            .fetch_all_ordered()
            .await?
            .into_iter()
            .filter(|emp| predicate.matches(emp))
            .collect())
    }
}
