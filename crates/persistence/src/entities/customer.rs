//! Customer entity definition.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Customer;

/// Database entity for the customers table.
#[derive(Debug, Clone, FromRow)]
pub struct CustomerEntity {
    pub id: i64,
    pub customer_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub breed: Option<String>,
    pub last_groomed_at: Option<DateTime<Utc>>,
    pub reminders_opt_in: bool,
    pub created_at: DateTime<Utc>,
}

impl From<CustomerEntity> for Customer {
    fn from(e: CustomerEntity) -> Self {
        Self {
            id: e.id,
            customer_id: e.customer_id,
            name: e.name,
            email: e.email,
            phone: e.phone,
            breed: e.breed,
            last_groomed_at: e.last_groomed_at,
            reminders_opt_in: e.reminders_opt_in,
            created_at: e.created_at,
        }
    }
}
