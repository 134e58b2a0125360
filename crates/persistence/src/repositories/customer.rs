//! Customer repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CustomerEntity;

/// Repository for customer rows.
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a customer by public id.
    pub async fn find_by_customer_id(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<CustomerEntity>, sqlx::Error> {
        sqlx::query_as::<_, CustomerEntity>(
            r#"
            SELECT id, customer_id, name, email, phone, breed, last_groomed_at,
                   reminders_opt_in, created_at
            FROM customers
            WHERE customer_id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Customers eligible for the reminder sweep: opted in with a recorded
    /// last groom. The breed-interval rule is applied by the caller.
    pub async fn list_reminder_candidates(&self) -> Result<Vec<CustomerEntity>, sqlx::Error> {
        sqlx::query_as::<_, CustomerEntity>(
            r#"
            SELECT id, customer_id, name, email, phone, breed, last_groomed_at,
                   reminders_opt_in, created_at
            FROM customers
            WHERE reminders_opt_in = TRUE AND last_groomed_at IS NOT NULL
            ORDER BY last_groomed_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
