use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::{DbManager, Result};

/// A stored subscriber record. Records are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl DbManager {
    /// Appends a new subscriber and returns the id assigned by the database.
    #[tracing::instrument(name = "Inserting subscriber", skip(self, name, timestamp))]
    pub async fn insert_subscriber(
        &self,
        email: &str,
        name: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Result<i64> {
        let id = sqlx::query(
            r#"
            INSERT INTO subscribers (email, name, timestamp)
            VALUES (?, ?, ?)
        "#,
        )
        .bind(email)
        .bind(name)
        .bind(timestamp)
        .execute(self.db())
        .await?
        .last_insert_rowid();

        Ok(id)
    }

    /// Every stored subscriber in insertion order.
    #[tracing::instrument(name = "Listing subscribers", skip(self))]
    pub async fn list_subscribers(&self) -> Result<Vec<Subscriber>> {
        let subscribers = sqlx::query_as::<_, Subscriber>(
            r#"
            SELECT id, email, name, timestamp
            FROM subscribers
            ORDER BY id
        "#,
        )
        .fetch_all(self.db())
        .await?;

        Ok(subscribers)
    }
}
