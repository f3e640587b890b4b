use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use super::{Error, FieldUpdate, Result, Subscriber, SubscriberStore};
use crate::database::DbManager;

/// `SubscriberStore` backed by the `narocniki` table.
#[derive(Clone, Debug)]
pub struct PgSubscriberStore {
    dm: DbManager,
}

impl PgSubscriberStore {
    pub fn new(dm: DbManager) -> Self {
        Self { dm }
    }

    fn db(&self) -> &PgPool {
        self.dm.db()
    }
}

/// A raw row. `CHAR(n)` columns come back blank-padded.
#[derive(Debug, FromRow)]
struct SubscriberRow {
    id: i32,
    ime: String,
    priimek: String,
    uporabnisko_ime: String,
    telefonska_stevilka: Option<String>,
    ocena: String,
}

impl TryFrom<SubscriberRow> for Subscriber {
    type Error = Error;

    fn try_from(row: SubscriberRow) -> Result<Self> {
        let score = row.ocena.parse().map_err(|_| Error::InvalidStoredScore {
            id: row.id,
            value: row.ocena.clone(),
        })?;

        Ok(Subscriber {
            id: row.id,
            first_name: row.ime.trim_end().to_string(),
            last_name: row.priimek.trim_end().to_string(),
            username: row.uporabnisko_ime.trim_end().to_string(),
            phone_number: row
                .telefonska_stevilka
                .map(|phone| phone.trim_end().to_string()),
            score,
        })
    }
}

#[async_trait]
impl SubscriberStore for PgSubscriberStore {
    async fn list(&self) -> Result<Vec<Subscriber>> {
        let rows: Vec<SubscriberRow> = sqlx::query_as(
            r#"SELECT id, ime, priimek, uporabnisko_ime, telefonska_stevilka, ocena
            FROM narocniki
            ORDER BY id"#,
        )
        .fetch_all(self.db())
        .await?;

        debug!("{:<20} - {} rows", "list", rows.len());
        rows.into_iter().map(Subscriber::try_from).collect()
    }

    async fn insert(&self, subscriber: Subscriber) -> Result<Subscriber> {
        let query_result = sqlx::query(
            r#"
            INSERT INTO narocniki (id, ime, priimek, uporabnisko_ime, telefonska_stevilka, ocena)
            VALUES ($1, $2, $3, $4, $5, $6)
        "#,
        )
        .bind(subscriber.id)
        .bind(&subscriber.first_name)
        .bind(&subscriber.last_name)
        .bind(&subscriber.username)
        .bind(subscriber.phone_number.as_deref())
        .bind(subscriber.score.to_string())
        .execute(self.db())
        .await;

        match query_result {
            Ok(_) => Ok(subscriber),
            Err(er) if is_unique_violation(&er) => Err(Error::DuplicateId(subscriber.id)),
            Err(er) => Err(er.into()),
        }
    }

    async fn get(&self, id: i32) -> Result<Option<Subscriber>> {
        let row: Option<SubscriberRow> = sqlx::query_as(
            r#"SELECT id, ime, priimek, uporabnisko_ime, telefonska_stevilka, ocena
            FROM narocniki
            WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(self.db())
        .await?;

        row.map(Subscriber::try_from).transpose()
    }

    async fn update_field(&self, id: i32, update: &FieldUpdate) -> Result<Option<Subscriber>> {
        // BEGIN sql transaction
        let mut transaction = self.db().begin().await?;

        let prior: Option<SubscriberRow> = sqlx::query_as(
            r#"SELECT id, ime, priimek, uporabnisko_ime, telefonska_stevilka, ocena
            FROM narocniki
            WHERE id = $1
            FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(&mut *transaction)
        .await?;

        let Some(prior) = prior else {
            transaction.rollback().await?;
            return Ok(None);
        };

        // The column name comes from `FieldUpdate::column`, never from the request.
        let sql = format!("UPDATE narocniki SET {} = $1 WHERE id = $2", update.column());
        sqlx::query(&sql)
            .bind(update.value())
            .bind(id)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;
        // END sql transaction

        debug!("{:<20} - id: {id}, column: {}", "update_field", update.column());
        Subscriber::try_from(prior).map(Some)
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let query_result = sqlx::query("DELETE FROM narocniki WHERE id = $1")
            .bind(id)
            .execute(self.db())
            .await?;

        Ok(query_result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(self.db()).await?;
        Ok(())
    }
}

// ###################################
// ->   HELPERS
// ###################################

/// Postgres reports a primary key collision as SQLSTATE 23505.
fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(er) => er.code().as_deref() == Some("23505"),
        _ => false,
    }
}
