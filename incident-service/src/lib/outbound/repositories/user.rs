use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Credential store backed by a Postgres table keyed by email.
pub struct PostgresUserRepository {
    pool: PgPool,
    table: String,
}

impl PostgresUserRepository {
    /// # Arguments
    /// * `pool` - Connection pool
    /// * `table` - Table name, already validated as a plain SQL identifier
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    /// Create the users table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                email TEXT PRIMARY KEY,
                nombre TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                fecha_registro TIMESTAMPTZ NOT NULL,
                activo BOOLEAN NOT NULL DEFAULT TRUE
            )
            "#,
            self.table
        );
        sqlx::query(&query).execute(&self.pool).await?;

        Ok(())
    }
}

fn user_from_row(row: &PgRow) -> Result<User, UserError> {
    let email: String = row
        .try_get("email")
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

    Ok(User {
        email: EmailAddress::new(email)
            .map_err(|e| UserError::DatabaseError(format!("Stored email is invalid: {}", e)))?,
        name: row
            .try_get("nombre")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?,
        password_hash: row
            .try_get("password_hash")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?,
        registered_at: row
            .try_get("fecha_registro")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?,
        active: row
            .try_get("activo")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?,
    })
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let query = format!(
            r#"
            INSERT INTO {} (email, nombre, password_hash, fecha_registro, activo)
            VALUES ($1, $2, $3, $4, $5)
            "#,
            self.table
        );
        sqlx::query(&query)
            .bind(user.email.as_str())
            .bind(&user.name)
            .bind(&user.password_hash)
            .bind(user.registered_at)
            .bind(user.active)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return UserError::EmailAlreadyExists(user.email.to_string());
                    }
                }
                UserError::DatabaseError(e.to_string())
            })?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let query = format!(
            r#"
            SELECT email, nombre, password_hash, fecha_registro, activo
            FROM {}
            WHERE email = $1
            "#,
            self.table
        );
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.as_ref().map(user_from_row).transpose()
    }
}
