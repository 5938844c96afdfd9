//! PostgreSQL storage implementation.
//!
//! Queries are checked at runtime rather than with `query!` so the crate
//! builds without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use coursepay_core::{Payment, PaymentId, User, UserId};

use crate::error::{Result, StoreError};
use crate::schema::constraint;
use crate::Store;

/// Embedded schema migrations.
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// PostgreSQL-backed storage implementation.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to the database at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be established.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        Ok(Self { pool })
    }

    /// Create or upgrade the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails to apply.
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::info!(migrations = MIGRATOR.iter().count(), "Database schema up to date");
        Ok(())
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct PaymentRow {
    id: Uuid,
    user_id: Option<Uuid>,
    course_id: String,
    gateway_order_id: String,
    gateway_payment_id: String,
    amount: i64,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = StoreError;

    fn try_from(row: PaymentRow) -> Result<Self> {
        Ok(Self {
            id: PaymentId::from_uuid(row.id),
            user_id: row.user_id.map(UserId::from_uuid),
            course_id: row.course_id,
            gateway_order_id: row.gateway_order_id,
            gateway_payment_id: row.gateway_payment_id,
            amount: row.amount,
            status: row.status.parse()?,
            created_at: row.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";

/// Map unique violations onto the domain's duplicate errors.
fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            match db.constraint() {
                Some(constraint::USERS_USERNAME) => return StoreError::DuplicateUsername,
                Some(constraint::USERS_EMAIL) => return StoreError::DuplicateEmail,
                Some(constraint::PAYMENTS_ORDER_ID) => {
                    return StoreError::DuplicatePayment {
                        field: "gateway_order_id",
                    }
                }
                Some(constraint::PAYMENTS_PAYMENT_ID) => {
                    return StoreError::DuplicatePayment {
                        field: "gateway_payment_id",
                    }
                }
                _ => {}
            }
        }
    }
    err.into()
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id.as_uuid())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(())
    }

    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<()> {
        sqlx::query(
            "INSERT INTO payments \
             (id, user_id, course_id, gateway_order_id, gateway_payment_id, amount, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(payment.id.as_uuid())
        .bind(payment.user_id.map(Uuid::from))
        .bind(&payment.course_id)
        .bind(&payment.gateway_order_id)
        .bind(&payment.gateway_payment_id)
        .bind(payment.amount)
        .bind(payment.status.as_str())
        .bind(payment.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(())
    }

    async fn list_payments_by_user(&self, user_id: &UserId) -> Result<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            "SELECT id, user_id, course_id, gateway_order_id, gateway_payment_id, amount, status, created_at \
             FROM payments WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Payment::try_from).collect()
    }

    async fn count_payments(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments")
            .fetch_one(&self.pool)
            .await?;

        u64::try_from(count).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn connect() -> PgStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let store = PgStore::connect(&url, 2).await.expect("Failed to connect");
        store.migrate().await.expect("Failed to migrate");
        store
    }

    fn unique(prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::new_v4().simple())
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL"]
    async fn user_uniqueness_maps_to_domain_errors() {
        let store = connect().await;
        let username = unique("user");
        let email = format!("{}@example.com", unique("mail"));

        let user = User::with_cost(&username, &email, "pw", 4).unwrap();
        store.insert_user(&user).await.unwrap();

        let same_name = User::with_cost(&username, "other@example.com", "pw", 4).unwrap();
        assert!(matches!(
            store.insert_user(&same_name).await,
            Err(StoreError::DuplicateUsername)
        ));

        let same_email = User::with_cost(unique("user"), &email, "pw", 4).unwrap();
        assert!(matches!(
            store.insert_user(&same_email).await,
            Err(StoreError::DuplicateEmail)
        ));

        let found = store.find_user_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(found.check_password("pw"));
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL"]
    async fn payments_round_trip() {
        let store = connect().await;
        let user = User::with_cost(unique("user"), format!("{}@example.com", unique("m")), "pw", 4)
            .unwrap();
        store.insert_user(&user).await.unwrap();

        let order_id = unique("order");
        let payment = Payment::success(Some(user.id), "python", &order_id, unique("pay"), 49_900);
        store.insert_payment(&payment).await.unwrap();

        let dup = Payment::failed(Some(user.id), None, &order_id, unique("pay"));
        assert!(matches!(
            store.insert_payment(&dup).await,
            Err(StoreError::DuplicatePayment {
                field: "gateway_order_id"
            })
        ));

        let listed = store.list_payments_by_user(&user.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].gateway_order_id, order_id);
        assert_eq!(listed[0].amount, 49_900);
        assert!(listed[0].is_success());
    }
}
