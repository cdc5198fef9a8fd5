use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{InventoryRow, LedgerError, ProductId, Result, store::Ledger};

const SELECT_ALL: &str = r#"
    SELECT product_id, product_name, product_description, product_image, product_count
    FROM inventory
    ORDER BY product_id ASC, id ASC
"#;

const SELECT_ONE: &str = r#"
    SELECT product_id, product_name, product_description, product_image, product_count
    FROM inventory
    WHERE product_id = $1
    ORDER BY id ASC
"#;

const CONSUME: &str = r#"
    UPDATE inventory
    SET product_count = product_count - $2
    WHERE product_id = $1 AND product_count >= $2
"#;

/// PostgreSQL-backed ledger implementation.
///
/// The conditional decrement is a single `UPDATE ... WHERE product_count >= $2`,
/// so concurrent consumers of the same row are serialized by the row lock
/// and the guard is re-evaluated against the committed count.
#[derive(Clone)]
pub struct PostgresLedger {
    pool: PgPool,
}

impl PostgresLedger {
    /// Creates a new PostgreSQL ledger.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the given database URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_inventory(row: PgRow) -> Result<InventoryRow> {
        let count: i64 = row.try_get("product_count")?;
        let product_count = u32::try_from(count).map_err(|e| LedgerError::Decode {
            column: "product_count",
            reason: format!("{count}: {e}"),
        })?;

        Ok(InventoryRow {
            product_id: ProductId::new(row.try_get::<String, _>("product_id")?),
            product_name: row.try_get("product_name")?,
            product_description: row.try_get("product_description")?,
            product_image: row.try_get("product_image")?,
            product_count,
        })
    }
}

#[async_trait]
impl Ledger for PostgresLedger {
    #[tracing::instrument(skip(self))]
    async fn read_all(&self) -> Result<Vec<InventoryRow>> {
        let rows = sqlx::query(SELECT_ALL).fetch_all(&self.pool).await?;
        metrics::counter!("ledger_statements_total", "statement" => "read_all").increment(1);
        rows.into_iter().map(Self::row_to_inventory).collect()
    }

    #[tracing::instrument(skip(self), fields(product_id = %product_id))]
    async fn read_one(&self, product_id: &ProductId) -> Result<Vec<InventoryRow>> {
        let rows = sqlx::query(SELECT_ONE)
            .bind(product_id.as_str())
            .fetch_all(&self.pool)
            .await?;
        metrics::counter!("ledger_statements_total", "statement" => "read_one").increment(1);
        rows.into_iter().map(Self::row_to_inventory).collect()
    }

    #[tracing::instrument(skip(self), fields(product_id = %product_id))]
    async fn update_conditional(&self, product_id: &ProductId, count: u32) -> Result<u64> {
        let result = sqlx::query(CONSUME)
            .bind(product_id.as_str())
            .bind(i64::from(count))
            .execute(&self.pool)
            .await?;
        metrics::counter!("ledger_statements_total", "statement" => "update_conditional")
            .increment(1);
        Ok(result.rows_affected())
    }
}
