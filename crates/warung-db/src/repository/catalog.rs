//! # Catalog Repository
//!
//! Read-side access to the product catalog.
//!
//! The catalog is owned and mutated by the product manager; the ledger
//! consumes `id`, `sale_price`, `cost_price` and `stock_qty` from it and
//! writes nothing back. `upsert` exists for the seed tool and test
//! fixtures, not for checkout paths.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use warung_core::Product;

/// Repository for catalog reads.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, sale_price, cost_price, stock_qty, is_active,
                   created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists active products, name order.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, sale_price, cost_price, stock_qty, is_active,
                   created_at, updated_at
            FROM products
            WHERE is_active = 1
            ORDER BY name
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts or replaces a product. Seed/fixture use only.
    pub async fn upsert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Upserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, sale_price, cost_price, stock_qty, is_active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                sale_price = excluded.sale_price,
                cost_price = excluded.cost_price,
                stock_qty = excluded.stock_qty,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.sale_price)
        .bind(product.cost_price)
        .bind(product.stock_qty)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use warung_core::Product;

    fn product(id: &str, name: &str, sale_price: i64, cost_price: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.into(),
            name: name.into(),
            sale_price,
            cost_price,
            stock_qty: 10,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();

        catalog
            .upsert(&product("p-1", "Indomie Goreng", 3_500, 2_800))
            .await
            .unwrap();

        let found = catalog.get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(found.name, "Indomie Goreng");
        assert_eq!(found.sale_price, 3_500);
        assert_eq!(found.cost_price, 2_800);

        assert!(catalog.get_by_id("missing").await.unwrap().is_none());
        assert_eq!(catalog.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_replaces() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();

        catalog
            .upsert(&product("p-1", "Teh Botol", 4_000, 3_000))
            .await
            .unwrap();
        catalog
            .upsert(&product("p-1", "Teh Botol", 4_500, 3_000))
            .await
            .unwrap();

        let found = catalog.get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(found.sale_price, 4_500);
        assert_eq!(catalog.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_active_skips_inactive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();

        catalog
            .upsert(&product("p-1", "Aqua 600ml", 3_000, 2_200))
            .await
            .unwrap();
        let mut retired = product("p-2", "Kopi Sachet", 1_500, 1_000);
        retired.is_active = false;
        catalog.upsert(&retired).await.unwrap();

        let active = catalog.list_active(50).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "p-1");
    }
}
