//! # Receivable Repository
//!
//! Outstanding credit-sale balances and installment settlement.
//!
//! ## Settlement Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 record_payment(sale_id, amount)                         │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    SELECT remaining_amount FROM sales WHERE id = ?      ← observe      │
//! │    apply_installment(remaining, amount)                 ← pure math    │
//! │         │                                                               │
//! │         ├── refused (overpayment / bad amount) → no write, report back │
//! │         ▼                                                               │
//! │    INSERT payment_events (append-only audit row)                        │
//! │    UPDATE sales SET remaining = new, status = new                       │
//! │           WHERE id = ? AND remaining_amount = observed  ← CAS guard    │
//! │         │                                                               │
//! │         ├── 0 rows → somebody settled in between → ROLLBACK,           │
//! │         │            WriteConflict (caller retries with a fresh read)  │
//! │         ▼                                                               │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The guard makes the classic lost-update race impossible: a payment
//! computed against a stale remaining value can only roll back, never
//! commit. Payments against different sales never touch the same row and
//! proceed independently.

use chrono::Utc;
use serde::Serialize;
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use warung_core::settlement::{apply_installment, InstallmentError, PaymentOutcome};
use warung_core::{Money, PaymentEvent, PaymentStatus, Sale};

// =============================================================================
// Row Types
// =============================================================================

/// An unpaid credit sale together with who owes it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OutstandingSale {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub sale: Sale,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

/// Proof of a successfully applied installment.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub event: PaymentEvent,
    pub new_remaining: i64,
    pub new_status: PaymentStatus,
}

/// Outcome of a settlement attempt.
///
/// A refusal is a business answer, not a database failure: nothing was
/// written and the sale is exactly as it was.
#[derive(Debug)]
pub enum PaymentApplication {
    Applied(PaymentReceipt),
    Refused(InstallmentError),
}

// =============================================================================
// Repository
// =============================================================================

#[derive(Debug, Clone)]
pub struct ReceivableRepository {
    pool: SqlitePool,
}

impl ReceivableRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReceivableRepository { pool }
    }

    /// Lists unpaid credit sales, newest first, with customer contact info.
    pub async fn list_outstanding(&self) -> DbResult<Vec<OutstandingSale>> {
        let rows = sqlx::query_as::<_, OutstandingSale>(
            r#"
            SELECT s.id, s.customer_id, s.total_amount, s.payment_method,
                   s.payment_status, s.remaining_amount, s.created_at, s.updated_at,
                   c.name AS customer_name, c.phone AS customer_phone
            FROM sales s
            LEFT JOIN customers c ON c.id = s.customer_id
            WHERE s.payment_method = 'credit' AND s.payment_status = 'unpaid'
            ORDER BY s.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Applies one installment to a sale as a single atomic unit.
    ///
    /// Read, validate, append the payment event, and settle the header in
    /// one transaction. A [`DbError::WriteConflict`] means the balance
    /// moved between our read and our write; the caller should retry with
    /// a fresh read.
    pub async fn record_payment(&self, sale_id: &str, amount: i64) -> DbResult<PaymentApplication> {
        let mut tx = self.pool.begin().await?;

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_id, total_amount, payment_method, payment_status,
                   remaining_amount, created_at, updated_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Sale", sale_id))?;

        let observed_remaining = sale.remaining_amount;

        let outcome = match apply_installment(
            Money::from_rupiah(observed_remaining),
            Money::from_rupiah(amount),
        ) {
            Ok(outcome) => outcome,
            Err(refusal) => {
                debug!(sale_id = %sale_id, amount, %refusal, "Installment refused");
                return Ok(PaymentApplication::Refused(refusal));
            }
        };

        let now = Utc::now();
        let event = PaymentEvent {
            id: Uuid::new_v4().to_string(),
            sale_id: sale_id.to_string(),
            amount,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO payment_events (id, sale_id, amount, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&event.id)
        .bind(&event.sale_id)
        .bind(event.amount)
        .bind(event.created_at)
        .execute(&mut *tx)
        .await?;

        settle_update(&mut *tx, sale_id, observed_remaining, &outcome).await?;

        tx.commit().await?;

        debug!(
            sale_id = %sale_id,
            amount,
            new_remaining = outcome.new_remaining.rupiah(),
            "Installment applied"
        );

        Ok(PaymentApplication::Applied(PaymentReceipt {
            event,
            new_remaining: outcome.new_remaining.rupiah(),
            new_status: outcome.new_status,
        }))
    }

    /// All installments recorded against a sale, oldest first.
    pub async fn payments_for(&self, sale_id: &str) -> DbResult<Vec<PaymentEvent>> {
        let events = sqlx::query_as::<_, PaymentEvent>(
            r#"
            SELECT id, sale_id, amount, created_at
            FROM payment_events
            WHERE sale_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Total amount received against a sale.
    pub async fn total_paid(&self, sale_id: &str) -> DbResult<i64> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(amount) FROM payment_events WHERE sale_id = ?1")
                .bind(sale_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(total.unwrap_or(0))
    }
}

/// The guarded settle write.
///
/// `WHERE remaining_amount = ?observed` is the optimistic compare-and-swap:
/// zero affected rows means another payment landed first and this
/// transaction must not commit.
async fn settle_update(
    tx: &mut SqliteConnection,
    sale_id: &str,
    observed_remaining: i64,
    outcome: &PaymentOutcome,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE sales
        SET remaining_amount = ?3, payment_status = ?4, updated_at = ?5
        WHERE id = ?1 AND remaining_amount = ?2
        "#,
    )
    .bind(sale_id)
    .bind(observed_remaining)
    .bind(outcome.new_remaining.rupiah())
    .bind(outcome.new_status)
    .bind(Utc::now())
    .execute(tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::write_conflict(format!(
            "sale {sale_id} settled concurrently (observed remaining {observed_remaining})"
        )));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use warung_core::{Customer, LedgerError, PaymentMethod, Product, SaleLineItem};

    async fn db_with_credit_sale(sale_id: &str, total: i64) -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        db.catalog()
            .upsert(&Product {
                id: "p-1".into(),
                name: "Beras 5kg".into(),
                sale_price: total,
                cost_price: total - 10_000,
                stock_qty: 8,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        db.customers()
            .insert(&Customer {
                id: "c-1".into(),
                name: "Bu Sari".into(),
                phone: None,
                address: None,
                created_at: now,
            })
            .await
            .unwrap();

        let sale = Sale {
            id: sale_id.into(),
            customer_id: Some("c-1".into()),
            total_amount: total,
            payment_method: PaymentMethod::Credit,
            payment_status: PaymentStatus::Unpaid,
            remaining_amount: total,
            created_at: now,
            updated_at: now,
        };
        let items = vec![SaleLineItem {
            id: "li-1".into(),
            sale_id: sale_id.into(),
            product_id: "p-1".into(),
            quantity: 1,
            price_at_sale: total,
            line_total: total,
            created_at: now,
        }];
        db.sales().create_with_items(&sale, &items).await.unwrap();

        db
    }

    fn applied(application: PaymentApplication) -> PaymentReceipt {
        match application {
            PaymentApplication::Applied(receipt) => receipt,
            PaymentApplication::Refused(refusal) => {
                panic!("expected applied payment, got refusal: {refusal}")
            }
        }
    }

    #[tokio::test]
    async fn test_installments_settle_the_sale() {
        let db = db_with_credit_sale("s-1", 100_000).await;
        let receivables = db.receivables();

        let first = applied(receivables.record_payment("s-1", 40_000).await.unwrap());
        assert_eq!(first.new_remaining, 60_000);
        assert_eq!(first.new_status, PaymentStatus::Unpaid);

        let second = applied(receivables.record_payment("s-1", 60_000).await.unwrap());
        assert_eq!(second.new_remaining, 0);
        assert_eq!(second.new_status, PaymentStatus::Paid);

        // remaining == total − Σ events, and the audit trail is complete
        let sale = db.sales().get_by_id("s-1").await.unwrap().unwrap();
        assert_eq!(sale.remaining_amount, 0);
        assert_eq!(sale.payment_status, PaymentStatus::Paid);
        assert_eq!(receivables.total_paid("s-1").await.unwrap(), 100_000);
        assert_eq!(receivables.payments_for("s-1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_overpayment_refused_without_writing() {
        let db = db_with_credit_sale("s-1", 100_000).await;
        let receivables = db.receivables();

        applied(receivables.record_payment("s-1", 40_000).await.unwrap());

        let refusal = receivables.record_payment("s-1", 75_000).await.unwrap();
        match refusal {
            PaymentApplication::Refused(InstallmentError::Ledger(LedgerError::Overpayment {
                remaining,
            })) => assert_eq!(remaining, 60_000),
            other => panic!("expected overpayment refusal, got {other:?}"),
        }

        // Pre-state == post-state: balance, status and audit trail untouched.
        let sale = db.sales().get_by_id("s-1").await.unwrap().unwrap();
        assert_eq!(sale.remaining_amount, 60_000);
        assert_eq!(sale.payment_status, PaymentStatus::Unpaid);
        assert_eq!(receivables.payments_for("s-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_settled_sale_refuses_further_payments() {
        let db = db_with_credit_sale("s-1", 50_000).await;
        let receivables = db.receivables();

        applied(receivables.record_payment("s-1", 50_000).await.unwrap());

        let refusal = receivables.record_payment("s-1", 1_000).await.unwrap();
        assert!(matches!(
            refusal,
            PaymentApplication::Refused(InstallmentError::Ledger(LedgerError::Overpayment {
                remaining: 0
            }))
        ));
    }

    #[tokio::test]
    async fn test_unknown_sale() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .receivables()
            .record_payment("missing", 10_000)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_stale_observed_remaining_conflicts() {
        let db = db_with_credit_sale("s-1", 100_000).await;

        // A writer that observed 100.000 but the row has since moved to
        // 60.000 must match zero rows and surface a conflict.
        applied(db.receivables().record_payment("s-1", 40_000).await.unwrap());

        let outcome = apply_installment(
            Money::from_rupiah(100_000),
            Money::from_rupiah(60_000),
        )
        .unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let err = settle_update(&mut *tx, "s-1", 100_000, &outcome)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::WriteConflict(_)));
        tx.rollback().await.unwrap();

        // The sale still reflects only the payment that really landed.
        let sale = db.sales().get_by_id("s-1").await.unwrap().unwrap();
        assert_eq!(sale.remaining_amount, 60_000);
    }

    #[tokio::test]
    async fn test_list_outstanding_newest_first() {
        let db = db_with_credit_sale("s-1", 30_000).await;

        // An older unpaid sale for the same customer.
        let old = Utc::now() - chrono::Duration::days(3);
        let sale = Sale {
            id: "s-0".into(),
            customer_id: Some("c-1".into()),
            total_amount: 20_000,
            payment_method: PaymentMethod::Credit,
            payment_status: PaymentStatus::Unpaid,
            remaining_amount: 20_000,
            created_at: old,
            updated_at: old,
        };
        let items = vec![SaleLineItem {
            id: "li-0".into(),
            sale_id: "s-0".into(),
            product_id: "p-1".into(),
            quantity: 1,
            price_at_sale: 20_000,
            line_total: 20_000,
            created_at: old,
        }];
        db.sales().create_with_items(&sale, &items).await.unwrap();

        let outstanding = db.receivables().list_outstanding().await.unwrap();
        assert_eq!(outstanding.len(), 2);
        assert_eq!(outstanding[0].sale.id, "s-1");
        assert_eq!(outstanding[1].sale.id, "s-0");
        assert_eq!(outstanding[0].customer_name.as_deref(), Some("Bu Sari"));

        // Settling a sale removes it from the list.
        applied(db.receivables().record_payment("s-1", 30_000).await.unwrap());
        let outstanding = db.receivables().list_outstanding().await.unwrap();
        assert_eq!(outstanding.len(), 1);
        assert_eq!(outstanding[0].sale.id, "s-0");
    }
}
