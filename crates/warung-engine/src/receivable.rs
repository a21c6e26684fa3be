//! # Receivables Ledger
//!
//! Tracks what credit customers still owe and applies installments.
//!
//! ## Concurrency
//! Two payments racing on the same sale is the classic lost-update hazard.
//! The repository's settle write is guarded by a compare-and-swap on the
//! observed remaining balance; a guarded miss rolls the attempt back and
//! this ledger retries with a fresh read, immediately, a bounded number of
//! times. Payments on different sales never contend with each other.

use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::signal::ViewRefresh;
use warung_core::PaymentEvent;
use warung_db::{Database, DbError, OutstandingSale, PaymentApplication, PaymentReceipt};

/// How many fresh reads a conflicted payment gets before giving up.
const MAX_SETTLEMENT_ATTEMPTS: usize = 3;

/// Tracks and settles credit-sale balances.
#[derive(Debug, Clone)]
pub struct ReceivablesLedger {
    db: Database,
    views: ViewRefresh,
}

impl ReceivablesLedger {
    pub fn new(db: Database, views: ViewRefresh) -> Self {
        ReceivablesLedger { db, views }
    }

    /// Unpaid credit sales, newest first, with customer contact info.
    pub async fn outstanding(&self) -> EngineResult<Vec<OutstandingSale>> {
        Ok(self.db.receivables().list_outstanding().await?)
    }

    /// Applies one installment against a sale.
    ///
    /// The returned receipt carries the new remaining balance and status.
    /// An overpayment reports the actual remaining so the caller can
    /// resubmit a valid amount. Note that submitting the same payment twice
    /// records it twice; deduplication belongs to the caller.
    pub async fn record_payment(
        &self,
        sale_id: &str,
        amount: i64,
    ) -> EngineResult<PaymentReceipt> {
        for attempt in 1..=MAX_SETTLEMENT_ATTEMPTS {
            match self.db.receivables().record_payment(sale_id, amount).await {
                Ok(PaymentApplication::Applied(receipt)) => {
                    self.views.notify();
                    info!(
                        sale_id = %sale_id,
                        amount,
                        new_remaining = receipt.new_remaining,
                        new_status = ?receipt.new_status,
                        "Installment recorded"
                    );
                    return Ok(receipt);
                }
                Ok(PaymentApplication::Refused(refusal)) => return Err(refusal.into()),
                Err(err) if err.is_retryable() => {
                    debug!(sale_id = %sale_id, attempt, %err, "Settlement conflict, retrying");
                }
                Err(DbError::NotFound { .. }) => {
                    return Err(EngineError::SaleNotFound(sale_id.to_string()))
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(sale_id = %sale_id, attempts = MAX_SETTLEMENT_ATTEMPTS, "Settlement retries exhausted");
        Err(EngineError::Conflict {
            sale_id: sale_id.to_string(),
            attempts: MAX_SETTLEMENT_ATTEMPTS,
        })
    }

    /// The full installment history of a sale, oldest first.
    pub async fn history(&self, sale_id: &str) -> EngineResult<Vec<PaymentEvent>> {
        Ok(self.db.receivables().payments_for(sale_id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
