//! Monthly borrowing-interest accrual sweep.
//!
//! Meant to run at startup and on a recurring interval. The persisted
//! month cursor advances after every swept month, so a crash mid
//! catch-up resumes where it stopped and a second invocation with no
//! elapsed time posts nothing. Concurrent double-invocation is not
//! guarded here; callers serialize it.

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::sync::Arc;

use vaultfolio_rates::{Asset, Rate, RateSource};

use crate::constants::{BORROWING_INTEREST_CATEGORY, INTEREST_DUST_THRESHOLD_USD};
use crate::errors::Result;
use crate::loans::LoanServiceTrait;
use crate::store::LedgerStore;
use crate::transactions::{NewTransaction, TransactionType};
use crate::utils::time::{month_end, month_start, next_month_start};

pub struct AccrualService {
    store: Arc<LedgerStore>,
    loan_service: Arc<dyn LoanServiceTrait>,
}

impl AccrualService {
    pub fn new(store: Arc<LedgerStore>, loan_service: Arc<dyn LoanServiceTrait>) -> Self {
        Self {
            store,
            loan_service,
        }
    }

    /// Sweeps every settled-but-unaccrued calendar month up to (and
    /// excluding) the current one. Returns the number of months an
    /// interest expense was posted for.
    pub async fn accrue_borrowing_interest_if_due(&self) -> Result<u32> {
        self.accrue_until(Utc::now()).await
    }

    /// Same sweep with an explicit "now", for deterministic tests.
    pub async fn accrue_until(&self, now: DateTime<Utc>) -> Result<u32> {
        let settings = self.store.settings()?;
        let current_month = month_start(now);
        let mut cursor = month_start(settings.borrowing_last_accrual_at);
        let mut periods_accrued = 0u32;

        while cursor < current_month {
            let next = next_month_start(cursor);
            let as_of = month_end(cursor);

            let outstanding = self.loan_service.outstanding_borrow_usd(Some(as_of)).await?;
            let interest = outstanding * settings.borrowing_monthly_rate;

            if interest > INTEREST_DUST_THRESHOLD_USD {
                self.store.ensure_vault(&settings.borrowing_vault_name)?;

                let mut expense = NewTransaction::new(
                    TransactionType::Expense,
                    Asset::fiat("USD"),
                    interest,
                );
                expense.account = Some(settings.borrowing_vault_name.clone());
                expense.created_at = Some(as_of);
                expense.category = Some(BORROWING_INTEREST_CATEGORY.to_string());
                expense.note = Some(format!(
                    "Borrowing interest for {}",
                    cursor.format("%Y-%m")
                ));

                let rate = Rate::new(Asset::fiat("USD"), 1.0, as_of, RateSource::Fixed);
                self.store.append_transaction(
                    expense.into_transaction(settings.borrowing_vault_name.clone(), rate),
                )?;

                info!(
                    "Accrued {} USD borrowing interest for {} (outstanding {})",
                    interest,
                    cursor.format("%Y-%m"),
                    outstanding
                );
                periods_accrued += 1;
            } else {
                debug!(
                    "No accrual for {}: interest {} below dust threshold",
                    cursor.format("%Y-%m"),
                    interest
                );
            }

            // Persist the cursor per month, not after the whole loop,
            // so a crash mid catch-up never double-posts.
            self.store
                .update_settings(|s| s.borrowing_last_accrual_at = next)?;
            cursor = next;
        }

        Ok(periods_accrued)
    }
}
