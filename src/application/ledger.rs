use crate::domain::account::{Account, Balance, Tally};
use crate::domain::ports::LedgerStoreRef;
use crate::domain::transaction::DebtTransaction;
use crate::error::Result;
use tracing::{info, warn};

/// Double-entry bookkeeping over a shared balance store.
///
/// `LedgerService` never reads a balance to write it back. Every transfer is
/// expressed as a pair of deltas that sum to zero, and the store is responsible
/// for applying them atomically per key.
#[derive(Clone)]
pub struct LedgerService {
    store: LedgerStoreRef,
}

impl LedgerService {
    /// Creates a new `LedgerService` over the given store.
    pub fn new(store: LedgerStoreRef) -> Self {
        Self { store }
    }

    /// Debits the debtor and credits the lender by the same amount.
    ///
    /// `DebtTransaction` can only be built for a positive amount between two
    /// different people, so nothing here re-checks those rules.
    pub async fn apply(&self, tx: &DebtTransaction) -> Result<()> {
        let amount = tx.amount.value();
        let deltas = [
            (tx.debtor.mention(), -amount),
            (tx.lender.mention(), amount),
        ];
        self.store.apply_deltas(&deltas).await?;

        info!(
            debtor = %tx.debtor,
            lender = %tx.lender,
            amount = %tx.amount,
            "debt recorded"
        );
        Ok(())
    }

    /// Reads every account and returns them sorted by handle.
    pub async fn tally(&self) -> Result<Tally> {
        let accounts = self
            .store
            .scan_all()
            .await?
            .into_iter()
            .map(|(handle, balance)| Account::new(handle, Balance::new(balance)))
            .collect();
        let tally = Tally::new(accounts);

        if tally.total() != Some(Balance::ZERO) {
            warn!(total = ?tally.total(), "balances do not sum to zero");
        }
        Ok(tally)
    }
}
