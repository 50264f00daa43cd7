use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Key/value balance storage shared by every invocation.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Atomically adds `delta` (possibly negative) to the balance under `key`,
    /// creating the entry at zero when it does not exist yet.
    async fn atomic_add(&self, key: &str, delta: Decimal) -> Result<()>;

    /// Returns every `(key, balance)` pair in the store.
    async fn scan_all(&self) -> Result<Vec<(String, Decimal)>>;

    /// Applies a set of deltas that belong to one logical transfer.
    ///
    /// The default issues one `atomic_add` per delta; a failure part way leaves
    /// the earlier deltas applied. Stores with multi-key writes override this to
    /// commit all deltas or none.
    async fn apply_deltas(&self, deltas: &[(String, Decimal)]) -> Result<()> {
        for (key, delta) in deltas {
            self.atomic_add(key, *delta).await?;
        }
        Ok(())
    }
}

/// Resolves a user id to its display name.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn display_name(&self, user_id: &str) -> Result<String>;
}

pub type LedgerStoreRef = Arc<dyn LedgerStore>;
pub type IdentityLookupRef = Arc<dyn IdentityLookup>;
