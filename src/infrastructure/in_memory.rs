use crate::domain::ports::{IdentityLookup, LedgerStore};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory balance store.
///
/// Uses `Arc<RwLock<HashMap<String, Decimal>>>` so clones share one ledger.
/// Ideal for testing or single-process runs where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    balances: Arc<RwLock<HashMap<String, Decimal>>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn atomic_add(&self, key: &str, delta: Decimal) -> Result<()> {
        let mut balances = self.balances.write().await;
        let current = balances.get(key).copied().unwrap_or(Decimal::ZERO);
        let updated = checked_balance(key, current, delta)?;
        balances.insert(key.to_string(), updated);
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<(String, Decimal)>> {
        let balances = self.balances.read().await;
        Ok(balances
            .iter()
            .map(|(key, balance)| (key.clone(), *balance))
            .collect())
    }

    async fn apply_deltas(&self, deltas: &[(String, Decimal)]) -> Result<()> {
        // One write guard for the whole transfer; nothing is written until
        // every new balance has been computed.
        let mut balances = self.balances.write().await;
        let mut staged: HashMap<&str, Decimal> = HashMap::new();
        for (key, delta) in deltas {
            let current = match staged.get(key.as_str()) {
                Some(balance) => *balance,
                None => balances.get(key).copied().unwrap_or(Decimal::ZERO),
            };
            staged.insert(key.as_str(), checked_balance(key, current, *delta)?);
        }

        for (key, balance) in staged {
            balances.insert(key.to_string(), balance);
        }
        Ok(())
    }
}

fn checked_balance(key: &str, current: Decimal, delta: Decimal) -> Result<Decimal> {
    current
        .checked_add(delta)
        .ok_or_else(|| LedgerError::StoreFailure(format!("Balance of {} would overflow", key)))
}

/// A fixed id to display-name directory.
///
/// Stands in for the Slack directory when no API token is configured.
#[derive(Default, Clone)]
pub struct StaticIdentityDirectory {
    users: HashMap<String, String>,
}

impl StaticIdentityDirectory {
    pub fn new(users: HashMap<String, String>) -> Self {
        Self { users }
    }

    /// Loads a JSON object of `{ "<user id>": "<display name>" }`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let users: HashMap<String, String> = serde_json::from_slice(&bytes)?;
        Ok(Self::new(users))
    }

    pub fn with_user(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.users.insert(id.into(), name.into());
        self
    }
}

#[async_trait]
impl IdentityLookup for StaticIdentityDirectory {
    async fn display_name(&self, user_id: &str) -> Result<String> {
        self.users
            .get(user_id)
            .cloned()
            .ok_or_else(|| LedgerError::lookup(user_id, "user_not_found"))
    }
}
