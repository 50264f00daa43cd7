use crate::domain::ports::LedgerStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, MergeOperands, Options, WriteBatch};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family holding one balance per account handle.
pub const CF_BALANCES: &str = "balances";

const MERGE_OPERATOR_NAME: &str = "bookkeep.add_chips";

/// A persistent ledger store backed by RocksDB.
///
/// Balances are UTF-8 decimal strings. Deltas are written as merge operands and
/// summed by an associative merge operator, so concurrent writers never read,
/// modify and write the same key. A transfer's two deltas go into one
/// `WriteBatch` and commit together.
///
/// Writers are serialized by `write_lock` so every resulting balance can be
/// checked for overflow before its operand is written. The merge operator
/// itself cannot reject an operand without poisoning the key.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures the `balances` column family exists and carries the merge operator.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let mut cf_opts = Options::default();
        cf_opts.set_merge_operator_associative(MERGE_OPERATOR_NAME, add_chips);
        let cf_balances = ColumnFamilyDescriptor::new(CF_BALANCES, cf_opts);

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_balances])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn balances(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_BALANCES).ok_or_else(|| {
            LedgerError::InternalError(Box::new(std::io::Error::other(
                "Balances column family not found",
            )))
        })
    }

    fn current_balance(&self, cf: &ColumnFamily, key: &str) -> Result<Decimal> {
        match self.db.get_cf(cf, key.as_bytes())? {
            Some(bytes) => decode_balance(&bytes)
                .ok_or_else(|| LedgerError::StoreFailure(format!("Unreadable balance for {}", key))),
            None => Ok(Decimal::ZERO),
        }
    }

    /// Fails without writing anything if any delta would overflow its balance.
    fn check_deltas(&self, cf: &ColumnFamily, deltas: &[(&str, Decimal)]) -> Result<()> {
        let mut staged: HashMap<&str, Decimal> = HashMap::new();
        for &(key, delta) in deltas {
            let current = match staged.get(key) {
                Some(balance) => *balance,
                None => self.current_balance(cf, key)?,
            };
            let updated = current.checked_add(delta).ok_or_else(|| {
                LedgerError::StoreFailure(format!("Balance of {} would overflow", key))
            })?;
            staged.insert(key, updated);
        }
        Ok(())
    }
}

fn decode_balance(bytes: &[u8]) -> Option<Decimal> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

fn encode_balance(value: Decimal) -> Vec<u8> {
    value.to_string().into_bytes()
}

/// Sums the stored balance (if any) with every pending delta.
fn add_chips(_key: &[u8], existing: Option<&[u8]>, operands: &MergeOperands) -> Option<Vec<u8>> {
    let mut total = match existing {
        Some(bytes) => decode_balance(bytes)?,
        None => Decimal::ZERO,
    };
    for operand in operands.iter() {
        total = total.checked_add(decode_balance(operand)?)?;
    }
    Some(encode_balance(total))
}

#[async_trait]
impl LedgerStore for RocksDBStore {
    async fn atomic_add(&self, key: &str, delta: Decimal) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let cf = self.balances()?;
        self.check_deltas(cf, &[(key, delta)])?;
        self.db.merge_cf(cf, key.as_bytes(), encode_balance(delta))?;
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<(String, Decimal)>> {
        let cf = self.balances()?;

        let mut balances = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, value) = item?;
            let handle = String::from_utf8(key.into_vec()).map_err(|e| {
                LedgerError::InternalError(Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("Account key is not UTF-8: {}", e),
                )))
            })?;
            let balance = decode_balance(&value).ok_or_else(|| {
                LedgerError::StoreFailure(format!("Unreadable balance for {}", handle))
            })?;
            balances.push((handle, balance));
        }

        Ok(balances)
    }

    async fn apply_deltas(&self, deltas: &[(String, Decimal)]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let cf = self.balances()?;
        let pending: Vec<(&str, Decimal)> = deltas
            .iter()
            .map(|(key, delta)| (key.as_str(), *delta))
            .collect();
        self.check_deltas(cf, &pending)?;

        let mut batch = WriteBatch::default();
        for (key, delta) in deltas {
            batch.merge_cf(cf, key.as_bytes(), encode_balance(*delta));
        }
        self.db.write(batch)?;

        Ok(())
    }
}
