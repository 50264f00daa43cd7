#![allow(dead_code)]

use async_trait::async_trait;
use bookkeep::application::router::RequestRouter;
use bookkeep::domain::ports::{LedgerStore, LedgerStoreRef};
use bookkeep::error::{LedgerError, Result};
use bookkeep::infrastructure::in_memory::{InMemoryLedgerStore, StaticIdentityDirectory};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;

pub fn directory() -> StaticIdentityDirectory {
    StaticIdentityDirectory::default()
        .with_user("U01", "alice")
        .with_user("U02", "bob")
        .with_user("U03", "carol")
}

pub fn router_over(store: LedgerStoreRef) -> RequestRouter {
    RequestRouter::new(store, Arc::new(directory()))
}

pub fn in_memory_router() -> (RequestRouter, InMemoryLedgerStore) {
    let store = InMemoryLedgerStore::new();
    (router_over(Arc::new(store.clone())), store)
}

pub fn command_event(user_id: &str, user_name: &str, text: &str) -> Value {
    let body: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("user_id", user_id)
        .append_pair("user_name", user_name)
        .append_pair("command", "/chips")
        .append_pair("text", text)
        .finish();
    json!({ "body": body })
}

pub fn dialog_event(source: &str, caller: &str, lender: Option<&str>, amount: Option<&str>) -> Value {
    json!({
        "currentIntent": {
            "name": "record_debt",
            "slots": { "Lender": lender, "Amount": amount }
        },
        "invocationSource": source,
        "userId": format!("bookkeep:T01:{}", caller),
        "sessionAttributes": { "channel": "poker-night" },
        "bot": { "name": "BookKeepBot" }
    })
}

/// Pulls the Slack message text out of an HTTP-style command reply.
pub fn reply_text(answer: &Value) -> String {
    let body: Value = serde_json::from_str(answer["body"].as_str().unwrap()).unwrap();
    body["text"].as_str().unwrap().to_string()
}

pub fn write_event(event: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", event).unwrap();
    file
}

pub async fn balance_sum(store: &dyn LedgerStore) -> Decimal {
    store
        .scan_all()
        .await
        .unwrap()
        .into_iter()
        .map(|(_, balance)| balance)
        .sum()
}

/// Only offers single-key adds and fails every write after the first `budget`.
pub struct FlakyStore {
    inner: InMemoryLedgerStore,
    budget: usize,
    writes: AtomicUsize,
}

impl FlakyStore {
    pub fn failing_after(budget: usize) -> Self {
        Self {
            inner: InMemoryLedgerStore::new(),
            budget,
            writes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LedgerStore for FlakyStore {
    async fn atomic_add(&self, key: &str, delta: Decimal) -> Result<()> {
        if self.writes.fetch_add(1, Ordering::SeqCst) >= self.budget {
            return Err(LedgerError::StoreFailure("write quota exhausted".to_string()));
        }
        self.inner.atomic_add(key, delta).await
    }

    async fn scan_all(&self) -> Result<Vec<(String, Decimal)>> {
        self.inner.scan_all().await
    }
}
