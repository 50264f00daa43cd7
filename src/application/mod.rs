//! Application layer containing the debt-recording pipelines.
//!
//! `RequestRouter` is the primary entry point. It sends dialog turns to the
//! `DialogStateMachine` and one-line commands to the `CommandHandler`; both
//! validate through the same `ValidationEngine` and write through `LedgerService`.

pub mod command;
pub mod dialog;
pub mod ledger;
pub mod resolver;
pub mod router;
pub mod validation;
