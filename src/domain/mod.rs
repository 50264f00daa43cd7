//! Domain types for the chip ledger: amounts, users, balances, dialog turns,
//! and the ports the application layer talks to.

pub mod account;
pub mod amount;
pub mod dialog;
pub mod ports;
pub mod transaction;
pub mod user;
