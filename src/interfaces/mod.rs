//! Transport adapters: JSON events in, JSON answers out.

pub mod event;
pub mod lex;
pub mod slash_command;
