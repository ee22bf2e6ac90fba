//! # SQLite Storage Module
//!
//! SQLite-backed implementation of the expense storage contract. The schema
//! keeps items, lists, and memberships in separate tables; membership rows
//! carry a position column so a list's items come back in insertion order.

pub mod connection;
pub mod expense_repository;

pub use connection::SqliteConnection;
pub use expense_repository::ExpenseRepository;
