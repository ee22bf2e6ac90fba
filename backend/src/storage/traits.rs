//! # Storage Traits
//!
//! Storage abstraction for the expense domain. The domain layer only talks to
//! this trait, so storage backends can be swapped without touching the
//! service.

use anyhow::Result;
use async_trait::async_trait;
use shared::{ExpenseItem, ExpenseItemList};

/// Interface for expense and expense-list persistence.
///
/// Each call is one storage round trip; there are no transactions spanning
/// calls, and callers must not rely on atomicity between a read and a
/// subsequent write.
#[async_trait]
pub trait ExpenseStorage: Send + Sync {
    /// Retrieve a single expense by id.
    async fn get_expense_by_id(&self, expense_id: &str) -> Result<Option<ExpenseItem>>;

    /// List all expenses owned by an email.
    async fn get_expenses_by_email(&self, email: &str) -> Result<Vec<ExpenseItem>>;

    /// Store a new expense.
    async fn create_expense(&self, item: &ExpenseItem) -> Result<()>;

    /// Overwrite title and amount of an existing expense. The expense date
    /// and owner are immutable and never written by updates.
    async fn update_expense(&self, expense_id: &str, title: &str, amount: f64) -> Result<()>;

    /// Delete an expense by id.
    async fn delete_expense(&self, expense_id: &str) -> Result<()>;

    /// Store a new, empty expense list.
    async fn create_expense_list(&self, expense_list_id: &str, email: &str, title: &str) -> Result<()>;

    /// Retrieve a list with its member items in insertion order.
    async fn get_expense_list_by_id(&self, expense_list_id: &str) -> Result<Option<ExpenseItemList>>;

    /// List all expense lists owned by an email, members in insertion order.
    async fn get_expense_lists_by_email(&self, email: &str) -> Result<Vec<ExpenseItemList>>;

    /// Attach an item to a list, appending it to the member order.
    async fn add_expense_item_to_list(&self, expense_list_id: &str, item: &ExpenseItem) -> Result<()>;

    /// Detach an item from a list.
    async fn remove_expense_item_from_list(&self, expense_list_id: &str, item: &ExpenseItem) -> Result<()>;
}
