use anyhow::Result;
use async_trait::async_trait;
use shared::{ExpenseItem, ExpenseItemList};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::connection::SqliteConnection;
use crate::storage::traits::ExpenseStorage;

/// SQLite-backed repository for expenses and expense lists
#[derive(Clone)]
pub struct ExpenseRepository {
    connection: SqliteConnection,
}

impl ExpenseRepository {
    /// Create a new repository on top of an initialized connection
    pub fn new(connection: SqliteConnection) -> Self {
        Self { connection }
    }

    fn row_to_item(row: &SqliteRow) -> ExpenseItem {
        ExpenseItem {
            id: row.get("id"),
            email: row.get("email"),
            title: row.get("title"),
            amount: row.get("amount"),
            expense_date: row.get("expense_date"),
        }
    }

    /// Load the member items of a list in insertion order.
    async fn get_list_items(&self, expense_list_id: &str) -> Result<Vec<ExpenseItem>> {
        let rows = sqlx::query(
            "SELECT i.id, i.email, i.title, i.amount, i.expense_date \
             FROM expense_list_items m \
             JOIN expense_items i ON i.id = m.expense_id \
             WHERE m.list_id = ? \
             ORDER BY m.position",
        )
        .bind(expense_list_id)
        .fetch_all(self.connection.pool())
        .await?;

        Ok(rows.iter().map(Self::row_to_item).collect())
    }
}

#[async_trait]
impl ExpenseStorage for ExpenseRepository {
    async fn get_expense_by_id(&self, expense_id: &str) -> Result<Option<ExpenseItem>> {
        let row = sqlx::query(
            "SELECT id, email, title, amount, expense_date FROM expense_items WHERE id = ?",
        )
        .bind(expense_id)
        .fetch_optional(self.connection.pool())
        .await?;

        Ok(row.as_ref().map(Self::row_to_item))
    }

    async fn get_expenses_by_email(&self, email: &str) -> Result<Vec<ExpenseItem>> {
        let rows = sqlx::query(
            "SELECT id, email, title, amount, expense_date FROM expense_items WHERE email = ?",
        )
        .bind(email)
        .fetch_all(self.connection.pool())
        .await?;

        Ok(rows.iter().map(Self::row_to_item).collect())
    }

    async fn create_expense(&self, item: &ExpenseItem) -> Result<()> {
        sqlx::query(
            "INSERT INTO expense_items (id, email, title, amount, expense_date) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&item.id)
        .bind(&item.email)
        .bind(&item.title)
        .bind(item.amount)
        .bind(&item.expense_date)
        .execute(self.connection.pool())
        .await?;

        Ok(())
    }

    async fn update_expense(&self, expense_id: &str, title: &str, amount: f64) -> Result<()> {
        sqlx::query("UPDATE expense_items SET title = ?, amount = ? WHERE id = ?")
            .bind(title)
            .bind(amount)
            .bind(expense_id)
            .execute(self.connection.pool())
            .await?;

        Ok(())
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM expense_items WHERE id = ?")
            .bind(expense_id)
            .execute(self.connection.pool())
            .await?;

        Ok(())
    }

    async fn create_expense_list(
        &self,
        expense_list_id: &str,
        email: &str,
        title: &str,
    ) -> Result<()> {
        sqlx::query("INSERT INTO expense_lists (id, email, title) VALUES (?, ?, ?)")
            .bind(expense_list_id)
            .bind(email)
            .bind(title)
            .execute(self.connection.pool())
            .await?;

        Ok(())
    }

    async fn get_expense_list_by_id(&self, expense_list_id: &str) -> Result<Option<ExpenseItemList>> {
        let row = sqlx::query("SELECT id, email, title FROM expense_lists WHERE id = ?")
            .bind(expense_list_id)
            .fetch_optional(self.connection.pool())
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expense_items = self.get_list_items(expense_list_id).await?;

        Ok(Some(ExpenseItemList {
            id: row.get("id"),
            email: row.get("email"),
            title: row.get("title"),
            expense_items,
        }))
    }

    async fn get_expense_lists_by_email(&self, email: &str) -> Result<Vec<ExpenseItemList>> {
        let rows = sqlx::query("SELECT id, email, title FROM expense_lists WHERE email = ?")
            .bind(email)
            .fetch_all(self.connection.pool())
            .await?;

        let mut lists = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.get("id");
            let expense_items = self.get_list_items(&id).await?;
            lists.push(ExpenseItemList {
                id,
                email: row.get("email"),
                title: row.get("title"),
                expense_items,
            });
        }

        Ok(lists)
    }

    async fn add_expense_item_to_list(&self, expense_list_id: &str, item: &ExpenseItem) -> Result<()> {
        sqlx::query(
            "INSERT INTO expense_list_items (list_id, expense_id, position) \
             VALUES (?, ?, (SELECT COALESCE(MAX(position), -1) + 1 \
                            FROM expense_list_items WHERE list_id = ?))",
        )
        .bind(expense_list_id)
        .bind(&item.id)
        .bind(expense_list_id)
        .execute(self.connection.pool())
        .await?;

        Ok(())
    }

    async fn remove_expense_item_from_list(
        &self,
        expense_list_id: &str,
        item: &ExpenseItem,
    ) -> Result<()> {
        sqlx::query("DELETE FROM expense_list_items WHERE list_id = ? AND expense_id = ?")
            .bind(expense_list_id)
            .bind(&item.id)
            .execute(self.connection.pool())
            .await?;

        Ok(())
    }
}
