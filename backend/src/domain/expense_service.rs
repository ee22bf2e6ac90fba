use chrono::{DateTime, Utc};
use shared::{Expense, ExpenseItem, ExpenseItemList};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::converter::ExpenseItemConverter;
use crate::domain::errors::{ExpenseError, ExpenseResult};
use crate::storage::traits::ExpenseStorage;

/// Domain service for expenses and expense lists.
///
/// Validates caller input, enforces ownership and membership invariants, and
/// orchestrates reads/writes against the storage layer. Holds no cache of its
/// own; every operation completes as one linear sequence of storage calls.
#[derive(Clone)]
pub struct ExpenseService<R: ExpenseStorage> {
    repository: R,
    converter: ExpenseItemConverter,
}

impl<R: ExpenseStorage> ExpenseService<R> {
    pub fn new(repository: R, converter: ExpenseItemConverter) -> Self {
        Self { repository, converter }
    }

    /// Fetch a single expense. A well-formed but unknown id yields `Ok(None)`;
    /// the caller decides how to render absence.
    pub async fn get_expense_by_id(&self, expense_id: &str) -> ExpenseResult<Option<ExpenseItem>> {
        ensure_uuid(expense_id, "Expense id is not present")?;

        Ok(self.repository.get_expense_by_id(expense_id).await?)
    }

    /// List all expenses owned by an email.
    pub async fn get_expenses_by_email(&self, email: &str) -> ExpenseResult<Vec<ExpenseItem>> {
        ensure_present(email, "Email is not present")?;

        Ok(self.repository.get_expenses_by_email(email).await?)
    }

    /// Create an expense from a draft and return the assigned id.
    pub async fn create_expense(&self, draft: &Expense) -> ExpenseResult<String> {
        let item = self.converter.convert(draft);
        self.repository.create_expense(&item).await?;

        info!("Created expense {} for {}", item.id, item.email);

        Ok(item.id)
    }

    /// Update title and amount of an existing expense. The expense date and
    /// owner are immutable after creation.
    pub async fn update_expense(&self, expense_id: &str, draft: &Expense) -> ExpenseResult<()> {
        ensure_uuid(expense_id, "Expense id is not present")?;

        let item = self.repository.get_expense_by_id(expense_id).await?;
        if item.is_none() {
            return Err(ExpenseError::item_not_found("Expense does not exist"));
        }

        self.repository
            .update_expense(expense_id, &draft.title, draft.amount)
            .await?;

        info!("Updated expense {}", expense_id);

        Ok(())
    }

    /// Delete an expense by id.
    pub async fn delete_expense(&self, expense_id: &str) -> ExpenseResult<()> {
        ensure_uuid(expense_id, "Expense id is not present")?;

        self.repository.delete_expense(expense_id).await?;

        info!("Deleted expense {}", expense_id);

        Ok(())
    }

    /// Create a named, empty expense list and return its fresh id.
    pub async fn create_expense_list(&self, email: &str, title: &str) -> ExpenseResult<String> {
        let expense_list_id = Uuid::new_v4().to_string();
        self.repository
            .create_expense_list(&expense_list_id, email, title)
            .await?;

        info!("Created expense list {} for {}", expense_list_id, email);

        Ok(expense_list_id)
    }

    /// Attach an expense to a list. Fails if either side is missing, if the
    /// owners differ, or if the expense is already a member.
    pub async fn add_expense_item_to_list(
        &self,
        expense_list_id: Option<&str>,
        expense_item_id: Option<&str>,
    ) -> ExpenseResult<()> {
        let (list_id, expense_id) = require_ids(expense_list_id, expense_item_id)?;
        let (item, list) = self.load_membership_pair(list_id, expense_id).await?;

        if contains_item(&list, &item) {
            return Err(ExpenseError::item_not_found("Expense is already in the list"));
        }

        self.repository.add_expense_item_to_list(&list.id, &item).await?;

        info!("Added expense {} to list {}", item.id, list.id);

        Ok(())
    }

    /// Detach an expense from a list. Fails under the same conditions as
    /// attaching, except the expense must currently be a member.
    pub async fn remove_expense_item_from_list(
        &self,
        expense_list_id: Option<&str>,
        expense_item_id: Option<&str>,
    ) -> ExpenseResult<()> {
        let (list_id, expense_id) = require_ids(expense_list_id, expense_item_id)?;
        let (item, list) = self.load_membership_pair(list_id, expense_id).await?;

        if !contains_item(&list, &item) {
            return Err(ExpenseError::item_not_found("Expense is not in the list"));
        }

        self.repository
            .remove_expense_item_from_list(&list.id, &item)
            .await?;

        info!("Removed expense {} from list {}", item.id, list.id);

        Ok(())
    }

    /// List all expense lists owned by an email, each list's items ordered
    /// ascending by expense date. Returns freshly sorted sequences; stored
    /// order is never mutated.
    pub async fn get_expense_lists_by_email(&self, email: &str) -> ExpenseResult<Vec<ExpenseItemList>> {
        ensure_present(email, "Email is not present")?;

        let lists = self.repository.get_expense_lists_by_email(email).await?;

        Ok(lists
            .into_iter()
            .map(|list| ExpenseItemList {
                expense_items: sorted_by_expense_date(list.expense_items),
                ..list
            })
            .collect())
    }

    /// Resolve both sides of a membership operation, enforcing the existence
    /// and owner-match checks shared by attach and detach.
    async fn load_membership_pair(
        &self,
        list_id: &str,
        expense_id: &str,
    ) -> ExpenseResult<(ExpenseItem, ExpenseItemList)> {
        let item = self
            .repository
            .get_expense_by_id(expense_id)
            .await?
            .ok_or_else(|| ExpenseError::item_not_found("Expense does not exist"))?;

        let list = self
            .repository
            .get_expense_list_by_id(list_id)
            .await?
            .ok_or_else(|| ExpenseError::item_not_found("Expense list does not exist"))?;

        if item.email != list.email {
            warn!("Owner mismatch between expense {} and list {}", item.id, list.id);
            return Err(ExpenseError::item_not_found("Expense and list owners do not match"));
        }

        Ok((item, list))
    }
}

/// Membership is keyed on the item id: one expense at most once per list.
fn contains_item(list: &ExpenseItemList, item: &ExpenseItem) -> bool {
    list.expense_items.iter().any(|member| member.id == item.id)
}

fn ensure_present(value: &str, message: &str) -> ExpenseResult<()> {
    if value.is_empty() {
        return Err(ExpenseError::invalid_data(message));
    }
    Ok(())
}

/// Uniform id guard: empty or syntactically invalid UUIDs are rejected before
/// any storage call.
fn ensure_uuid(value: &str, message: &str) -> ExpenseResult<()> {
    ensure_present(value, message)?;
    if Uuid::parse_str(value).is_err() {
        return Err(ExpenseError::invalid_data(message));
    }
    Ok(())
}

/// Membership operations report a missing id differently from a malformed
/// one: absent ids are a not-found condition, present-but-invalid ids are
/// invalid data.
fn require_ids<'a>(
    expense_list_id: Option<&'a str>,
    expense_item_id: Option<&'a str>,
) -> ExpenseResult<(&'a str, &'a str)> {
    let list_id = expense_list_id
        .ok_or_else(|| ExpenseError::item_not_found("Expense list id is missing"))?;
    let expense_id = expense_item_id
        .ok_or_else(|| ExpenseError::item_not_found("Expense id is missing"))?;

    ensure_uuid(list_id, "Expense list id is not a valid UUID")?;
    ensure_uuid(expense_id, "Expense id is not a valid UUID")?;

    Ok((list_id, expense_id))
}

/// Order items ascending by their parsed expense date. The sort is stable, so
/// equal instants keep their stored relative order; rows whose date fails to
/// parse sort before all parseable ones.
fn sorted_by_expense_date(items: Vec<ExpenseItem>) -> Vec<ExpenseItem> {
    let mut sorted = items;
    sorted.sort_by_key(|item| parse_instant(&item.expense_date));
    sorted
}

fn parse_instant(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
