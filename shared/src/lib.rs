use serde::{Deserialize, Serialize};

/// A single recorded expense owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub id: String,
    /// Owner of the expense. Treated as an opaque key, not validated as an address.
    pub email: String,
    pub title: String,
    pub amount: f64,
    /// RFC 3339 timestamp assigned at creation, immutable afterwards.
    pub expense_date: String,
}

/// A named, owner-scoped collection of expense items.
///
/// An absent item collection and an empty one are the same observable state,
/// so deserialization defaults missing `expense_items` to an empty vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItemList {
    pub id: String,
    /// Owner of the list. Every member item must share this email.
    pub email: String,
    pub title: String,
    #[serde(default)]
    pub expense_items: Vec<ExpenseItem>,
}

/// Draft payload for creating or updating an expense.
///
/// The id and expense date are assigned server-side; callers only supply
/// owner, title and amount. Updates only consume title and amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub email: String,
    pub title: String,
    pub amount: f64,
}

/// Request for creating a new expense list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExpenseListRequest {
    pub email: String,
    pub title: String,
}

/// Request for attaching or detaching an expense item to/from a list.
///
/// Both fields are optional because clients may omit them entirely; the
/// service reports missing ids distinctly from malformed ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseListItemRequest {
    pub expense_list_id: Option<String>,
    pub expense_item_id: Option<String>,
}

/// Response after creating an expense or an expense list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Machine-readable failure payload rendered by the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error_type: String,
    pub message: String,
}
