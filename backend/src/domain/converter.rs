use chrono::{SecondsFormat, Utc};
use shared::{Expense, ExpenseItem};
use uuid::Uuid;

/// Maps an inbound expense draft into a persistable item.
#[derive(Debug, Clone, Default)]
pub struct ExpenseItemConverter;

impl ExpenseItemConverter {
    pub fn new() -> Self {
        Self
    }

    /// Assign a fresh id and creation timestamp. Owner, title and amount pass
    /// through unchanged.
    pub fn convert(&self, draft: &Expense) -> ExpenseItem {
        ExpenseItem {
            id: Uuid::new_v4().to_string(),
            email: draft.email.clone(),
            title: draft.title.clone(),
            amount: draft.amount,
            expense_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn test_draft() -> Expense {
        Expense {
            email: "user@example.com".to_string(),
            title: "Groceries".to_string(),
            amount: 42.5,
        }
    }

    #[test]
    fn test_convert_passes_draft_fields_through() {
        let converter = ExpenseItemConverter::new();
        let draft = test_draft();

        let item = converter.convert(&draft);

        assert_eq!(item.email, draft.email);
        assert_eq!(item.title, draft.title);
        assert_eq!(item.amount, draft.amount);
    }

    #[test]
    fn test_convert_assigns_parseable_id_and_date() {
        let converter = ExpenseItemConverter::new();

        let item = converter.convert(&test_draft());

        Uuid::parse_str(&item.id).expect("id should be a valid UUID");
        DateTime::parse_from_rfc3339(&item.expense_date)
            .expect("expense date should be a valid RFC 3339 instant");
    }

    #[test]
    fn test_convert_assigns_distinct_ids() {
        let converter = ExpenseItemConverter::new();
        let draft = test_draft();

        let first = converter.convert(&draft);
        let second = converter.convert(&draft);

        assert_ne!(first.id, second.id);
    }
}
