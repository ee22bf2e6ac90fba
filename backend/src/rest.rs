use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use shared::{CreateExpenseListRequest, CreatedResponse, Expense, ExpenseListItemRequest};
use tracing::info;

use crate::domain::{ExpenseError, ExpenseService};
use crate::storage::sqlite::ExpenseRepository;

/// Application state containing the expense domain service
#[derive(Clone)]
pub struct AppState {
    pub expense_service: ExpenseService<ExpenseRepository>,
}

impl AppState {
    /// Create new application state with the given ExpenseService
    pub fn new(expense_service: ExpenseService<ExpenseRepository>) -> Self {
        Self { expense_service }
    }
}

/// Query parameters for owner-scoped reads
#[derive(Deserialize, Debug)]
pub struct OwnerQuery {
    pub email: Option<String>,
}

/// Axum handler function for POST /api/expenses
pub async fn create_expense(
    State(state): State<AppState>,
    Json(draft): Json<Expense>,
) -> impl IntoResponse {
    info!("POST /api/expenses - owner: {}", draft.email);

    match state.expense_service.create_expense(&draft).await {
        Ok(id) => (StatusCode::CREATED, Json(CreatedResponse { id })).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for GET /api/expenses/:expense_id
pub async fn get_expense_by_id(
    State(state): State<AppState>,
    Path(expense_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/expenses/{}", expense_id);

    match state.expense_service.get_expense_by_id(&expense_id).await {
        Ok(Some(item)) => (StatusCode::OK, Json(item)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Expense not found").into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for GET /api/expenses
pub async fn get_expenses_by_email(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> impl IntoResponse {
    info!("GET /api/expenses - query: {:?}", query);

    let email = query.email.unwrap_or_default();
    match state.expense_service.get_expenses_by_email(&email).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for PUT /api/expenses/:expense_id
pub async fn update_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<String>,
    Json(draft): Json<Expense>,
) -> impl IntoResponse {
    info!("PUT /api/expenses/{}", expense_id);

    match state.expense_service.update_expense(&expense_id, &draft).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for DELETE /api/expenses/:expense_id
pub async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/expenses/{}", expense_id);

    match state.expense_service.delete_expense(&expense_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for POST /api/expenselists
pub async fn create_expense_list(
    State(state): State<AppState>,
    Json(request): Json<CreateExpenseListRequest>,
) -> impl IntoResponse {
    info!("POST /api/expenselists - owner: {}", request.email);

    match state
        .expense_service
        .create_expense_list(&request.email, &request.title)
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(CreatedResponse { id })).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for GET /api/expenselists
pub async fn get_expense_lists_by_email(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> impl IntoResponse {
    info!("GET /api/expenselists - query: {:?}", query);

    let email = query.email.unwrap_or_default();
    match state.expense_service.get_expense_lists_by_email(&email).await {
        Ok(lists) => (StatusCode::OK, Json(lists)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for POST /api/expenselists/items
pub async fn add_expense_item_to_list(
    State(state): State<AppState>,
    Json(request): Json<ExpenseListItemRequest>,
) -> impl IntoResponse {
    info!("POST /api/expenselists/items - request: {:?}", request);

    match state
        .expense_service
        .add_expense_item_to_list(
            request.expense_list_id.as_deref(),
            request.expense_item_id.as_deref(),
        )
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler function for DELETE /api/expenselists/items
pub async fn remove_expense_item_from_list(
    State(state): State<AppState>,
    Json(request): Json<ExpenseListItemRequest>,
) -> impl IntoResponse {
    info!("DELETE /api/expenselists/items - request: {:?}", request);

    match state
        .expense_service
        .remove_expense_item_from_list(
            request.expense_list_id.as_deref(),
            request.expense_item_id.as_deref(),
        )
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// Map a domain failure onto the wire: 400 for invalid input, 404 for missing
/// entities or violated invariants, 500 for storage failures. Domain failures
/// carry their structured payload as the body.
fn error_response(error: ExpenseError) -> Response {
    match &error {
        ExpenseError::InvalidData(_) => {
            (StatusCode::BAD_REQUEST, Json(error.error_payload())).into_response()
        }
        ExpenseError::ItemNotFound(_) => {
            (StatusCode::NOT_FOUND, Json(error.error_payload())).into_response()
        }
        ExpenseError::Storage(e) => {
            tracing::error!("Storage error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExpenseItemConverter;
    use crate::storage::sqlite::SqliteConnection;
    use shared::ErrorPayload;

    /// Helper to create test handlers
    async fn setup_test_state() -> AppState {
        let connection = SqliteConnection::init_test()
            .await
            .expect("Failed to create test database");
        let repository = ExpenseRepository::new(connection);
        AppState::new(ExpenseService::new(repository, ExpenseItemConverter::new()))
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        serde_json::from_slice(&bytes).expect("Failed to parse response body")
    }

    fn test_draft() -> Expense {
        Expense {
            email: "ana@example.com".to_string(),
            title: "Groceries".to_string(),
            amount: 12.5,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_expense_handlers() {
        let state = setup_test_state().await;

        let response = create_expense(State(state.clone()), Json(test_draft()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: CreatedResponse = body_json(response).await;

        let response = get_expense_by_id(State(state), Path(created.id))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_expense_malformed_id_is_bad_request() {
        let state = setup_test_state().await;

        let response = get_expense_by_id(State(state), Path("not-a-uuid".to_string()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload: ErrorPayload = body_json(response).await;
        assert_eq!(payload.error_type, "InvalidData");
    }

    #[tokio::test]
    async fn test_get_unknown_expense_is_not_found() {
        let state = setup_test_state().await;
        let unknown = uuid::Uuid::new_v4().to_string();

        let response = get_expense_by_id(State(state), Path(unknown))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_unknown_expense_is_not_found() {
        let state = setup_test_state().await;
        let unknown = uuid::Uuid::new_v4().to_string();

        let response = update_expense(State(state), Path(unknown), Json(test_draft()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let payload: ErrorPayload = body_json(response).await;
        assert_eq!(payload.error_type, "ItemNotFound");
    }

    #[tokio::test]
    async fn test_membership_handler_with_missing_ids_is_not_found() {
        let state = setup_test_state().await;
        let request = ExpenseListItemRequest {
            expense_list_id: None,
            expense_item_id: None,
        };

        let response = add_expense_item_to_list(State(state), Json(request))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_expense_list_lifecycle_handlers() {
        let state = setup_test_state().await;

        let list_request = CreateExpenseListRequest {
            email: "ana@example.com".to_string(),
            title: "Trip".to_string(),
        };
        let response = create_expense_list(State(state.clone()), Json(list_request))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        let list: CreatedResponse = body_json(response).await;

        let response = create_expense(State(state.clone()), Json(test_draft()))
            .await
            .into_response();
        let expense: CreatedResponse = body_json(response).await;

        let request = ExpenseListItemRequest {
            expense_list_id: Some(list.id),
            expense_item_id: Some(expense.id),
        };
        let response = add_expense_item_to_list(State(state.clone()), Json(request.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = remove_expense_item_from_list(State(state), Json(request))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_get_expenses_without_email_is_bad_request() {
        let state = setup_test_state().await;

        let response = get_expenses_by_email(State(state), Query(OwnerQuery { email: None }))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
