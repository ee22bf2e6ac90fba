use std::net::SocketAddr;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

mod domain;
mod rest;
mod storage;

use domain::{ExpenseItemConverter, ExpenseService};
use rest::AppState;
use storage::sqlite::{ExpenseRepository, SqliteConnection};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Setting up database");
    let connection = SqliteConnection::init().await?;

    // Wire up the service with its two collaborators
    let repository = ExpenseRepository::new(connection);
    let expense_service = ExpenseService::new(repository, ExpenseItemConverter::new());
    let state = AppState::new(expense_service);

    // CORS setup to allow a local frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // Set up our application routes
    let api_routes = Router::new()
        .route(
            "/expenses",
            get(rest::get_expenses_by_email).post(rest::create_expense),
        )
        .route(
            "/expenses/:expense_id",
            get(rest::get_expense_by_id)
                .put(rest::update_expense)
                .delete(rest::delete_expense),
        )
        .route(
            "/expenselists",
            get(rest::get_expense_lists_by_email).post(rest::create_expense_list),
        )
        .route(
            "/expenselists/items",
            post(rest::add_expense_item_to_list).delete(rest::remove_expense_item_from_list),
        );

    // Define our main application router
    let app = Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state);

    // Start the server
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
