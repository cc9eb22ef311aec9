//! Financial category routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use shearbook_core::ledger::{EntryType, LedgerError};
use shearbook_db::CategoryRepository;
use shearbook_db::repositories::category::CreateCategoryInput;

use crate::{AppState, dto::CategoryDto, error::error_response};

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounting/categories", get(list_categories))
        .route("/accounting/categories", post(create_category))
        .route("/accounting/categories/{id}", delete(delete_category))
}

/// Query parameters for listing categories.
#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    /// Filter by category type.
    #[serde(rename = "type")]
    pub category_type: Option<EntryType>,
}

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryBody {
    /// Unique name within the type.
    pub name: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub category_type: EntryType,
    /// Optional description.
    pub description: Option<String>,
}

fn ledger_error(err: &LedgerError) -> Response {
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

/// GET `/accounting/categories` - List categories, optionally by type.
async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ListCategoriesQuery>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.list(query.category_type).await {
        Ok(categories) => {
            let categories: Vec<CategoryDto> = categories.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(categories)).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// POST `/accounting/categories` - Create a category.
async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryBody>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());
    let input = CreateCategoryInput {
        name: payload.name,
        category_type: payload.category_type,
        description: payload.description,
    };

    match repo.create(input).await {
        Ok(category) => {
            info!(category_id = %category.id, "Category created");
            (StatusCode::CREATED, Json(CategoryDto::from(category))).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// DELETE `/accounting/categories/{id}` - Delete an unused category.
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(category_id = %id, "Category deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => ledger_error(&e),
    }
}
