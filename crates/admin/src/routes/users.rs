//! User list, detail and suspend/activate handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use spot_my_ride_core::AccountId;

use crate::{
    components::Pagination,
    db::RepositoryError,
    error::AppError,
    filters,
    middleware::RequireAdminAuth,
    services::users::{PAGE_SIZE, UserRecord, filter_records, toggle_status},
    state::AppState,
};

use super::dashboard::AdminUserView;
use super::{Flash, FlashParams, with_flash};

/// List query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub q: Option<String>,
    /// Kept as text so a malformed page number falls back to page 1.
    pub page: Option<String>,
}

/// One numbered page link.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

fn page_href(query: &str, page: usize) -> String {
    if query.is_empty() {
        format!("/user?page={page}")
    } else {
        format!("/user?q={}&page={page}", urlencoding::encode(query))
    }
}

/// User list template.
#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub users: Vec<UserRecord>,
    pub pagination: Pagination,
    pub page_links: Vec<PageLink>,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    pub search_query: String,
    pub error: Option<String>,
}

/// User detail template.
#[derive(Template)]
#[template(path = "users/show.html")]
pub struct UserShowTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub user: UserRecord,
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user", get(index))
        .route("/user/{id}", get(show))
        .route("/user/{id}/status", post(toggle))
        .route("/api/users/{id}/status", post(toggle_api))
}

fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// User list page handler.
///
/// Every load rescans the four source collections.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> Html<String> {
    let search_query = query.q.unwrap_or_default().trim().to_owned();
    let requested = query
        .page
        .as_deref()
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(1);

    let (records, error) = match state.users().refresh(state.store()).await {
        Ok(records) => (records, None),
        Err(e) => {
            tracing::error!("Failed to load users: {e}");
            (Vec::new(), Some("Failed to load users".to_string()))
        }
    };

    let filtered = filter_records(&records, &search_query);
    let pagination = Pagination::new(filtered.len(), requested, PAGE_SIZE);
    let users: Vec<UserRecord> = pagination
        .slice(&filtered)
        .iter()
        .map(|record| (*record).clone())
        .collect();

    let page_links = pagination
        .pages()
        .into_iter()
        .map(|number| PageLink {
            number,
            href: page_href(&search_query, number),
            current: number == pagination.page,
        })
        .collect();

    let template = UsersIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/user".to_string(),
        users,
        previous_href: pagination
            .has_previous()
            .then(|| page_href(&search_query, pagination.previous())),
        next_href: pagination
            .has_next()
            .then(|| page_href(&search_query, pagination.next())),
        pagination,
        page_links,
        search_query,
        error,
    };

    render(&template)
}

/// User detail page handler.
#[instrument(skip(admin, state, flash))]
pub async fn show(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(flash): Query<FlashParams>,
) -> Result<Html<String>, AppError> {
    let id = AccountId::new(id);
    let user = state
        .users()
        .find(state.store(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    Ok(render(&UserShowTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/user".to_string(),
        user,
        success: flash.success,
        error: flash.error,
    }))
}

/// Suspend/activate from the detail page.
///
/// POST /user/{id}/status
#[instrument(skip(_admin, state))]
pub async fn toggle(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = AccountId::new(id);
    let detail = format!("/user/{}", urlencoding::encode(id.as_str()));

    match toggle_status(state.store(), state.users(), &id).await {
        Ok(change) => Redirect::to(&with_flash(&detail, Flash::Success, &change.message())),
        Err(RepositoryError::NotFound) => {
            Redirect::to(&with_flash("/user", Flash::Error, "User not found"))
        }
        Err(e) => {
            tracing::error!("Failed to update user status: {e}");
            Redirect::to(&with_flash(&detail, Flash::Error, "Failed to update user status"))
        }
    }
    .into_response()
}

/// Error response for API endpoints.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// Response for a confirmed status change.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub id: String,
    pub active: bool,
    pub status: &'static str,
    pub message: String,
    /// The patched row, when the user view is loaded.
    pub user: Option<UserRecord>,
}

/// Suspend/activate, JSON variant.
///
/// POST /api/users/{id}/status
#[instrument(skip(_admin, state))]
pub async fn toggle_api(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = AccountId::new(id);

    match toggle_status(state.store(), state.users(), &id).await {
        Ok(change) => {
            let user = state
                .users()
                .cached()
                .await
                .and_then(|records| records.into_iter().find(|r| r.id == id));
            Json(StatusResponse {
                id: change.id.to_string(),
                active: change.status.is_active(),
                status: change.status.label(),
                message: change.message(),
                user,
            })
            .into_response()
        }
        Err(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, Json(ApiError::new("User not found"))).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to update user status: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiError::new("Failed to update user status")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_href() {
        assert_eq!(page_href("", 2), "/user?page=2");
        assert_eq!(page_href("ali khan", 3), "/user?q=ali%20khan&page=3");
    }
}
