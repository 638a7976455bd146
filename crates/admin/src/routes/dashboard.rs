//! Dashboard route handler.

use askama::Template;
use axum::{Router, extract::State, response::Html, routing::get};
use tracing::instrument;

use crate::{
    filters,
    middleware::RequireAdminAuth,
    models::CurrentAdmin,
    services::{DailyActivity, DashboardMetrics, users::fetch_sources},
    state::AppState,
};

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.to_string(),
        }
    }
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub metrics: Option<DashboardMetrics>,
    pub activity: Vec<DailyActivity>,
    pub error: Option<String>,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(index))
}

/// Dashboard page handler.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Html<String> {
    let (metrics, error) = match fetch_sources(state.store()).await {
        Ok(sources) => (Some(DashboardMetrics::compute_now(&sources)), None),
        Err(e) => {
            tracing::error!("Failed to load dashboard data: {e}");
            (None, Some("Failed to load dashboard data".to_string()))
        }
    };

    let template = DashboardTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/dashboard".to_string(),
        activity: metrics
            .as_ref()
            .map(|m| m.activity.clone())
            .unwrap_or_default(),
        metrics,
        error,
    };

    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}
