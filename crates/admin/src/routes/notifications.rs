//! Notification compose form, broadcast and history.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use spot_my_ride_core::NotificationKind;

use crate::{
    filters,
    middleware::RequireAdminAuth,
    services::notifications::{self, BroadcastError, BroadcastRequest, BroadcastSummary},
    state::AppState,
};

use super::dashboard::AdminUserView;
use super::{Flash, with_flash};

/// Page query: history search plus flash feedback.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationsQuery {
    pub q: Option<String>,
    pub success: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
}

/// Submitted compose form.
#[derive(Debug, Deserialize)]
pub struct BroadcastForm {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

/// One option of the kind selector.
#[derive(Debug, Clone)]
pub struct KindOption {
    pub value: &'static str,
    pub selected: bool,
}

/// Notifications page template.
#[derive(Template)]
#[template(path = "notifications/index.html")]
pub struct NotificationsTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub kinds: Vec<KindOption>,
    pub form_title: String,
    pub form_message: String,
    pub history: Vec<BroadcastSummary>,
    pub search_query: String,
    pub success: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
}

/// Build the notifications router.
pub fn router() -> Router<AppState> {
    Router::new().route("/notification", get(index).post(send))
}

struct PageInput {
    form: BroadcastForm,
    search_query: String,
    success: Option<String>,
    warning: Option<String>,
    error: Option<String>,
}

async fn render_page(state: &AppState, admin: AdminUserView, input: PageInput) -> Html<String> {
    let (history, error) = match notifications::history(state.store(), &input.search_query).await {
        Ok(history) => (history, input.error),
        Err(e) => {
            tracing::error!("Failed to load notification history: {e}");
            (
                Vec::new(),
                input
                    .error
                    .or_else(|| Some("Failed to load notification history".to_string())),
            )
        }
    };

    let selected = input
        .form
        .kind
        .parse::<NotificationKind>()
        .unwrap_or_default();
    let kinds = [NotificationKind::Email, NotificationKind::Push]
        .into_iter()
        .map(|kind| KindOption {
            value: kind.as_str(),
            selected: kind == selected,
        })
        .collect();

    let template = NotificationsTemplate {
        admin_user: admin,
        current_path: "/notification".to_string(),
        kinds,
        form_title: input.form.title,
        form_message: input.form.message,
        history,
        search_query: input.search_query,
        success: input.success,
        warning: input.warning,
        error,
    };

    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Compose form and history.
///
/// GET /notification
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<NotificationsQuery>,
) -> Html<String> {
    let input = PageInput {
        form: BroadcastForm {
            kind: String::new(),
            title: String::new(),
            message: String::new(),
        },
        search_query: query.q.unwrap_or_default().trim().to_owned(),
        success: query.success,
        warning: query.warning,
        error: query.error,
    };
    render_page(&state, AdminUserView::from(&admin), input).await
}

/// Broadcast to every account.
///
/// POST /notification
#[instrument(skip(admin, state, form), fields(kind = %form.kind))]
pub async fn send(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Form(form): Form<BroadcastForm>,
) -> Response {
    let request = match BroadcastRequest::parse(&form.kind, &form.title, &form.message) {
        Ok(request) => request,
        Err(e) => {
            // Re-render so the admin keeps what they typed.
            let input = PageInput {
                form,
                search_query: String::new(),
                success: None,
                warning: None,
                error: Some(e.to_string()),
            };
            return render_page(&state, AdminUserView::from(&admin), input)
                .await
                .into_response();
        }
    };

    let target = match notifications::broadcast(state.store(), state.push(), &request).await {
        Ok(report) if report.is_warning() => {
            with_flash("/notification", Flash::Warning, &report.message())
        }
        Ok(report) => with_flash("/notification", Flash::Success, &report.message()),
        Err(BroadcastError::Repository(e)) => {
            tracing::error!("Failed to load recipients: {e}");
            with_flash(
                "/notification",
                Flash::Error,
                "Failed to load users. Notification not sent.",
            )
        }
        Err(e) => with_flash("/notification", Flash::Error, &e.to_string()),
    };

    Redirect::to(&target).into_response()
}
