use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Form, Json, Router,
};
use meadowlark_core::{set_flash, CoreError, Flash};
use meadowlark_shared::Masked;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::AppError;
use crate::middleware::SessionContext;
use crate::state::AppState;
use crate::views::{render, wants_json};

#[derive(Debug, Deserialize)]
pub struct InSeasonForm {
    pub email: String,
    pub sku: String,
}

#[derive(Debug, Deserialize)]
pub struct NewsletterForm {
    #[serde(default)]
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ProcessQuery {
    pub form: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProcessForm {
    #[serde(rename = "_csrf")]
    pub csrf: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notify-me-when-in-season", post(notify_when_in_season))
        .route("/newsletter", get(newsletter_page).post(newsletter_signup))
        .route("/newsletter/archive", get(newsletter_archive))
        .route("/process", post(process_form))
}

/// POST /notify-me-when-in-season
async fn notify_when_in_season(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<InSeasonForm>,
) -> Redirect {
    let mut data = session.lock().await;
    state.notifications.subscribe(&form.email, form.sku.trim(), &mut data).await;

    Redirect::to("/vacations")
}

async fn newsletter_page(Extension(session): Extension<SessionContext>) -> Json<Value> {
    render("newsletter", &session, Value::Null)
}

async fn newsletter_archive(Extension(session): Extension<SessionContext>) -> Json<Value> {
    render("newsletter-archive", &session, Value::Null)
}

/// POST /newsletter
async fn newsletter_signup(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    headers: HeaderMap,
    Form(form): Form<NewsletterForm>,
) -> Result<Response, AppError> {
    let json = wants_json(&headers);
    let result = state.notifications.sign_up_for_newsletter(&form.name, &form.email).await;
    let mut data = session.lock().await;

    match result {
        Ok(_) if json => Ok(Json(json!({ "success": true })).into_response()),
        Ok(_) => {
            set_flash(
                &mut data,
                Flash::success("Thank you!", "You have now been signed up for the newsletter."),
            );
            Ok(Redirect::to("/newsletter/archive").into_response())
        }
        Err(CoreError::ValidationError(msg)) if json => Err(AppError::ValidationError(msg)),
        Err(CoreError::ValidationError(_)) => {
            set_flash(
                &mut data,
                Flash::danger("Validation error!", "The email address you entered was not valid."),
            );
            Ok(Redirect::to("/newsletter").into_response())
        }
        Err(e) if json => Err(e.into()),
        Err(e) => {
            tracing::error!("Newsletter signup failed: {}", e);
            set_flash(
                &mut data,
                Flash::danger("Ooops!", "There was an error processing your request."),
            );
            Ok(Redirect::to("/newsletter").into_response())
        }
    }
}

/// POST /process - generic form endpoint used by the site's contact forms.
async fn process_form(
    headers: HeaderMap,
    Query(query): Query<ProcessQuery>,
    Form(form): Form<ProcessForm>,
) -> Response {
    let email = form.email.as_deref().map(Masked::from).map(|m| m.to_string()).unwrap_or_default();
    info!(
        "Form received (form: {}, csrf present: {}, name present: {}, email: {})",
        query.form.as_deref().unwrap_or("-"),
        form.csrf.is_some(),
        form.name.is_some(),
        email
    );

    if wants_json(&headers) {
        return (StatusCode::OK, Json(json!({ "success": true }))).into_response();
    }

    Redirect::to("/thank-you").into_response()
}
