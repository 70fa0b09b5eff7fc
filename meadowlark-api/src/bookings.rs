use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::post,
    Extension, Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use meadowlark_core::take_flash;

use crate::middleware::SessionContext;
use crate::state::AppState;
use crate::views::wants_json;

#[derive(Debug, Deserialize)]
pub struct BookingForm {
    pub sku: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/vacations/book", post(book_vacation))
}

/// POST /vacations/book
///
/// Always answers with the vacations page (or JSON); the outcome travels in
/// the flash message.
async fn book_vacation(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    headers: HeaderMap,
    Form(form): Form<BookingForm>,
) -> Response {
    let mut data = session.lock().await;
    let outcome = state.booking.book(form.sku.trim(), &mut data).await;

    if wants_json(&headers) {
        // Reported inline, so the next page should not repeat it.
        take_flash(&mut data);
        return Json(json!({
            "success": outcome.booked,
            "flash": outcome.flash,
        }))
        .into_response();
    }

    Redirect::to("/vacations").into_response()
}
