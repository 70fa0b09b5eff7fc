use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::{Datelike, Utc};
use meadowlark_catalog::CatalogFilter;
use meadowlark_core::get_fortune;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::middleware::SessionContext;
use crate::state::AppState;
use crate::views::render;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/vacations", get(list_vacations))
        .route("/vacation/{slug}", get(vacation_detail))
        .route("/thank-you", get(thank_you))
        .route("/about", get(about))
        .route("/tours", get(tours))
        .route("/tours/hood-river", get(hood_river))
        .route("/tours/oregon-coast", get(oregon_coast))
        .route("/tours/request-group-rate", get(request_group_rate))
        .route("/contest/vacation-photo", get(vacation_photo_contest))
}

#[derive(Debug, Deserialize)]
pub struct VacationQuery {
    pub category: Option<String>,
}

async fn home(Extension(session): Extension<SessionContext>) -> Json<Value> {
    render("home", &session, json!({ "title": "Meadowlark Travel" }))
}

/// GET /vacations - bookable packages only, optionally one category.
async fn list_vacations(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<VacationQuery>,
) -> Result<Json<Value>, AppError> {
    let filter = match query.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => CatalogFilter {
            available: Some(true),
            ..CatalogFilter::by_category(category)
        },
        _ => CatalogFilter::available(),
    };

    let vacations = state.vacations.find(&filter).await?;
    let summaries: Vec<_> = vacations.iter().map(|v| v.summary()).collect();

    Ok(render("vacations", &session, json!({ "vacations": summaries })))
}

async fn vacation_detail(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, AppError> {
    let vacation = state
        .vacations
        .find_one(&CatalogFilter::by_slug(&slug))
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("No vacation named {}", slug)))?;

    Ok(render(
        "vacation",
        &session,
        json!({
            "vacation": vacation,
            "price": vacation.display_price(),
        }),
    ))
}

async fn thank_you(Extension(session): Extension<SessionContext>) -> Json<Value> {
    render("thank-you", &session, Value::Null)
}

async fn about(Extension(session): Extension<SessionContext>) -> Json<Value> {
    render("about", &session, json!({ "fortune": get_fortune() }))
}

async fn tours(Extension(session): Extension<SessionContext>) -> Json<Value> {
    render(
        "tours/tours-home",
        &session,
        json!({
            "tours": [
                { "name": "Hood River", "href": "/tours/hood-river" },
                { "name": "Oregon Coast", "href": "/tours/oregon-coast" },
            ],
            "request_group_rate": "/tours/request-group-rate",
        }),
    )
}

/// Tour pages show the catalog package they advertise, when it exists.
async fn tour_page(
    state: &AppState,
    session: &SessionContext,
    page: &str,
    slug: &str,
) -> Result<Json<Value>, AppError> {
    let vacation = state.vacations.find_one(&CatalogFilter::by_slug(slug)).await?;
    Ok(render(page, session, json!({ "vacation": vacation.map(|v| v.summary()) })))
}

async fn hood_river(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<Value>, AppError> {
    tour_page(&state, &session, "tours/hood-river", "hood-river-day-trip").await
}

async fn oregon_coast(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<Value>, AppError> {
    tour_page(&state, &session, "tours/oregon-coast", "oregon-coast-getaway").await
}

async fn request_group_rate(Extension(session): Extension<SessionContext>) -> Json<Value> {
    render("tours/request-group-rate", &session, Value::Null)
}

/// The upload form posts to `/contest/vacation-photo/{year}/{month}`; `month`
/// is zero-based.
async fn vacation_photo_contest(Extension(session): Extension<SessionContext>) -> Json<Value> {
    let now = Utc::now();
    render(
        "contest/vacation-photo",
        &session,
        json!({ "year": now.year(), "month": now.month0() }),
    )
}

pub async fn not_found() -> AppError {
    AppError::NotFoundError("Not Found".to_string())
}
