use axum::{
    extract::State,
    response::Redirect,
    routing::{get, post},
    Extension, Form, Json, Router,
};
use meadowlark_catalog::format_cents;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::middleware::SessionContext;
use crate::state::AppState;
use crate::views::render;

#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub sku: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub guests: Option<u32>,
}

/// A blank number input arrives as `guests=`; treat it as absent.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

#[derive(Debug, Serialize)]
struct CartLine {
    sku: String,
    name: String,
    guests: u32,
    maximum_guests: u32,
    price: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(view_cart))
        .route("/cart/add", post(add_to_cart))
}

/// GET /cart
async fn view_cart(Extension(session): Extension<SessionContext>) -> Json<Value> {
    let data = session.lock().await;
    let cart = data.cart.clone().unwrap_or_default();

    let lines: Vec<CartLine> = cart
        .items
        .iter()
        .map(|item| CartLine {
            sku: item.product.sku.clone(),
            name: item.product.name.clone(),
            guests: item.guests,
            maximum_guests: item.product.maximum_guests,
            price: item.product.display_price(),
        })
        .collect();

    let total_in_cents = cart.total_in_cents();
    render(
        "cart",
        &session,
        json!({
            "items": lines,
            "warnings": cart.warnings,
            "errors": cart.errors,
            "total_in_cents": total_in_cents,
            "total": format_cents(total_in_cents),
        }),
    )
}

/// POST /cart/add
async fn add_to_cart(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect, AppError> {
    let mut data = session.lock().await;
    state.cart.add_to_cart(&mut data, form.sku.trim(), form.guests).await?;

    Ok(Redirect::to("/cart"))
}
