use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use meadowlark_core::{flash::take_flash, validation::validate_cart, Flash, SessionData};
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// The visitor's session for the current request. Handlers receive it as an
/// `Extension` and mutate it through [`SessionContext::lock`]; the middleware
/// writes it back to the store once the handler is done.
#[derive(Clone)]
pub struct SessionContext {
    data: Arc<Mutex<SessionData>>,
    flash: Option<Flash>,
}

impl SessionContext {
    pub fn new(data: SessionData, flash: Option<Flash>) -> Self {
        Self { data: Arc::new(Mutex::new(data)), flash }
    }

    /// The flash message taken from the session for this request.
    pub fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    pub async fn lock(&self) -> MutexGuard<'_, SessionData> {
        self.data.lock().await
    }
}

/// Loads the session named by the cookie (or starts one), recomputes the
/// cart annotations, hands the pending flash to this request, and saves the
/// session after the handler runs.
///
/// A session that cannot be loaded (unreadable payload, store outage) is
/// dropped and the visitor starts over with a new one.
///
/// Two requests for the same session that overlap both load the same state
/// and the later save wins.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let cookie_id = jar.get(&state.session.cookie_name).map(|c| c.value().to_string());

    let loaded = match cookie_id {
        Some(id) => match state.sessions.load(&id).await {
            Ok(data) => data.map(|data| (id, data)),
            Err(e) => {
                tracing::warn!("Discarding unreadable session {}: {}", id, e);
                if let Err(e) = state.sessions.destroy(&id).await {
                    tracing::warn!("Failed to destroy session {}: {}", id, e);
                }
                None
            }
        },
        None => None,
    };
    let (id, mut data) = loaded.unwrap_or_else(|| {
        let id = Uuid::new_v4().to_string();
        tracing::debug!("Starting session {}", id);
        (id, SessionData::default())
    });

    validate_cart(&mut data);
    let flash = take_flash(&mut data);

    let context = SessionContext::new(data, flash);
    req.extensions_mut().insert(context.clone());

    let response = next.run(req).await;

    let data = context.lock().await.clone();
    state.sessions.save(&id, &data, state.session.ttl_seconds).await?;

    let cookie = Cookie::build((state.session.cookie_name.clone(), id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), response).into_response())
}
