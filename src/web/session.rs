use super::AppState;
use crate::components::oauth::{is_oauth_flow, UserCredential, AUTHORIZE_PATH};
use crate::components::session::Session;
use crate::error::GatewayResult;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use super::handlers::found;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "warden_session";

/// Routes reachable without a signed-in user besides the OAuth flow
const PUBLIC_PATHS: [&str; 1] = ["/health"];

/// Per-request view of the session and the credential derived from it
#[derive(Clone)]
pub struct RequestContext {
    pub session: Arc<Mutex<Session>>,
    pub credential: Arc<Mutex<UserCredential>>,
}

impl RequestContext {
    fn new(session: Session) -> Self {
        let credential = UserCredential::from_session(&session);
        Self {
            session: Arc::new(Mutex::new(session)),
            credential: Arc::new(Mutex::new(credential)),
        }
    }
}

fn session_cookie(id: String) -> Cookie<'static> {
    // Lax so the cookie survives the cross-site redirect back from the consent screen
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(30))
        .build()
}

/// Load the session, gate unauthorized requests, and write the request
/// credential back to the session once the handler is done.
///
/// Public paths never touch the session store. A session is only saved, and
/// its cookie only issued, when the request changed it or the browser
/// already holds a cookie for it.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut req: Request,
    next: Next,
) -> GatewayResult<Response> {
    let path = req.uri().path().to_string();
    if PUBLIC_PATHS.contains(&path.as_str()) {
        return Ok(next.run(req).await);
    }

    let (session_id, had_cookie) = match jar.get(SESSION_COOKIE) {
        Some(cookie) => (cookie.value().to_string(), true),
        None => (Uuid::new_v4().to_string(), false),
    };

    let mut session = state.sessions.load(&session_id).await?;
    if session.access_token().is_none() {
        if let Some(stored) = &state.stored_credential {
            session.store_credential(stored);
        }
    }
    let loaded = session.record().clone();

    let ctx = RequestContext::new(session);
    let loaded_credential = ctx.credential.lock().await.clone();

    let response = if loaded_credential.is_authorized() || is_oauth_flow(&path) {
        req.extensions_mut().insert(ctx.clone());
        next.run(req).await
    } else {
        debug!("No access token in session, redirecting {} to authorization", path);
        found(AUTHORIZE_PATH)
    };

    // The handler may have rotated tokens; persist whatever the credential holds now
    let credential = ctx.credential.lock().await.clone();
    let session = {
        let mut session = ctx.session.lock().await;
        session.store_credential(&credential);
        session.clone()
    };

    let changed = session.record() != &loaded;
    if !changed && !had_cookie {
        return Ok(response);
    }
    state.sessions.save(&session).await?;

    if let Some(file) = &state.credential_file {
        if credential.is_authorized() && credential != loaded_credential {
            if let Err(e) = file.write(&credential).await {
                warn!("Failed to write credential file {}: {}", file.path().display(), e);
            }
        }
    }

    if !had_cookie {
        let jar = jar.add(session_cookie(session_id));
        return Ok((jar, response).into_response());
    }

    Ok(response)
}
