#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use axum_extra::extract::cookie::Key;
use http_body_util::BodyExt;
use room_warden::components::google_calendar::{
    CalendarApi, EventsQuery, ProviderResponse, QueryWindow, RoomEventQuery,
};
use room_warden::components::oauth::{OAuthClient, TokenEndpoint, TokenGrant, UserCredential};
use room_warden::components::rooms::RoomRegistry;
use room_warden::components::session::InMemorySessionStore;
use room_warden::error::{token_error, GatewayResult};
use room_warden::web::{self, AppState, SESSION_COOKIE};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use url::Url;

/// One recorded events list request
#[derive(Debug, Clone)]
pub struct CalendarCall {
    pub calendar_id: String,
    pub access_token: String,
    pub query: EventsQuery,
}

/// Calendar API double answering from canned responses
#[derive(Debug, Default)]
pub struct MockCalendar {
    responses: Mutex<HashMap<String, ProviderResponse>>,
    calls: Mutex<Vec<CalendarCall>>,
}

impl MockCalendar {
    /// Answer requests for `calendar_id` with `status` and `body`
    pub fn respond(&self, calendar_id: &str, status: u16, body: &str) {
        self.responses.lock().unwrap().insert(
            calendar_id.to_string(),
            ProviderResponse {
                status,
                body: body.to_string(),
            },
        );
    }

    pub fn respond_json(&self, calendar_id: &str, body: serde_json::Value) {
        self.respond(calendar_id, 200, &body.to_string());
    }

    pub fn calls(&self) -> Vec<CalendarCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarApi for MockCalendar {
    async fn list_events(
        &self,
        calendar_id: &str,
        query: &EventsQuery,
        access_token: &str,
    ) -> GatewayResult<ProviderResponse> {
        self.calls.lock().unwrap().push(CalendarCall {
            calendar_id: calendar_id.to_string(),
            access_token: access_token.to_string(),
            query: query.clone(),
        });

        let responses = self.responses.lock().unwrap();
        Ok(responses.get(calendar_id).cloned().unwrap_or(ProviderResponse {
            status: 200,
            body: r#"{"kind": "calendar#events", "items": []}"#.to_string(),
        }))
    }
}

/// Token endpoint double
#[derive(Debug)]
pub struct MockTokens {
    pub fail_exchange: bool,
    /// Lifetime of tokens handed out by the code exchange
    pub expires_in: i64,
    exchanges: Mutex<Vec<String>>,
    refreshes: Mutex<Vec<String>>,
}

impl Default for MockTokens {
    fn default() -> Self {
        Self {
            fail_exchange: false,
            expires_in: 3600,
            exchanges: Mutex::new(Vec::new()),
            refreshes: Mutex::new(Vec::new()),
        }
    }
}

impl MockTokens {
    /// Token endpoint whose code exchange always fails
    pub fn failing() -> Self {
        Self {
            fail_exchange: true,
            ..Self::default()
        }
    }

    /// Token endpoint handing out access tokens that live `expires_in` seconds
    pub fn expiring_in(expires_in: i64) -> Self {
        Self {
            expires_in,
            ..Self::default()
        }
    }

    pub fn exchanges(&self) -> Vec<String> {
        self.exchanges.lock().unwrap().clone()
    }

    pub fn refreshes(&self) -> Vec<String> {
        self.refreshes.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenEndpoint for MockTokens {
    async fn exchange_code(&self, code: &str) -> GatewayResult<TokenGrant> {
        self.exchanges.lock().unwrap().push(code.to_string());
        if self.fail_exchange {
            return Err(token_error("Token endpoint returned HTTP 400 - invalid_grant"));
        }
        Ok(TokenGrant {
            access_token: "access-1".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            expires_in: Some(self.expires_in),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> GatewayResult<TokenGrant> {
        self.refreshes.lock().unwrap().push(refresh_token.to_string());
        Ok(TokenGrant {
            access_token: "access-refreshed".to_string(),
            refresh_token: None,
            expires_in: Some(3600),
        })
    }
}

/// A small registry for tests that hit every room
pub fn test_rooms() -> RoomRegistry {
    RoomRegistry::from_entries([
        ("castle", "castle@resource.calendar.google.com"),
        ("pagu", "pagu@resource.calendar.google.com"),
        ("troll", "troll@resource.calendar.google.com"),
    ])
}

fn test_oauth() -> OAuthClient {
    OAuthClient::new(
        "test-client",
        "test-secret",
        "http://localhost:3000/oauth2callback",
    )
}

/// The router wired to mocks, plus handles to inspect them
pub struct TestApp {
    pub router: Router,
    pub calendar: Arc<MockCalendar>,
    pub tokens: Arc<MockTokens>,
    pub sessions: Arc<InMemorySessionStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(RoomRegistry::builtin(), MockTokens::default())
    }

    pub fn with(rooms: RoomRegistry, tokens: MockTokens) -> Self {
        Self::build(test_oauth(), rooms, tokens, None)
    }

    pub fn with_oauth(oauth: OAuthClient, rooms: RoomRegistry, tokens: MockTokens) -> Self {
        Self::build(oauth, rooms, tokens, None)
    }

    /// App started with a credential file already holding `credential`
    pub fn with_stored_credential(credential: UserCredential) -> Self {
        Self::build(
            test_oauth(),
            RoomRegistry::builtin(),
            MockTokens::default(),
            Some(credential),
        )
    }

    fn build(
        oauth: OAuthClient,
        rooms: RoomRegistry,
        tokens: MockTokens,
        stored_credential: Option<UserCredential>,
    ) -> Self {
        let calendar = Arc::new(MockCalendar::default());
        let tokens = Arc::new(tokens);
        let sessions = Arc::new(InMemorySessionStore::new());

        let query = RoomEventQuery::new(
            calendar.clone(),
            tokens.clone(),
            QueryWindow::room_audit().unwrap(),
        );

        let state = AppState {
            oauth: Arc::new(oauth),
            tokens: tokens.clone(),
            query: Arc::new(query),
            rooms: Arc::new(rooms),
            sessions: sessions.clone(),
            credential_file: None,
            stored_credential: stored_credential.map(Arc::new),
            cookie_key: Key::generate(),
        };

        Self {
            router: web::router(state),
            calendar,
            tokens,
            sessions,
        }
    }

    /// Send a GET request, optionally with a `Cookie` header
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Start the authorization flow and return the session cookie and the
    /// `state` the consent URL carries
    pub async fn begin_authorization(&self) -> (String, String) {
        let response = self.get("/oauth2authorize", None).await;
        assert_eq!(response.status(), StatusCode::FOUND);

        let cookie = session_cookie(&response).expect("authorize should start a session");
        let consent = Url::parse(&location(&response).unwrap()).unwrap();
        let state = consent
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.into_owned())
            .expect("consent URL should carry a state");

        (cookie, state)
    }

    /// Run the whole OAuth flow and return the signed-in session cookie
    pub async fn sign_in(&self) -> String {
        let (cookie, state) = self.begin_authorization().await;

        let response = self
            .get(
                &format!("/oauth2callback?code=test-code&state={}", state),
                Some(&cookie),
            )
            .await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response).as_deref(), Some("/"));

        cookie
    }
}

/// `name=value` of the session cookie set by a response
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&format!("{}=", SESSION_COOKIE)))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
