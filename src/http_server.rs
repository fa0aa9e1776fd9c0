use crate::auth::{exchange_token, TokenCookie, TokenExchangeResponse, TokenRequest};
use crate::config::Config;
use crate::dribbble::{DribbbleClient, DribbbleError, Shot};
use crate::gallery::{CallbackOutcome, SessionController};
use crate::pages;
use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Upper bound on `?page=` so one request cannot fan out into unbounded fetches
pub const MAX_PAGE: u32 = 50;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    client: DribbbleClient,
    cookies: TokenCookie,
    per_page: u32,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, DribbbleError> {
        Ok(Self {
            client: DribbbleClient::new(config)?,
            cookies: TokenCookie::new(config.cookie_key.as_ref(), config.cookie_secure),
            per_page: config.per_page,
        })
    }

    fn resume(&self, jar: &CookieJar) -> SessionController {
        SessionController::resume(jar, self.client.clone(), self.cookies.clone(), self.per_page)
    }

    async fn load(&self, jar: &CookieJar) -> SessionController {
        SessionController::load(jar, self.client.clone(), self.cookies.clone(), self.per_page).await
    }
}

/// Query parameters accepted by the gallery page.
///
/// Parsed leniently: unknown keys are ignored and the first occurrence of a
/// repeated key wins, so an odd query string still renders a view.
#[derive(Debug, Default, PartialEq)]
pub struct IndexParams {
    /// Authorization code on the redirect back from Dribbble
    code: Option<String>,

    /// Set by Dribbble when the user declines access
    error: Option<String>,

    /// Number of pages to show
    page: Option<String>,
}

impl IndexParams {
    fn from_query(query: Option<&str>) -> Self {
        Self {
            code: query_value(query, "code"),
            error: query_value(query, "error"),
            page: query_value(query, "page"),
        }
    }
}

/// One page of shots for script-driven appends
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotsResponse {
    items: Vec<Shot>,
    page: u32,
    per_page: u32,
    has_next_page: Option<bool>,
    error: Option<String>,
}

/// GET / - gallery, integrate button, or OAuth redirect-back handling
async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> Response {
    let params = IndexParams::from_query(query.as_deref());

    if let Some(code) = params.code.as_deref().filter(|c| !c.is_empty()) {
        let mut controller = state.resume(&jar);
        let (jar, outcome) = controller.handle_callback(jar, code).await;

        match outcome {
            CallbackOutcome::Authorized => info!("OAuth callback completed"),
            CallbackOutcome::AlreadyAuthorized => info!("Stripping stale authorization code"),
            CallbackOutcome::Failed(reason) => warn!(reason = %reason, "OAuth callback failed"),
        }

        // Redirecting drops the code from the address bar
        return (jar, found("/")).into_response();
    }

    if let Some(denied) = params.error.as_deref() {
        warn!(error = %denied, "Dribbble authorization was not granted");
    }

    let mut controller = state.load(&jar).await;

    let target = params
        .page
        .as_deref()
        .and_then(|p| p.trim().parse::<u32>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_PAGE);
    if target > 1 {
        controller.load_through(&jar, target).await;
    }

    Html(pages::render(controller.state())).into_response()
}

/// GET /authorize - send the browser to Dribbble's consent screen
async fn authorize(State(state): State<AppState>, jar: CookieJar) -> Response {
    match state.resume(&jar).authorize_url() {
        Ok(url) => {
            info!("Redirecting to Dribbble authorization");
            found(url.as_str())
        }
        Err(e) => {
            error!(error = %e, "Failed to build authorization URL");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build authorization URL").into_response()
        }
    }
}

/// POST /api/token - exchange `{code}` for `{accessToken, error}`, always 200
async fn token(State(state): State<AppState>, jar: CookieJar, body: Bytes) -> Response {
    let request = TokenRequest::from_body(&body);
    let result = exchange_token(&state.client, request.code.as_deref()).await;
    let response = TokenExchangeResponse::from_result(&result);

    let jar = match &result {
        Ok(token) => match state.cookies.store(jar.clone(), token) {
            Ok(jar) => jar,
            Err(e) => {
                warn!(error = %e, "Could not write token cookie");
                jar
            }
        },
        Err(_) => jar,
    };

    (StatusCode::OK, jar, Json(response)).into_response()
}

/// GET /api/shots?page=N - a single page of shots, always 200.
///
/// The page size is always the configured one, so pages fetched by a script
/// line up with the ones already rendered.
async fn shots(
    State(state): State<AppState>,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> Json<ShotsResponse> {
    let page = parse_positive(query_value(query.as_deref(), "page").as_deref()).unwrap_or(1);
    let per_page = state.per_page;

    let mut response = ShotsResponse {
        items: Vec::new(),
        page,
        per_page,
        has_next_page: None,
        error: None,
    };

    let Some(token) = state.cookies.read(&jar) else {
        response.error = Some("Not authorized".to_string());
        return Json(response);
    };

    match state.client.list_shots(&token, page, per_page).await {
        Ok(result) => {
            response.items = result.shots;
            response.has_next_page = Some(result.has_next_page);
        }
        Err(e) => {
            warn!(page, error = %e, "Fetching shots failed");
            response.error = Some(e.to_string());
        }
    }

    Json(response)
}

/// POST /account/remove - drop the token cookie and go back to a clean `/`
async fn remove_account(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let mut controller = state.resume(&jar);
    let jar = controller.remove_account(jar);
    (jar, Redirect::to("/"))
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// First value of `key` in a raw query string
fn query_value(query: Option<&str>, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn parse_positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
}

/// Create and configure the HTTP application
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/authorize", get(authorize))
        .route("/api/token", post(token))
        .route("/api/shots", get(shots))
        .route("/account/remove", post(remove_account))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_app(AppState::new(config)?);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Gallery listening on {}", addr);
    info!("OAuth callback URL: http://localhost:{}/", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}
