use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use dribbble_gallery::{create_app, AppState, Config, TokenExchangeResponse};
use tower::ServiceExt;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn get_test_config(base: &str) -> Config {
    let mut config = Config::new("test_client_id", "test_client_secret");
    config.auth_base = base.to_string();
    config.api_base = base.to_string();
    config
}

fn create_test_app(config: &Config) -> Router {
    create_app(AppState::new(config).unwrap())
}

async fn post_token(app: Router, body: &'static str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/token")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, set_cookie, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_exchange_success_returns_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(query_param("client_id", "test_client_id"))
        .and(query_param("client_secret", "test_client_secret"))
        .and(query_param("code", "XYZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "TOK123",
            "token_type": "bearer",
            "scope": "public"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&get_test_config(&mock_server.uri()));
    let (status, set_cookie, body) = post_token(app, r#"{"code": "XYZ"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let response: TokenExchangeResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(
        response,
        TokenExchangeResponse {
            access_token: Some("TOK123".to_string()),
            error: None,
        }
    );

    let set_cookie = set_cookie.expect("token cookie should be set");
    assert!(set_cookie.contains("accessToken=TOK123"));
    assert!(set_cookie.contains("Max-Age=86400"));
    assert!(set_cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_missing_code_is_bad_credentials() {
    let mock_server = MockServer::start().await;

    // No request may reach the provider
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = get_test_config(&mock_server.uri());

    for body in [r#"{}"#, r#"{"code": ""}"#, r#"{"code": null}"#, "", "not json"] {
        let (status, set_cookie, raw) = post_token(create_test_app(&config), body).await;

        assert_eq!(status, StatusCode::OK, "body: {:?}", body);
        assert!(set_cookie.is_none());
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&raw).unwrap(),
            serde_json::json!({"accessToken": null, "error": "Bad credentials."})
        );
    }
}

#[tokio::test]
async fn test_provider_rejection_carried_in_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "The provided authorization grant is invalid"
        })))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&get_test_config(&mock_server.uri()));
    let (status, set_cookie, body) = post_token(app, r#"{"code": "stale"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert!(set_cookie.is_none());

    let response: TokenExchangeResponse = serde_json::from_str(&body).unwrap();
    assert!(response.access_token.is_none());
    let error = response.error.unwrap();
    assert!(error.contains("invalid_grant"), "got: {}", error);
    assert!(!body.contains("test_client_secret"));
}

#[tokio::test]
async fn test_provider_server_error_carried_in_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&get_test_config(&mock_server.uri()));
    let (status, _, body) = post_token(app, r#"{"code": "XYZ"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let response: TokenExchangeResponse = serde_json::from_str(&body).unwrap();
    assert!(response.access_token.is_none());
    assert!(response.error.unwrap().contains("503"));
}

#[tokio::test]
async fn test_network_failure_carried_in_payload() {
    // Nothing listens on port 1
    let app = create_test_app(&get_test_config("http://127.0.0.1:1"));
    let (status, _, body) = post_token(app, r#"{"code": "XYZ"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let response: TokenExchangeResponse = serde_json::from_str(&body).unwrap();
    assert!(response.access_token.is_none());
    assert!(response.error.unwrap().starts_with("HTTP error"));
}

#[tokio::test]
async fn test_get_not_allowed() {
    let app = create_test_app(&get_test_config("http://127.0.0.1:1"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
