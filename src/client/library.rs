//! Lexora API client implementation
//!
//! Every request goes through [`LibraryClient::send`], which attaches the
//! current bearer credential (except on the `/auth` endpoints) and maps
//! non-success statuses to [`ApiError`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api::{AuthApi, BookApi};
use super::models::{
    Book, CreateBookRequest, JwtResponse, MessageResponse, SigninRequest, SignupRequest,
    UpdateBookRequest,
};
use super::pagination::{Page, PageRequest};
use super::CredentialSource;
use crate::error::{ApiError, Result};

/// Request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether a request carries the session's bearer credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Bearer,
    /// Sign-in and sign-up never present the current session
    Anonymous,
}

/// Callback run when a request that carried a credential is rejected with 401.
///
/// What to do about it (sign out, prompt again) is up to the caller.
pub type UnauthorizedHook = Arc<dyn Fn(&ApiError) + Send + Sync>;

/// Lexora API client
pub struct LibraryClient {
    http: HttpClient,
    base_url: String,
    credentials: Option<Arc<dyn CredentialSource>>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl LibraryClient {
    /// Create a client for an API base URL such as `http://localhost:8080/api/v1`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: None,
            on_unauthorized: None,
        })
    }

    /// Read the bearer credential from `source` before every request
    pub fn with_credentials(mut self, source: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(source);
        self
    }

    /// Register the 401 remediation hook
    pub fn on_unauthorized(mut self, hook: UnauthorizedHook) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request and return the response if its status is a success
    async fn send<B: Serialize + ?Sized + Sync>(
        &self,
        access: Access,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);

        if !query.is_empty() {
            request = request.query(query);
        }

        let token = match access {
            Access::Bearer => self
                .credentials
                .as_ref()
                .and_then(|source| source.bearer_token()),
            Access::Anonymous => None,
        };
        let authenticated = token.is_some();
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(
            "{} {} ({})",
            method,
            url,
            if authenticated { "authenticated" } else { "anonymous" }
        );

        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = error_for_status(status, &body);
        debug!("{} {} failed with {}: {}", method, url, status, err);

        if status == StatusCode::UNAUTHORIZED {
            warn!("Unauthorized (401) response from {} {}", method, url);
            if authenticated {
                if let Some(ref hook) = self.on_unauthorized {
                    hook(&err);
                }
            }
        }

        Err(err.into())
    }

    /// Issue a request and decode the JSON response body
    async fn request_json<T, B>(
        &self,
        access: Access,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let response = self.send(access, method, path, query, body).await?;
        let data = response.json::<T>().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;
        Ok(data)
    }
}

/// Map a failed response to an error, keeping the server's message if any
fn error_for_status(status: StatusCode, body: &str) -> ApiError {
    let message = server_message(body);

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
        StatusCode::FORBIDDEN => ApiError::Forbidden(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ApiError::BadRequest(message),
        StatusCode::CONFLICT => ApiError::Conflict(message),
        status if status.is_server_error() => ApiError::ServerError(message),
        _ => ApiError::InvalidResponse(format!("Unexpected status code: {}", status)),
    }
}

/// Extract a human-readable message from an error body.
///
/// JSON bodies contribute their `message` field; short plain-text bodies are
/// used as-is; anything else (HTML pages, empty bodies) yields `None`.
fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string),
        Err(_) if !body.starts_with('<') && body.len() <= 500 => Some(body.to_string()),
        Err(_) => None,
    }
}

#[async_trait]
impl AuthApi for LibraryClient {
    async fn sign_in(&self, request: &SigninRequest) -> Result<JwtResponse> {
        self.request_json(Access::Anonymous, Method::POST, "/auth/signin", &[], Some(request))
            .await
    }

    async fn sign_up(&self, request: &SignupRequest) -> Result<MessageResponse> {
        self.request_json(Access::Anonymous, Method::POST, "/auth/signup", &[], Some(request))
            .await
    }
}

#[async_trait]
impl BookApi for LibraryClient {
    async fn list_books(&self, request: &PageRequest) -> Result<Page<Book>> {
        self.request_json::<_, ()>(Access::Bearer, Method::GET, "/books", &request.to_query_params(), None)
            .await
    }

    async fn get_book(&self, id: i64) -> Result<Book> {
        let path = format!("/books/{}", id);
        self.request_json::<_, ()>(Access::Bearer, Method::GET, &path, &[], None)
            .await
    }

    async fn create_book(&self, request: &CreateBookRequest) -> Result<Book> {
        self.request_json(Access::Bearer, Method::POST, "/books", &[], Some(request))
            .await
    }

    async fn update_book(&self, id: i64, request: &UpdateBookRequest) -> Result<Book> {
        let path = format!("/books/{}", id);
        self.request_json(Access::Bearer, Method::PUT, &path, &[], Some(request))
            .await
    }

    async fn delete_book(&self, id: i64) -> Result<()> {
        let path = format!("/books/{}", id);
        self.send::<()>(Access::Bearer, Method::DELETE, &path, &[], None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = LibraryClient::new("http://localhost:8080/api/v1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api/v1");
    }

    #[test]
    fn test_server_message_from_json() {
        let body = r#"{"timestamp":"2024-01-01T00:00:00","status":409,"error":"Conflict","message":"Book with ISBN 123 already exists","path":"/api/v1/books"}"#;
        assert_eq!(
            server_message(body).as_deref(),
            Some("Book with ISBN 123 already exists")
        );
    }

    #[test]
    fn test_server_message_json_without_message() {
        assert_eq!(server_message(r#"{"error":"Forbidden"}"#), None);
        assert_eq!(server_message(r#"{"message":"  "}"#), None);
    }

    #[test]
    fn test_server_message_plain_text_and_html() {
        assert_eq!(server_message("Bad credentials").as_deref(), Some("Bad credentials"));
        assert_eq!(server_message("<html><body>502</body></html>"), None);
        assert_eq!(server_message("   "), None);
    }

    #[test]
    fn test_error_for_status_mapping() {
        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized(None)
        ));
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN, r#"{"message":"nope"}"#),
            ApiError::Forbidden(Some(ref m)) if m == "nope"
        ));
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(None)
        ));
        assert!(matches!(
            error_for_status(StatusCode::CONFLICT, r#"{"message":"dup"}"#),
            ApiError::Conflict(Some(ref m)) if m == "dup"
        ));
        assert!(matches!(
            error_for_status(StatusCode::INTERNAL_SERVER_ERROR, ""),
            ApiError::ServerError(None)
        ));
        assert!(matches!(
            error_for_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::InvalidResponse(_)
        ));
    }

    // HTTP round trips against a local mock server

    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedToken(Option<&'static str>);

    impl CredentialSource for FixedToken {
        fn bearer_token(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn client_for(server: &mockito::ServerGuard, token: Option<&'static str>) -> LibraryClient {
        LibraryClient::new(format!("{}/api/v1", server.url()))
            .unwrap()
            .with_credentials(Arc::new(FixedToken(token)))
    }

    #[tokio::test]
    async fn test_bearer_header_is_attached() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/books/1")
            .match_header("authorization", "Bearer tok-123")
            .with_status(200)
            .with_body(
                r#"{"id":1,"title":"Dune","author":"Frank Herbert","isbn":"9780441013593","publishedDate":"1965-08-01"}"#,
            )
            .create_async()
            .await;

        let book = client_for(&server, Some("tok-123")).get_book(1).await.unwrap();
        assert_eq!(book.title, "Dune");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_anonymous_request_has_no_authorization_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/books")
            .match_header("authorization", mockito::Matcher::Missing)
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("page".into(), "1".into()),
                mockito::Matcher::UrlEncoded("size".into(), "5".into()),
                mockito::Matcher::UrlEncoded("sort".into(), "title,asc".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"content":[],"number":1,"size":5,"totalPages":1,"totalElements":5,"first":false,"last":true,"numberOfElements":0,"empty":true}"#,
            )
            .create_async()
            .await;

        let page = client_for(&server, None)
            .list_books(&PageRequest::new(1, 5).sort("title,asc"))
            .await
            .unwrap();
        assert!(page.empty);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_runs_hook_for_credentialed_requests() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/api/v1/books/9")
            .with_status(401)
            .with_body(r#"{"message":"Full authentication is required"}"#)
            .create_async()
            .await;

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let client = client_for(&server, Some("stale")).on_unauthorized(Arc::new(move |_: &ApiError| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        let err = client.delete_book(9).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Api(ApiError::Unauthorized(Some(_)))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_sign_in_skips_hook() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/auth/signin")
            .with_status(401)
            .with_body(r#"{"message":"Bad credentials"}"#)
            .create_async()
            .await;

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let client = client_for(&server, None).on_unauthorized(Arc::new(move |_: &ApiError| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        let err = client
            .sign_in(&SigninRequest {
                username: "alice".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.user_message("Login failed. Please try again."), "Bad credentials");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_sign_in_keeps_existing_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/auth/signin")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(401)
            .with_body(r#"{"message":"Bad credentials"}"#)
            .create_async()
            .await;

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let client = client_for(&server, Some("existing-session")).on_unauthorized(Arc::new(
            move |_: &ApiError| {
                seen.fetch_add(1, Ordering::SeqCst);
            },
        ));

        let err = client
            .sign_in(&SigninRequest {
                username: "bob".to_string(),
                password: "typo".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            crate::error::Error::Api(ApiError::Unauthorized(Some(_)))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_sign_up_is_sent_without_credentials() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/auth/signup")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"message":"User registered successfully!"}"#)
            .create_async()
            .await;

        let response = client_for(&server, Some("existing-session"))
            .sign_up(&SignupRequest {
                username: "carol".to_string(),
                email: "carol@example.com".to_string(),
                password: "secret1".to_string(),
                registration_code: None,
            })
            .await
            .unwrap();

        assert_eq!(response.message, "User registered successfully!");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_sends_only_changed_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/v1/books/4")
            .match_body(mockito::Matcher::JsonString(r#"{"title":"Renamed"}"#.to_string()))
            .with_status(200)
            .with_body(
                r#"{"id":4,"title":"Renamed","author":"A","isbn":"1234567890","publishedDate":"2000-01-01"}"#,
            )
            .create_async()
            .await;

        let update = UpdateBookRequest {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let book = client_for(&server, Some("t")).update_book(4, &update).await.unwrap();
        assert_eq!(book.title, "Renamed");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/api/v1/books/2")
            .with_status(204)
            .create_async()
            .await;

        client_for(&server, Some("t")).delete_book(2).await.unwrap();
    }

    #[tokio::test]
    async fn test_server_error_carries_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/books")
            .with_status(400)
            .with_body(r#"{"message":"ISBN must be valid"}"#)
            .create_async()
            .await;

        let err = client_for(&server, Some("t"))
            .create_book(&CreateBookRequest {
                title: "T".to_string(),
                author: "A".to_string(),
                isbn: "1".to_string(),
                published_date: "2000-01-01".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            crate::error::Error::Api(ApiError::BadRequest(Some(ref m))) if m == "ISBN must be valid"
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/books/3")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&server, None).get_book(3).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Api(ApiError::InvalidResponse(_))
        ));
    }
}
