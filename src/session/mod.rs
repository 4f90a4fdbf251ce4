//! Session client for the catalogue backend
//!
//! Fetches the signed-in user, performs session-guarded requests and logs
//! out. Instead of redirecting, it hands back `Navigation` intents and
//! publishes `AuthEvent`s for whoever needs to react.

pub mod guard;

pub use guard::{AuthGuard, GuardOutcome};

use crate::config::Config;
use crate::constants::api::{CURRENT_USER_PATH, LOGOUT_PATH};
use crate::constants::routes::{FORBIDDEN, SIGN_IN};
use crate::error::{Error, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Where the caller should send the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    SignIn,
    Forbidden,
}

impl Navigation {
    pub fn path(&self) -> &'static str {
        match self {
            Navigation::SignIn => SIGN_IN,
            Navigation::Forbidden => FORBIDDEN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Visitor,
    Curator,
    Professor,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Restricted,
}

/// The signed-in user as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Fields a profile edit may change
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub profile_picture: Option<String>,
    pub avatar: Option<String>,
}

/// Outcome of asking the backend who is signed in
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Authenticated(SessionUser),
    /// Not signed in; carries where to go next
    Unauthenticated(Navigation),
}

impl SessionState {
    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Unauthenticated(_) => None,
        }
    }
}

/// Session changes broadcast to interested parties
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    LoggedIn(SessionUser),
    LoggedOut,
    /// A guarded call came back 401
    SessionExpired,
}

const EVENT_CAPACITY: usize = 16;

pub struct SessionClient {
    client: reqwest::Client,
    base_url: String,
    user: RwLock<Option<SessionUser>>,
    events: broadcast::Sender<AuthEvent>,
}

impl SessionClient {
    /// Client for the backend at `base_url`; cookies persist across calls
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user: RwLock::new(None),
            events,
        })
    }

    /// Client for the backend named in `[session]`
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.session.backend_url)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Cached user from the last successful fetch or login
    pub fn user(&self) -> Option<SessionUser> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    fn set_user(&self, user: Option<SessionUser>) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user;
    }

    fn publish(&self, event: AuthEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Ask the backend who is signed in, updating the cached user
    pub async fn current_user(&self) -> SessionState {
        let response = match self.client.get(self.url(CURRENT_USER_PATH)).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Session lookup failed: {}", e);
                self.set_user(None);
                return SessionState::Unauthenticated(Navigation::SignIn);
            }
        };

        match response.status() {
            status if status.is_success() => match response.json::<SessionUser>().await {
                Ok(user) => {
                    debug!("Signed in as {}", user.username);
                    self.set_user(Some(user.clone()));
                    SessionState::Authenticated(user)
                }
                Err(e) => {
                    warn!("Failed to parse session user: {}", e);
                    self.set_user(None);
                    SessionState::Unauthenticated(Navigation::SignIn)
                }
            },
            StatusCode::FORBIDDEN => {
                self.set_user(None);
                SessionState::Unauthenticated(Navigation::Forbidden)
            }
            status => {
                debug!("No session (status {})", status);
                self.set_user(None);
                SessionState::Unauthenticated(Navigation::SignIn)
            }
        }
    }

    /// Request builder for `path` on the backend, sharing the session cookies
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Send a request built with `request`, turning 401/403 into redirect errors
    ///
    /// A 401 also drops the cached user and publishes `SessionExpired`.
    pub async fn guarded_send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await?;
        self.check_session(response)
    }

    /// GET `path` through `guarded_send`
    pub async fn guarded_get(&self, path: &str) -> Result<reqwest::Response> {
        self.guarded_send(self.request(reqwest::Method::GET, path)).await
    }

    fn check_session(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        match response.status() {
            StatusCode::UNAUTHORIZED => {
                info!("Session expired");
                self.set_user(None);
                self.publish(AuthEvent::SessionExpired);
                Err(Error::AuthRedirect(Navigation::SignIn))
            }
            StatusCode::FORBIDDEN => Err(Error::AuthRedirect(Navigation::Forbidden)),
            _ => Ok(response),
        }
    }

    /// Adopt `user`, or refetch the current user when None
    pub async fn login(&self, user: Option<SessionUser>) -> Result<SessionUser> {
        let user = match user {
            Some(user) => {
                self.set_user(Some(user.clone()));
                user
            }
            None => match self.current_user().await {
                SessionState::Authenticated(user) => user,
                SessionState::Unauthenticated(nav) => return Err(Error::AuthRedirect(nav)),
            },
        };

        self.publish(AuthEvent::LoggedIn(user.clone()));
        Ok(user)
    }

    /// End the session; the local user is dropped even if the call fails
    pub async fn logout(&self) -> Result<()> {
        let result = self
            .client
            .post(self.url(LOGOUT_PATH))
            .send()
            .await
            .and_then(|r| r.error_for_status());

        self.set_user(None);
        self.publish(AuthEvent::LoggedOut);

        result.map(|_| ()).map_err(|e| {
            warn!("Logout request failed: {}", e);
            Error::Session(format!("Logout failed: {}", e))
        })
    }

    /// Merge a profile edit into the cached user; None when signed out
    pub fn update_profile(&self, update: ProfileUpdate) -> Option<SessionUser> {
        let mut guard = self.user.write().unwrap_or_else(PoisonError::into_inner);
        let user = guard.as_mut()?;

        if let Some(username) = update.username {
            user.username = username;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(picture) = update.profile_picture {
            user.profile_picture = Some(picture);
        }
        if let Some(avatar) = update.avatar {
            user.avatar = Some(avatar);
        }
        Some(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_server;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    fn curator_json() -> serde_json::Value {
        json!({
            "userId": 7,
            "username": "hana",
            "email": "hana@example.org",
            "role": "curator",
            "status": "ACTIVE"
        })
    }

    async fn client_for(app: Router) -> SessionClient {
        SessionClient::new(&spawn_server(app).await).unwrap()
    }

    #[test]
    fn test_navigation_paths() {
        assert_eq!(Navigation::SignIn.path(), "/signin");
        assert_eq!(Navigation::Forbidden.path(), "/403");
    }

    #[test]
    fn test_from_config_trims_base_url() {
        let mut config = Config::default();
        config.session.backend_url = "http://catalogue.test/".to_string();
        let client = SessionClient::from_config(&config).unwrap();
        assert_eq!(client.url(CURRENT_USER_PATH), "http://catalogue.test/api/users/me");
    }

    #[test]
    fn test_user_json() {
        let user: SessionUser = serde_json::from_value(curator_json()).unwrap();
        assert_eq!(user.user_id, 7);
        assert_eq!(user.role, Role::Curator);
        assert_eq!(user.status, AccountStatus::Active);
        assert!(user.avatar.is_none());
    }

    #[tokio::test]
    async fn test_current_user_authenticated() {
        let client = client_for(
            Router::new().route("/api/users/me", get(|| async { Json(curator_json()) })),
        )
        .await;

        let state = client.current_user().await;
        assert_eq!(state.user().map(|u| u.username.as_str()), Some("hana"));
        assert!(client.is_authenticated());
    }

    #[tokio::test]
    async fn test_401_signs_out_without_stale_user() {
        let client = client_for(
            Router::new().route("/api/users/me", get(|| async { AxumStatus::UNAUTHORIZED })),
        )
        .await;
        client.login(Some(serde_json::from_value(curator_json()).unwrap())).await.unwrap();

        let state = client.current_user().await;
        assert_eq!(state, SessionState::Unauthenticated(Navigation::SignIn));
        assert!(client.user().is_none());
    }

    #[tokio::test]
    async fn test_403_points_to_forbidden() {
        let client = client_for(
            Router::new().route("/api/users/me", get(|| async { AxumStatus::FORBIDDEN })),
        )
        .await;
        assert_eq!(
            client.current_user().await,
            SessionState::Unauthenticated(Navigation::Forbidden)
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unauthenticated() {
        let client = SessionClient::new("http://127.0.0.1:1").unwrap();
        assert_eq!(
            client.current_user().await,
            SessionState::Unauthenticated(Navigation::SignIn)
        );
    }

    #[tokio::test]
    async fn test_guarded_get_expired_session() {
        let client = client_for(
            Router::new()
                .route("/api/users/me", get(|| async { Json(curator_json()) }))
                .route("/api/categories", get(|| async { AxumStatus::UNAUTHORIZED })),
        )
        .await;
        client.current_user().await;
        let mut events = client.subscribe();

        let err = client.guarded_get("/api/categories").await.unwrap_err();
        assert!(matches!(err, Error::AuthRedirect(Navigation::SignIn)));
        assert!(client.user().is_none());
        assert_eq!(events.recv().await.unwrap(), AuthEvent::SessionExpired);
    }

    #[tokio::test]
    async fn test_guarded_post_expired_session() {
        let client = client_for(
            Router::new()
                .route("/api/users/me", get(|| async { Json(curator_json()) }))
                .route("/api/categories", post(|| async { AxumStatus::UNAUTHORIZED })),
        )
        .await;
        client.current_user().await;
        let mut events = client.subscribe();

        let request = client
            .request(reqwest::Method::POST, "/api/categories")
            .json(&json!({ "name": "Ceramics" }));
        let err = client.guarded_send(request).await.unwrap_err();

        assert!(matches!(err, Error::AuthRedirect(Navigation::SignIn)));
        assert!(!client.is_authenticated());
        assert_eq!(events.recv().await.unwrap(), AuthEvent::SessionExpired);
    }

    #[tokio::test]
    async fn test_guarded_delete_forbidden() {
        let client = client_for(
            Router::new().route("/api/categories/3", axum::routing::delete(|| async { AxumStatus::FORBIDDEN })),
        )
        .await;

        let err = client
            .guarded_send(client.request(reqwest::Method::DELETE, "/api/categories/3"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AuthRedirect(Navigation::Forbidden)));
    }

    #[tokio::test]
    async fn test_guarded_get_forbidden_and_ok() {
        let client = client_for(
            Router::new()
                .route("/api/admin", get(|| async { AxumStatus::FORBIDDEN }))
                .route("/api/public", get(|| async { "ok" })),
        )
        .await;

        let err = client.guarded_get("/api/admin").await.unwrap_err();
        assert!(matches!(err, Error::AuthRedirect(Navigation::Forbidden)));

        let body = client.guarded_get("/api/public").await.unwrap().text().await.unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_logout_clears_even_on_failure() {
        let client = client_for(
            Router::new().route("/api/logout", post(|| async { AxumStatus::INTERNAL_SERVER_ERROR })),
        )
        .await;
        client.login(Some(serde_json::from_value(curator_json()).unwrap())).await.unwrap();
        let mut events = client.subscribe();

        assert!(client.logout().await.is_err());
        assert!(!client.is_authenticated());
        assert_eq!(events.recv().await.unwrap(), AuthEvent::LoggedOut);
    }

    #[tokio::test]
    async fn test_login_refetches_user() {
        let client = client_for(
            Router::new().route("/api/users/me", get(|| async { Json(curator_json()) })),
        )
        .await;
        let mut events = client.subscribe();

        let user = client.login(None).await.unwrap();
        assert_eq!(user.user_id, 7);
        assert!(matches!(events.recv().await.unwrap(), AuthEvent::LoggedIn(_)));
    }

    #[tokio::test]
    async fn test_update_profile() {
        let client = SessionClient::new("http://127.0.0.1:1").unwrap();
        assert!(client
            .update_profile(ProfileUpdate {
                username: Some("x".to_string()),
                ..ProfileUpdate::default()
            })
            .is_none());

        client.login(Some(serde_json::from_value(curator_json()).unwrap())).await.unwrap();
        let updated = client
            .update_profile(ProfileUpdate {
                email: Some("hana@museum.jp".to_string()),
                ..ProfileUpdate::default()
            })
            .unwrap();
        assert_eq!(updated.email, "hana@museum.jp");
        assert_eq!(updated.username, "hana");
    }
}
