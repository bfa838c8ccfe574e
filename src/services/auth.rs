//! Optional account layer backed by the Supabase GoTrue REST API.
//!
//! Nothing in script or audio generation depends on this module; the
//! interactive binary uses it to greet a signed-in user.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::{LazyLock, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use url::Url;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 2;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: u64,
    pub user: User,
}

/// What the rest of the app shows for a signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

impl UserProfile {
    /// Display name is the `full_name` metadata, else the email local
    /// part, else `"User"`.
    pub fn from_user(user: &User) -> Self {
        let email = user.email.clone().unwrap_or_default();
        let name = user
            .user_metadata
            .get("full_name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or_else(|| {
                email
                    .split('@')
                    .next()
                    .filter(|local| !local.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "User".to_string());
        Self { name, email }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(UserProfile),
    SignedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// The project auto-confirms accounts; the user is signed in.
    SignedIn(Session),
    /// A confirmation email was sent; sign in after following it.
    ConfirmationRequired(User),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password. Please check your credentials and try again.")]
    InvalidCredentials,
    #[error("Please check your email and click the confirmation link before signing in.")]
    EmailNotConfirmed,
    #[error("Too many login attempts. Please wait a few minutes before trying again.")]
    TooManyRequests,
    #[error("An account with this email already exists. Please sign in instead.")]
    AlreadyRegistered,
    #[error("Password must be at least 6 characters long")]
    WeakPassword,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Name must be at least 2 characters long")]
    NameTooShort,
    #[error("{0}")]
    Service(String),
}

impl AuthError {
    fn from_service(status: u16, message: &str) -> Self {
        if message.contains("Invalid login credentials") {
            AuthError::InvalidCredentials
        } else if message.contains("Email not confirmed") {
            AuthError::EmailNotConfirmed
        } else if status == 429 || message.contains("Too many requests") {
            AuthError::TooManyRequests
        } else if message.contains("User already registered") {
            AuthError::AlreadyRegistered
        } else if message.contains("Password should be at least") {
            AuthError::WeakPassword
        } else if message.contains("Invalid email") {
            AuthError::InvalidEmail
        } else if message.is_empty() {
            AuthError::Service(format!("Authentication failed ({})", status))
        } else {
            AuthError::Service(message.to_string())
        }
    }
}

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

pub fn validate_registration(name: &str, email: &str, password: &str) -> Result<(), AuthError> {
    if name.trim().chars().count() < MIN_NAME_LEN {
        return Err(AuthError::NameTooShort);
    }
    if !is_valid_email(email.trim()) {
        return Err(AuthError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<SignUpOutcome>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;
    async fn sign_out(&self) -> Result<()>;
    fn current_session(&self) -> Option<Session>;
    /// Session changes, starting from the current state.
    fn subscribe(&self) -> watch::Receiver<AuthEvent>;
}

pub struct SupabaseAuthClient {
    base: Url,
    anon_key: String,
    client: reqwest::Client,
    session: Mutex<Option<Session>>,
    events: watch::Sender<AuthEvent>,
}

impl SupabaseAuthClient {
    pub fn new(config: &SupabaseConfig, timeout_seconds: u64) -> Result<Self> {
        let base = Url::parse(&format!("{}/auth/v1/", config.url.trim_end_matches('/')))
            .with_context(|| format!("Invalid Supabase URL: {}", config.url))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;
        let (events, _) = watch::channel(AuthEvent::SignedOut);
        Ok(Self {
            base,
            anon_key: config.anon_key.clone(),
            client,
            session: Mutex::new(None),
            events,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("Invalid auth endpoint: {}", path))
    }

    async fn post(&self, url: Url, body: Value, bearer: Option<&str>) -> Result<Value> {
        let mut req = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&body);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(AuthError::from_service(status.as_u16(), &error_message(&text)).into());
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).context("Failed to parse auth response")
    }

    fn store_session(&self, session: Option<Session>) {
        let event = match &session {
            Some(s) => AuthEvent::SignedIn(UserProfile::from_user(&s.user)),
            None => AuthEvent::SignedOut,
        };
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = session;
        self.events.send_replace(event);
    }
}

/// GoTrue reports errors under one of several keys depending on endpoint.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

fn parse_sign_up(value: Value) -> Result<SignUpOutcome> {
    if value.get("access_token").is_some() {
        let session: Session = serde_json::from_value(value).context("Malformed session")?;
        return Ok(SignUpOutcome::SignedIn(session));
    }
    let user = match value.get("user") {
        Some(user) => user.clone(),
        None => value,
    };
    let user: User = serde_json::from_value(user).context("Malformed user")?;
    Ok(SignUpOutcome::ConfirmationRequired(user))
}

#[async_trait]
impl AuthClient for SupabaseAuthClient {
    async fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<SignUpOutcome> {
        validate_registration(display_name, email, password)?;
        let body = json!({
            "email": email.trim(),
            "password": password,
            "data": { "full_name": display_name.trim() },
        });
        let outcome = parse_sign_up(self.post(self.endpoint("signup")?, body, None).await?)?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            info!("Account created and signed in: {}", session.user.id);
            self.store_session(Some(session.clone()));
        } else {
            info!("Account created; email confirmation pending");
        }
        Ok(outcome)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        if !is_valid_email(email.trim()) {
            return Err(AuthError::InvalidEmail.into());
        }
        let mut url = self.endpoint("token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let body = json!({ "email": email.trim(), "password": password });

        let session: Session =
            serde_json::from_value(self.post(url, body, None).await?).context("Malformed session")?;
        info!("Signed in as {}", session.user.id);
        self.store_session(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        if let Some(session) = self.current_session() {
            let url = self.endpoint("logout")?;
            if let Err(e) = self.post(url, json!({}), Some(&session.access_token)).await {
                warn!("Remote sign-out failed, clearing local session anyway: {:#}", e);
            }
        }
        self.store_session(None);
        Ok(())
    }

    fn current_session(&self) -> Option<Session> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn subscribe(&self) -> watch::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
