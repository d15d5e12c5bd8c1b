//! REST client for the Paper API.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{api_error, ClientError};
use crate::models::{LoginResponse, NewNote, Note, NoteQuery, NoteUpdate, SessionUser, Tag, TagName};
use crate::session::ClientSession;
use crate::store::TokenStore;

/// HTTP client for one Paper server, with its own session.
pub struct PaperClient {
    client: reqwest::Client,
    base_url: String,
    session: ClientSession,
    store: Box<dyn TokenStore>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct TagRename<'a> {
    name: &'a str,
}

impl PaperClient {
    /// Create a client for the server at `base_url`, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>, store: impl TokenStore + 'static) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, store)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        store: impl TokenStore + 'static,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            session: ClientSession::new(),
            store: Box::new(store),
        }
    }

    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    /// Create an account. Does not sign in.
    pub async fn register(&self, username: &str, password: &str) -> Result<SessionUser, ClientError> {
        let response = self
            .request(Method::POST, "/auth/register")
            .json(&Credentials { username, password })
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Sign in, persist the token and publish the user to subscribers.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionUser, ClientError> {
        let response = self
            .request(Method::POST, "/auth/login")
            .json(&Credentials { username, password })
            .send()
            .await?;
        let login: LoginResponse = Self::parse_response(response).await?;

        self.store.save(&login.token)?;
        let user = SessionUser {
            id: login.id,
            username: login.username,
        };
        self.session.establish(login.token, user.clone());
        tracing::debug!(user_id = user.id, "Signed in");
        Ok(user)
    }

    /// Ask the server who `token` belongs to. A rejected token is `Ok(None)`.
    pub async fn validate_token(&self, token: &str) -> Result<Option<SessionUser>, ClientError> {
        let response = self
            .client
            .get(self.url("/auth/validate"))
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        Ok(Some(Self::parse_response(response).await?))
    }

    /// Resume a session from the token store.
    ///
    /// The stored token is re-validated. When the server rejects it, or
    /// cannot be reached, the token is discarded and the client stays
    /// signed out.
    pub async fn restore(&self) -> Result<Option<SessionUser>, ClientError> {
        let Some(token) = self.store.load()? else {
            return Ok(None);
        };

        match self.validate_token(&token).await {
            Ok(Some(user)) => {
                self.session.establish(token, user.clone());
                tracing::debug!(user_id = user.id, "Session restored");
                Ok(Some(user))
            }
            Ok(None) => {
                tracing::debug!("Stored token rejected, clearing");
                self.clear_session()?;
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not validate stored token, clearing");
                self.clear_session()?;
                Ok(None)
            }
        }
    }

    /// Sign out. Local state is cleared even when the server call fails.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if self.session.token().is_some() {
            let result = self.request(Method::POST, "/auth/logout").send().await;
            match result.map_err(ClientError::from) {
                Ok(response) => {
                    if let Err(e) = Self::check_status(response).await {
                        tracing::warn!(error = %e, "Server logout failed");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Server logout failed"),
            }
        }
        self.clear_session()
    }

    // -----------------------------------------------------------------------
    // Notes
    // -----------------------------------------------------------------------

    pub async fn list_notes(&self, query: &NoteQuery) -> Result<Vec<Note>, ClientError> {
        let response = self
            .request(Method::GET, "/notes")
            .query(&query.to_pairs())
            .send()
            .await?;
        Self::parse_response(response).await
    }

    pub async fn get_note(&self, id: i64) -> Result<Note, ClientError> {
        let response = self.request(Method::GET, &format!("/notes/{id}")).send().await?;
        Self::parse_response(response).await
    }

    pub async fn create_note(&self, note: &NewNote) -> Result<Note, ClientError> {
        let response = self.request(Method::POST, "/notes").json(note).send().await?;
        Self::parse_response(response).await
    }

    pub async fn update_note(&self, id: i64, update: &NoteUpdate) -> Result<Note, ClientError> {
        let response = self
            .request(Method::PUT, &format!("/notes/{id}"))
            .json(update)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/notes/{id}"))
            .send()
            .await?;
        Self::check_status(response).await
    }

    // -----------------------------------------------------------------------
    // Tags
    // -----------------------------------------------------------------------

    pub async fn list_tags(&self) -> Result<Vec<Tag>, ClientError> {
        let response = self.request(Method::GET, "/tags").send().await?;
        Self::parse_response(response).await
    }

    pub async fn get_tag(&self, id: i64) -> Result<Tag, ClientError> {
        let response = self.request(Method::GET, &format!("/tags/{id}")).send().await?;
        Self::parse_response(response).await
    }

    pub async fn create_tag(&self, name: &str) -> Result<Tag, ClientError> {
        let response = self
            .request(Method::POST, "/tags")
            .json(&TagName::from(name))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    pub async fn update_tag(&self, id: i64, name: &str) -> Result<Tag, ClientError> {
        let response = self
            .request(Method::PUT, &format!("/tags/{id}"))
            .json(&TagRename { name })
            .send()
            .await?;
        Self::parse_response(response).await
    }

    pub async fn delete_tag(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/tags/{id}"))
            .send()
            .await?;
        Self::check_status(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request, attaching the bearer token when one is held.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn clear_session(&self) -> Result<(), ClientError> {
        self.session.clear();
        self.store.clear()?;
        Ok(())
    }

    /// Turn a non-2xx response into [`ClientError::Api`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), ClientError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
