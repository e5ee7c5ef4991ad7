//! REST client
//!
//! Every call builds the URL from the configured API root, attaches the bot
//! token, and maps non-success statuses to [`HttpError::Status`].

use std::fmt;

use chat_common::{ClientConfig, HttpConfig};
use chat_core::{Channel, Message, MessageRequest, Snowflake, User};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{HttpError, HttpResult};
use crate::files::{build_form, FileContent};
use crate::token::TokenStore;

/// HTTP methods used by the REST surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Delete => Self::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// REST client shared by every handler context
///
/// Cheap to clone; the underlying connection pool and token slot are shared.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: HttpConfig,
    token: TokenStore,
    debug: bool,
}

impl HttpClient {
    /// Create a client reading its token from `token`
    pub fn new(config: &ClientConfig, token: TokenStore) -> HttpResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.http.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            config: config.http.clone(),
            token,
            debug: config.debug,
        })
    }

    /// Token slot this client authorizes with
    pub fn token(&self) -> &TokenStore {
        &self.token
    }

    /// Absolute URL for an endpoint; a leading `/` on the path is ignored
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_root(), path.trim_start_matches('/'))
    }

    fn headers(&self, token: &str) -> HttpResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let authorization = HeaderValue::from_str(&format!("Bot {token}"))
            .map_err(|_| HttpError::Unauthenticated)?;
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(agent) = HeaderValue::from_str(&self.config.user_agent) {
            headers.insert(USER_AGENT, agent);
        }
        Ok(headers)
    }

    /// Perform an authorized JSON request
    ///
    /// Returns the parsed response body, or `Value::Null` for empty bodies.
    ///
    /// # Errors
    /// - [`HttpError::Unauthenticated`] if no token is stored (no request is made)
    /// - [`HttpError::Status`] if the server answers with a non-success status
    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> HttpResult<Value> {
        let token = self.token.get().ok_or(HttpError::Unauthenticated)?;
        let url = self.url_for(path);

        let mut builder = self
            .client
            .request(method.into(), &url)
            .headers(self.headers(token)?);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        self.read_response(method, &url, response).await
    }

    async fn read_response(&self, method: Method, url: &str, response: reqwest::Response) -> HttpResult<Value> {
        let status = response.status();
        let text = response.text().await?;

        if self.debug {
            tracing::debug!(%method, url, status = status.as_u16(), body = %text, "REST response");
        }

        if !status.is_success() {
            tracing::warn!(%method, url, status = status.as_u16(), "REST request failed");
            return Err(HttpError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn request_as<T: DeserializeOwned>(&self, method: Method, path: &str, body: Option<&Value>) -> HttpResult<T> {
        let value = self.request(method, path, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Post a message to a channel
    pub async fn send_message(
        &self,
        channel_id: Snowflake,
        request: impl Into<MessageRequest>,
    ) -> HttpResult<Message> {
        let request = request.into();
        request.validate()?;

        let body = serde_json::to_value(&request)?;
        self.request_as(Method::Post, &format!("/channels/{channel_id}/messages"), Some(&body))
            .await
    }

    /// Reply to a message; lines are joined with newlines
    pub async fn reply<I, S>(&self, message: &Message, lines: I) -> HttpResult<Message>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.send_message(message.channel_id, message.reply_request(lines))
            .await
    }

    /// Post a message with file attachments
    pub async fn send_files(
        &self,
        channel_id: Snowflake,
        request: impl Into<MessageRequest>,
        files: Vec<FileContent>,
    ) -> HttpResult<Message> {
        let token = self.token.get().ok_or(HttpError::Unauthenticated)?;
        let request = request.into();
        if files.is_empty() {
            request.validate()?;
        }

        let form = build_form(serde_json::to_string(&request)?, files)?;
        let url = self.url_for(&format!("channels/{channel_id}/messages"));

        let mut headers = self.headers(token)?;
        // reqwest sets the multipart boundary header itself
        headers.remove(CONTENT_TYPE);

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .multipart(form)
            .send()
            .await?;
        let value = self.read_response(Method::Post, &url, response).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Delete a message
    pub async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> HttpResult<()> {
        self.request(
            Method::Delete,
            &format!("/channels/{channel_id}/messages/{message_id}"),
            None,
        )
        .await?;
        Ok(())
    }

    /// Open (or fetch) the direct-message channel with a user
    pub async fn create_dm(&self, recipient_id: Snowflake) -> HttpResult<Channel> {
        let body = serde_json::json!({ "recipient_id": recipient_id });
        self.request_as(Method::Post, "/users/@me/channels", Some(&body))
            .await
    }

    /// Send a direct message to a user
    pub async fn send_dm(&self, user: &User, request: impl Into<MessageRequest>) -> HttpResult<Message> {
        let channel = self.create_dm(user.id).await?;
        self.send_message(channel.id, request).await
    }

    /// Fetch the user the token belongs to
    pub async fn current_user(&self) -> HttpResult<User> {
        self.request_as(Method::Get, "/users/@me", None).await
    }
}
