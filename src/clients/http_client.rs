//! HTTP client wrapper.
//!
//! This module provides [`Client`], which holds the full intent of one kind of
//! request (target, path, query, headers, body, decoding mode) and dispatches
//! it with any of the verb helpers.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument::WithSubscriber;
use tracing::Dispatch;
use url::{form_urlencoded, Url};

use crate::clients::decode::decode;
use crate::clients::errors::{HttpError, HttpResponseError, OptionError};
use crate::clients::http_request::{Decoding, HttpMethod, Payload};
use crate::clients::options::ClientOption;
use crate::clients::transport::build_transport;
use crate::config::ClientConfig;
use crate::error::{ConfigError, ErrorChain};

/// Timeout used when a non-positive timeout is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP client wrapper.
///
/// A `Client` is built once from a target URL and an ordered list of
/// [`ClientOption`]s and is read-only afterwards. Each verb helper
/// synthesizes a fresh request from that state, sends it, and decodes a 2xx
/// body into the requested type.
///
/// Construction never fails. A target that does not look like a URL is split
/// into scheme and host on a best-effort basis, and options that cannot be
/// applied (an invalid header, a payload that does not serialize) are
/// recorded and reported by [`validate`](Self::validate) and by every
/// dispatch.
///
/// # Headers
///
/// After all options are applied:
/// - `Content-Type: application/json` is added if no `Content-Type` was set
///   and signed-URL mode is off.
/// - With `Content-Type: application/x-www-form-urlencoded`, an unset body
///   defaults to the encoded query and `Content-Length` is set to the body
///   length.
/// - `Cache-Control: no-cache` is always set, replacing any caller value.
///
/// # Cancellation
///
/// Dropping a returned future aborts the in-flight request. Wrap calls in
/// `tokio::time::timeout` or `tokio::select!` to bound them from outside.
///
/// # Thread Safety
///
/// `Client` is `Send + Sync`; concurrent calls share the underlying
/// `reqwest::Client` connection pool.
///
/// # Example
///
/// ```rust,ignore
/// use http_utils::{Client, ClientOption};
///
/// let client = Client::new(
///     "https://api.example.com",
///     [
///         ClientOption::path("/api/v1/devices"),
///         ClientOption::query_param("limit", "50"),
///         ClientOption::header("Authorization", "Bearer token"),
///     ],
/// );
///
/// let devices: Option<serde_json::Value> = client.get().await?;
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    target_url: String,
    scheme: &'static str,
    host: String,
    path: String,
    query: BTreeMap<String, Vec<String>>,
    headers: HeaderMap,
    payload: Option<Vec<u8>>,
    timeout: Option<Duration>,
    decoding: Decoding,
    use_signed_url: bool,
    logger: Dispatch,
    errors: Option<ErrorChain<OptionError>>,
}

// Verify Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl Client {
    /// Creates a client for `target_url`, applying `options` in order.
    ///
    /// The logger defaults to the dispatcher that is current when this is
    /// called.
    #[must_use]
    pub fn new<I>(target_url: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = ClientOption>,
    {
        options
            .into_iter()
            .fold(Self::builder(target_url), ClientBuilder::option)
            .build()
    }

    /// Creates a new builder for `target_url`.
    #[must_use]
    pub fn builder(target_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(target_url.into())
    }

    /// Creates a client from a validated [`ClientConfig`].
    ///
    /// The configured base URL becomes the target (its path, if any, the
    /// initial request path), the sender is built by
    /// [`build_transport`](crate::clients::build_transport), and the
    /// configured logger is used when present. `options` are applied after
    /// these, so a [`ClientOption::Path`] replaces the base URL's path.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Config`] if the configuration has recorded
    /// errors or no base URL, and [`HttpError::Transport`] if the sender
    /// cannot be built.
    pub fn from_config<I>(config: &ClientConfig, options: I) -> Result<Self, HttpError>
    where
        I: IntoIterator<Item = ClientOption>,
    {
        config.validate().map_err(HttpError::Config)?;
        let base_url = config
            .base_url()
            .ok_or_else(|| HttpError::Config(ErrorChain::new(ConfigError::MissingBaseUrl)))?;

        let mut builder = Self::builder(base_url.to_string()).transport(build_transport(config)?);

        let base_path = base_url.as_url().path();
        if base_path != "/" {
            builder = builder.path(base_path);
        }
        if let Some(logger) = config.logger() {
            builder = builder.logger(logger.clone());
        }

        Ok(options
            .into_iter()
            .fold(builder, ClientBuilder::option)
            .build())
    }

    /// Returns the target URL exactly as it was supplied.
    #[must_use]
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query parameters, keyed in sorted order.
    #[must_use]
    pub const fn query(&self) -> &BTreeMap<String, Vec<String>> {
        &self.query
    }

    /// Returns the query string as it is sent, without the leading `?`.
    #[must_use]
    pub fn encoded_query(&self) -> String {
        encode_query(&self.query)
    }

    /// Returns the finalized request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the request body, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// Returns the per-request timeout, if one was configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the response decoding mode.
    #[must_use]
    pub const fn decoding(&self) -> Decoding {
        self.decoding
    }

    /// Returns whether requests go to the target URL verbatim.
    #[must_use]
    pub const fn uses_signed_url(&self) -> bool {
        self.use_signed_url
    }

    /// Returns the logger handle dispatches run under.
    #[must_use]
    pub const fn logger(&self) -> &Dispatch {
        &self.logger
    }

    /// Returns the options that failed to apply, if any.
    ///
    /// # Errors
    ///
    /// Returns the recorded failures, most recent first.
    pub fn validate(&self) -> Result<(), ErrorChain<OptionError>> {
        self.errors.clone().map_or(Ok(()), Err)
    }

    /// Computes the URL requests are sent to.
    ///
    /// In signed-URL mode this is the target URL verbatim. Otherwise the path
    /// is resolved against the target's scheme and host and the encoded query
    /// is attached.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidUrl`] if the result is not a valid URL.
    pub fn request_url(&self) -> Result<Url, HttpError> {
        if self.use_signed_url {
            return parse_url(&self.target_url);
        }

        let base = parse_url(&format!("{}://{}", self.scheme, self.host))?;
        let mut url = if self.path.is_empty() {
            base
        } else {
            base.join(&self.path).map_err(|source| HttpError::InvalidUrl {
                url: self.path.clone(),
                source,
            })?
        };

        let query = self.encoded_query();
        url.set_query((!query.is_empty()).then_some(query.as_str()));
        Ok(url)
    }

    /// Synthesizes a request for `method` from the client's state.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidOptions`] if any option failed to apply,
    /// [`HttpError::InvalidUrl`] if the URL cannot be built, and
    /// [`HttpError::Transport`] if `reqwest` rejects the request.
    pub fn new_request(&self, method: HttpMethod) -> Result<reqwest::Request, HttpError> {
        self.validate().map_err(HttpError::InvalidOptions)?;

        let mut builder = self
            .http
            .request(method.as_method(), self.request_url()?)
            .headers(self.headers.clone());

        if let Some(payload) = &self.payload {
            builder = builder.body(payload.clone());
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(builder.build()?)
    }

    /// Sends `request` and decodes a 2xx body into `T`.
    ///
    /// Returns `Ok(None)` when the response body is empty.
    ///
    /// # Errors
    ///
    /// - [`HttpError::Transport`] if the request cannot be sent
    /// - [`HttpError::ResponseRead`] if the body cannot be read
    /// - [`HttpError::Response`] for a non-2xx status, carrying the raw body
    /// - [`HttpError::Decode`] if the body does not decode into `T`
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::Request,
    ) -> Result<Option<T>, HttpError> {
        self.dispatch(request)
            .with_subscriber(self.logger.clone())
            .await
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: reqwest::Request,
    ) -> Result<Option<T>, HttpError> {
        let method = request.method().clone();
        let url = request.url().clone();
        let payload = String::from_utf8_lossy(self.payload.as_deref().unwrap_or_default());

        tracing::debug!(%method, %url, %payload, "sending request");

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(%method, %url, %payload, error = %err, "request failed");
                return Err(HttpError::Transport(err));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(%method, %url, error = %err, "failed to read response body");
                return Err(HttpError::ResponseRead(err));
            }
        };

        tracing::debug!(%method, %url, status = status.as_u16(), %body, "received response");

        if status.as_u16() / 100 != 2 {
            tracing::error!(
                %method,
                %url,
                %payload,
                status = status.as_u16(),
                %body,
                "unexpected response status"
            );
            return Err(HttpResponseError {
                code: status.as_u16(),
                status: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            }
            .into());
        }

        if body.is_empty() {
            return Ok(None);
        }

        match decode(&body, self.decoding) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::error!(
                    %method,
                    %url,
                    %body,
                    error = %err,
                    "failed to decode response body"
                );
                Err(HttpError::Decode(err))
            }
        }
    }

    async fn send<T: DeserializeOwned>(&self, method: HttpMethod) -> Result<Option<T>, HttpError> {
        let request = self.new_request(method)?;
        self.execute(request).await
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`new_request`](Self::new_request) and [`execute`](Self::execute).
    pub async fn get<T: DeserializeOwned>(&self) -> Result<Option<T>, HttpError> {
        self.send(HttpMethod::Get).await
    }

    /// Sends a POST request.
    ///
    /// # Errors
    ///
    /// See [`new_request`](Self::new_request) and [`execute`](Self::execute).
    pub async fn post<T: DeserializeOwned>(&self) -> Result<Option<T>, HttpError> {
        self.send(HttpMethod::Post).await
    }

    /// Sends a PUT request.
    ///
    /// # Errors
    ///
    /// See [`new_request`](Self::new_request) and [`execute`](Self::execute).
    pub async fn put<T: DeserializeOwned>(&self) -> Result<Option<T>, HttpError> {
        self.send(HttpMethod::Put).await
    }

    /// Sends a DELETE request.
    ///
    /// Use `serde::de::IgnoredAny` as `T` when the body is of no interest.
    ///
    /// # Errors
    ///
    /// See [`new_request`](Self::new_request) and [`execute`](Self::execute).
    pub async fn delete<T: DeserializeOwned>(&self) -> Result<Option<T>, HttpError> {
        self.send(HttpMethod::Delete).await
    }
}

/// Builder for constructing [`Client`] instances.
///
/// Methods apply their option immediately, in call order, so
/// `Client::builder(url).header(..).path(..).build()` is equivalent to
/// `Client::new(url, [ClientOption::Header(..), ClientOption::Path(..)])`.
#[derive(Debug)]
pub struct ClientBuilder {
    target_url: String,
    scheme: &'static str,
    host: String,
    path: String,
    query: BTreeMap<String, Vec<String>>,
    headers: HeaderMap,
    payload: Option<Vec<u8>>,
    http: Option<reqwest::Client>,
    timeout: Option<Duration>,
    decoding: Decoding,
    use_signed_url: bool,
    logger: Option<Dispatch>,
    errors: Option<ErrorChain<OptionError>>,
}

impl ClientBuilder {
    fn new(target_url: String) -> Self {
        let (scheme, host) = split_target(&target_url);
        Self {
            target_url,
            scheme,
            host,
            path: String::new(),
            query: BTreeMap::new(),
            headers: HeaderMap::new(),
            payload: None,
            http: None,
            timeout: None,
            decoding: Decoding::PlainJson,
            use_signed_url: false,
            logger: None,
            errors: None,
        }
    }

    /// Applies an arbitrary option.
    #[must_use]
    pub fn option(mut self, option: ClientOption) -> Self {
        match option {
            ClientOption::Header(name, value) => self.set_header(name, &value),
            ClientOption::QueryParam(key, value) => self.query.entry(key).or_default().push(value),
            ClientOption::Path(path) => self.path = path,
            ClientOption::Transport(http) => self.http = http,
            ClientOption::Timeout(timeout) => {
                self.timeout = Some(if timeout.is_zero() {
                    DEFAULT_TIMEOUT
                } else {
                    timeout
                });
            }
            ClientOption::Payload(payload) => self.payload = Some(payload.into_bytes()),
            ClientOption::Logger(logger) => self.logger = Some(logger),
            ClientOption::UseProto(use_proto) => {
                self.decoding = if use_proto {
                    Decoding::Structured
                } else {
                    Decoding::PlainJson
                };
            }
            ClientOption::SignedUrl(use_signed_url) => self.use_signed_url = use_signed_url,
        }
        self
    }

    /// Sets a header, replacing any earlier value for the same name.
    #[must_use]
    pub fn header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.option(ClientOption::header(name, value))
    }

    /// Adds a query parameter, keeping earlier values for the same key.
    #[must_use]
    pub fn query_param(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.option(ClientOption::query_param(key, value))
    }

    /// Sets the request path.
    #[must_use]
    pub fn path(self, path: impl Into<String>) -> Self {
        self.option(ClientOption::path(path))
    }

    /// Replaces the HTTP sender. `None` restores the default sender.
    #[must_use]
    pub fn transport(self, http: impl Into<Option<reqwest::Client>>) -> Self {
        self.option(ClientOption::Transport(http.into()))
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        self.option(ClientOption::Timeout(timeout))
    }

    /// Sets the request body.
    #[must_use]
    pub fn payload(self, payload: impl Into<Payload>) -> Self {
        self.option(ClientOption::payload(payload))
    }

    /// Serializes `value` to JSON and uses it as the request body.
    ///
    /// A serialization failure is recorded and surfaces from
    /// [`Client::validate`] and every dispatch; the body is left unset.
    #[must_use]
    pub fn json_payload<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match Payload::json(value) {
            Ok(payload) => self.option(ClientOption::Payload(payload)),
            Err(err) => {
                ErrorChain::append(
                    &mut self.errors,
                    OptionError::Payload {
                        reason: err.to_string(),
                    },
                );
                self
            }
        }
    }

    /// Sets the logger handle.
    #[must_use]
    pub fn logger(self, logger: Dispatch) -> Self {
        self.option(ClientOption::Logger(logger))
    }

    /// Enables structured (protobuf JSON) decoding.
    #[must_use]
    pub fn use_proto(self, use_proto: bool) -> Self {
        self.option(ClientOption::UseProto(use_proto))
    }

    /// Sends requests to the target URL verbatim.
    #[must_use]
    pub fn signed_url(self, use_signed_url: bool) -> Self {
        self.option(ClientOption::SignedUrl(use_signed_url))
    }

    fn set_header(&mut self, name: String, value: &str) {
        let parsed = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| err.to_string())
            .and_then(|header_name| {
                HeaderValue::from_str(value)
                    .map(|header_value| (header_name, header_value))
                    .map_err(|err| err.to_string())
            });

        match parsed {
            Ok((header_name, header_value)) => {
                self.headers.insert(header_name, header_value);
            }
            Err(reason) => {
                ErrorChain::append(&mut self.errors, OptionError::InvalidHeader { name, reason });
            }
        }
    }

    /// Finalizes headers and builds the [`Client`].
    #[must_use]
    pub fn build(mut self) -> Client {
        let logger = self
            .logger
            .unwrap_or_else(|| tracing::dispatcher::get_default(Dispatch::clone));

        let is_form = self
            .headers
            .get(CONTENT_TYPE)
            .is_some_and(|content_type| content_type == FORM_CONTENT_TYPE);
        if is_form {
            let query = &self.query;
            let body = self
                .payload
                .get_or_insert_with(|| encode_query(query).into_bytes());
            self.headers
                .insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        }

        if !self.headers.contains_key(CONTENT_TYPE) && !self.use_signed_url {
            self.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }

        self.headers
            .insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        Client {
            http: self.http.unwrap_or_default(),
            target_url: self.target_url,
            scheme: self.scheme,
            host: self.host,
            path: self.path,
            query: self.query,
            headers: self.headers,
            payload: self.payload,
            timeout: self.timeout,
            decoding: self.decoding,
            use_signed_url: self.use_signed_url,
            logger,
            errors: self.errors,
        }
    }
}

/// Splits a target into scheme and host.
///
/// The scheme is `https` if the target starts with `https`, `http`
/// otherwise. The host is whatever follows the scheme prefix, up to the first
/// path, query, or fragment delimiter.
fn split_target(target: &str) -> (&'static str, String) {
    let (scheme, rest) = if target.starts_with("https") {
        ("https", target.strip_prefix("https://").unwrap_or(target))
    } else {
        ("http", target.strip_prefix("http://").unwrap_or(target))
    };

    let host_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    (scheme, rest[..host_end].to_string())
}

fn encode_query(query: &BTreeMap<String, Vec<String>>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, values) in query {
        for value in values {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish()
}

fn parse_url(url: &str) -> Result<Url, HttpError> {
    Url::parse(url).map_err(|source| HttpError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn quiet_client(target: &str, options: Vec<ClientOption>) -> Client {
        let builder = Client::builder(target).logger(Dispatch::none());
        options
            .into_iter()
            .fold(builder, ClientBuilder::option)
            .build()
    }

    #[test]
    fn test_split_target_defaults_to_http() {
        assert_eq!(
            split_target("www.example.com"),
            ("http", "www.example.com".to_string())
        );
        assert_eq!(
            split_target("http://127.0.0.1:8080"),
            ("http", "127.0.0.1:8080".to_string())
        );
        assert_eq!(
            split_target("https://api.example.com/v1?x=1"),
            ("https", "api.example.com".to_string())
        );
    }

    #[test]
    fn test_construction_never_fails_on_garbage() {
        let client = quiet_client("not a url at all", vec![]);
        assert_eq!(client.target_url(), "not a url at all");
        assert!(client.validate().is_ok());
        assert!(matches!(
            client.new_request(HttpMethod::Get),
            Err(HttpError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_request_url_resolves_path_and_query() {
        let client = quiet_client(
            "http://localhost:8080",
            vec![
                ClientOption::path("api/v1/devices"),
                ClientOption::query_param("limit", "10"),
                ClientOption::query_param("filter", "a b"),
            ],
        );

        let url = client.request_url().unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/v1/devices?filter=a+b&limit=10"
        );
    }

    #[test]
    fn test_request_url_without_path_or_query() {
        let client = quiet_client("https://api.example.com", vec![]);
        assert_eq!(client.request_url().unwrap().as_str(), "https://api.example.com/");
    }

    #[test]
    fn test_header_option_replaces_earlier_value() {
        let client = quiet_client(
            "http://localhost",
            vec![
                ClientOption::header("X-Tenant", "first"),
                ClientOption::header("x-tenant", "second"),
            ],
        );

        let values: Vec<_> = client.headers().get_all("X-Tenant").iter().collect();
        assert_eq!(values, vec!["second"]);
    }

    #[test]
    fn test_query_param_option_appends() {
        let client = quiet_client(
            "http://localhost",
            vec![
                ClientOption::query_param("id", "1"),
                ClientOption::query_param("id", "2"),
            ],
        );

        assert_eq!(client.query().get("id"), Some(&vec!["1".to_string(), "2".to_string()]));
        assert_eq!(client.encoded_query(), "id=1&id=2");
    }

    #[test]
    fn test_default_content_type_is_json() {
        let client = quiet_client("http://localhost", vec![]);
        assert_eq!(client.headers().get(CONTENT_TYPE).unwrap(), JSON_CONTENT_TYPE);
    }

    #[test]
    fn test_caller_content_type_is_kept() {
        let client = quiet_client(
            "http://localhost",
            vec![ClientOption::header("Content-Type", "text/plain")],
        );
        assert_eq!(client.headers().get(CONTENT_TYPE).unwrap(), "text/plain");
    }

    #[test]
    fn test_signed_url_mode_skips_default_content_type() {
        let client = quiet_client(
            "https://bucket.example.com/obj?sig=abc",
            vec![ClientOption::SignedUrl(true)],
        );
        assert!(client.headers().get(CONTENT_TYPE).is_none());
        assert!(client.uses_signed_url());
    }

    #[test]
    fn test_cache_control_always_wins() {
        let client = quiet_client(
            "http://localhost",
            vec![ClientOption::header("Cache-Control", "max-age=60")],
        );
        let values: Vec<_> = client.headers().get_all(CACHE_CONTROL).iter().collect();
        assert_eq!(values, vec!["no-cache"]);
    }

    #[test]
    fn test_form_content_type_sets_body_and_content_length() {
        let client = quiet_client(
            "http://localhost",
            vec![
                ClientOption::header("Content-Type", FORM_CONTENT_TYPE),
                ClientOption::query_param("grant_type", "client_credentials"),
                ClientOption::query_param("scope", "read write"),
            ],
        );

        let expected = "grant_type=client_credentials&scope=read+write";
        assert_eq!(client.encoded_query(), expected);
        assert_eq!(client.payload(), Some(expected.as_bytes()));
        assert_eq!(
            client.headers().get(CONTENT_LENGTH).unwrap(),
            &expected.len().to_string()
        );
    }

    #[test]
    fn test_non_positive_timeout_falls_back_to_default() {
        let client = quiet_client("http://localhost", vec![ClientOption::Timeout(Duration::ZERO)]);
        assert_eq!(client.timeout(), Some(DEFAULT_TIMEOUT));

        let client = quiet_client(
            "http://localhost",
            vec![ClientOption::Timeout(Duration::from_secs(5))],
        );
        assert_eq!(client.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_use_proto_selects_structured_decoding() {
        let client = quiet_client("http://localhost", vec![ClientOption::UseProto(true)]);
        assert_eq!(client.decoding(), Decoding::Structured);

        let client = quiet_client(
            "http://localhost",
            vec![ClientOption::UseProto(true), ClientOption::UseProto(false)],
        );
        assert_eq!(client.decoding(), Decoding::PlainJson);
    }

    #[test]
    fn test_payload_variants() {
        let client = quiet_client("http://localhost", vec![ClientOption::payload("raw text")]);
        assert_eq!(client.payload(), Some(&b"raw text"[..]));

        let client = quiet_client(
            "http://localhost",
            vec![ClientOption::payload(vec![1_u8, 2, 3])],
        );
        assert_eq!(client.payload(), Some(&[1_u8, 2, 3][..]));

        let mut map = HashMap::new();
        map.insert("a", "b");
        let client = Client::builder("http://localhost")
            .logger(Dispatch::none())
            .json_payload(&map)
            .build();
        assert_eq!(client.payload(), Some(&br#"{"a":"b"}"#[..]));
    }

    #[test]
    fn test_invalid_options_surface_on_validate_and_dispatch() {
        let mut bad_map = BTreeMap::new();
        bad_map.insert(vec![1_u8], "value");

        let client = Client::builder("http://localhost")
            .logger(Dispatch::none())
            .header("bad header", "value")
            .json_payload(&bad_map)
            .build();

        let errors = client.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors.error(), OptionError::Payload { .. }));
        assert!(client.payload().is_none());

        assert!(matches!(
            client.new_request(HttpMethod::Get),
            Err(HttpError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_new_request_copies_headers_and_body() {
        let client = quiet_client(
            "http://localhost:9000",
            vec![
                ClientOption::path("/items"),
                ClientOption::header("X-Request-Id", "abc"),
                ClientOption::payload(r#"{"name":"Test"}"#),
            ],
        );

        let request = client.new_request(HttpMethod::Put).unwrap();
        assert_eq!(request.method(), &reqwest::Method::PUT);
        assert_eq!(request.url().as_str(), "http://localhost:9000/items");
        assert_eq!(request.headers().get("X-Request-Id").unwrap(), "abc");
        assert_eq!(
            request.body().and_then(reqwest::Body::as_bytes),
            Some(&br#"{"name":"Test"}"#[..])
        );
    }

    #[test]
    fn test_new_request_without_payload_has_no_body() {
        let client = quiet_client("http://localhost:9000", vec![]);
        let request = client.new_request(HttpMethod::Get).unwrap();
        assert!(request.body().is_none());
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client>();
    }

    #[tokio::test]
    async fn test_get_decodes_success_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .and(header("cache-control", "no-cache"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"success"}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = quiet_client(&mock_server.uri(), vec![ClientOption::path("health")]);
        let body: Option<Value> = client.get().await.unwrap();

        assert_eq!(body, Some(json!({"status": "success"})));
    }

    #[tokio::test]
    async fn test_post_sends_payload_and_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/post"))
            .and(query_param("dry_run", "true"))
            .and(header("content-type", "application/json"))
            .and(body_string(r#"{"field1":"value1"}"#))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":7}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = quiet_client(
            &mock_server.uri(),
            vec![
                ClientOption::path("/api/v1/post"),
                ClientOption::query_param("dry_run", "true"),
                ClientOption::payload(r#"{"field1":"value1"}"#),
            ],
        );
        let body: Option<Value> = client.post().await.unwrap();

        assert_eq!(body, Some(json!({"id": 7})));
    }

    #[tokio::test]
    async fn test_empty_success_body_yields_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let client = quiet_client(&mock_server.uri(), vec![ClientOption::path("/items/1")]);
        let body: Option<serde::de::IgnoredAny> = client.delete().await.unwrap();

        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_non_2xx_keeps_raw_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(409).set_body_string("conflict: version mismatch"))
            .mount(&mock_server)
            .await;

        let client = quiet_client(&mock_server.uri(), vec![ClientOption::path("/items/1")]);
        let err = client.put::<Value>().await.unwrap_err();

        match err {
            HttpError::Response(e) => {
                assert_eq!(e.code, 409);
                assert_eq!(e.status, "Conflict");
                assert_eq!(e.body, "conflict: version mismatch");
            }
            other => panic!("expected response error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_decode_failure_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&mock_server)
            .await;

        let client = quiet_client(&mock_server.uri(), vec![]);
        let err = client.get::<Value>().await.unwrap_err();

        assert!(matches!(err, HttpError::Decode(_)));
    }

    #[tokio::test]
    async fn test_structured_mode_decodes_camel_case_once() {
        #[derive(Debug, serde::Deserialize)]
        struct Device {
            device_id: String,
            checksum: String,
        }

        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"deviceId":"dev-1","checksum":"AAASDRRX"}"#),
            )
            .mount(&mock_server)
            .await;

        let client = quiet_client(&mock_server.uri(), vec![ClientOption::UseProto(true)]);
        let device: Device = client.get().await.unwrap().unwrap();

        assert_eq!(device.device_id, "dev-1");
        assert_eq!(device.checksum, "AAASDRRX");
    }
}
