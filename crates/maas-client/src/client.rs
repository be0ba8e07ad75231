//! Asynchronous MAAS client implementation.

use crate::signer::{AnonymousSigner, OAuthToken, PlainTextSigner, Signer, MAAS_REALM};
use crate::Result;
use maas_core::config::MaasClientConfig;
use maas_core::http::{HttpConfig, FORM_CONTENT_TYPE};
use maas_core::{Error, Params};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Request};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!("maas-client/", env!("CARGO_PKG_VERSION"));

/// Query parameter that selects a named operation on a resource.
pub const OPERATION_PARAM: &str = "op";

/// Builder for [`MaasClient`].
#[derive(Clone)]
pub struct MaasClientBuilder {
    base_url: Url,
    signer: Arc<dyn Signer>,
    http_config: HttpConfig,
    tls_verify: bool,
    tls_ca_cert: Option<PathBuf>,
}

impl MaasClientBuilder {
    /// Create a builder for the specified API base address.
    ///
    /// Requests are anonymous unless a signer or API key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the base address is malformed.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let raw = base_url.as_ref();
        let base_url = Url::parse(raw).map_err(|err| {
            Error::ParseError(format!("Invalid MAAS base address `{raw}`: {err}"))
        })?;

        Ok(Self {
            base_url,
            signer: Arc::new(AnonymousSigner),
            http_config: HttpConfig::new(),
            tls_verify: true,
            tls_ca_cert: None,
        })
    }

    /// Create a builder from a [`MaasClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or the API key in the configuration is invalid.
    pub fn from_config(config: &MaasClientConfig) -> Result<Self> {
        let mut builder = Self::new(&config.url)?
            .with_http_config(HttpConfig::new().with_timeout(config.timeout()))
            .with_tls_verify(config.tls_verify);

        if let Some(path) = &config.tls_ca_cert {
            builder = builder.with_ca_cert(path.clone());
        }

        match &config.api_key {
            Some(api_key) => builder.with_api_key(api_key),
            None => Ok(builder),
        }
    }

    /// Sign requests with the given signer.
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = signer;
        self
    }

    /// Sign requests with the OAuth credentials held in a MAAS API key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the key is not made of three
    /// non-empty colon-separated fields.
    pub fn with_api_key(self, api_key: &str) -> Result<Self> {
        let token = OAuthToken::from_api_key(api_key)?;
        let signer = PlainTextSigner::new(token, MAAS_REALM)?;
        Ok(self.with_signer(Arc::new(signer)))
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, http_config: HttpConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Trust an additional PEM-encoded CA certificate.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the CA certificate cannot be loaded
    /// or the HTTP client cannot be created.
    pub fn build(self) -> Result<MaasClient> {
        let user_agent = self
            .http_config
            .user_agent
            .clone()
            .unwrap_or_else(|| USER_AGENT.to_string());

        let mut builder = Client::builder()
            .user_agent(user_agent)
            .timeout(self.http_config.timeout)
            .connect_timeout(self.http_config.connect_timeout)
            .gzip(self.http_config.enable_compression);

        if !self.tls_verify {
            warn!("TLS verification disabled for MAAS client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &self.tls_ca_cert {
            debug!("loading MAAS CA certificate from {}", ca_cert.display());
            let bytes = std::fs::read(ca_cert).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read MAAS CA certificate {}: {err}",
                    ca_cert.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid MAAS CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build MAAS HTTP client: {err}"))
        })?;

        Ok(MaasClient {
            http,
            base_url: self.base_url,
            signer: self.signer,
        })
    }
}

/// Asynchronous client for a MAAS API endpoint.
///
/// The client is immutable once built; clones share the connection pool and
/// the signer, so one instance can serve any number of concurrent calls.
#[derive(Clone)]
pub struct MaasClient {
    http: Client,
    base_url: Url,
    signer: Arc<dyn Signer>,
}

impl MaasClient {
    /// Create a client that issues anonymous requests.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the base address is malformed.
    pub fn anonymous(base_url: impl AsRef<str>) -> Result<Self> {
        MaasClientBuilder::new(base_url)?.build()
    }

    /// Create a client that signs every request with the OAuth credentials
    /// held in `api_key` (`<consumer key>:<token key>:<token secret>`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a malformed API key and
    /// [`Error::ParseError`] for a malformed base address.
    pub fn authenticated(base_url: impl AsRef<str>, api_key: &str) -> Result<Self> {
        let token = OAuthToken::from_api_key(api_key)?;
        let signer = PlainTextSigner::new(token, MAAS_REALM)?;
        MaasClientBuilder::new(base_url)?
            .with_signer(Arc::new(signer))
            .build()
    }

    /// Construct a client directly from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration holds an invalid URL or API key.
    pub fn from_config(config: &MaasClientConfig) -> Result<Self> {
        MaasClientBuilder::from_config(config)?.build()
    }

    /// Start a builder for the given base address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the base address is malformed.
    pub fn builder(base_url: impl AsRef<str>) -> Result<MaasClientBuilder> {
        MaasClientBuilder::new(base_url)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a resource reference against the base address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the reference cannot be resolved.
    pub fn get_url(&self, resource: &str) -> Result<Url> {
        self.base_url.join(resource).map_err(|err| {
            Error::ParseError(format!("Invalid MAAS resource `{resource}`: {err}"))
        })
    }

    /// Issue a GET, optionally selecting a named `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] before any network activity if
    /// `params` already contains the `op` key. Non-2xx responses yield
    /// [`Error::ApiError`] carrying the response body.
    pub async fn get(&self, resource: &str, operation: &str, params: &Params) -> Result<Vec<u8>> {
        if params.contains_key(OPERATION_PARAM) {
            return Err(Error::InvalidArgument(format!(
                "The parameters contain a value for '{OPERATION_PARAM}' which is a reserved parameter."
            )));
        }

        let mut query = params.clone();
        if !operation.is_empty() {
            query.set(OPERATION_PARAM, operation);
        }

        let mut url = self.get_url(resource)?;
        set_query(&mut url, &query);

        let request = self.http.get(url).build()?;
        self.dispatch(request).await
    }

    /// Issue a POST invoking `operation`, with `params` form-encoded in the body.
    ///
    /// Any query already present on `resource` is replaced by the operation
    /// selector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ApiError`] for non-2xx responses.
    pub async fn post(&self, resource: &str, operation: &str, params: &Params) -> Result<Vec<u8>> {
        let mut query = Params::new();
        if !operation.is_empty() {
            query.set(OPERATION_PARAM, operation);
        }

        let mut url = self.get_url(resource)?;
        set_query(&mut url, &query);

        self.send_form(Method::POST, url, params).await
    }

    /// Issue a PUT with `params` form-encoded in the body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ApiError`] for non-2xx responses.
    pub async fn put(&self, resource: &str, params: &Params) -> Result<Vec<u8>> {
        let url = self.get_url(resource)?;
        self.send_form(Method::PUT, url, params).await
    }

    /// Issue a DELETE with an empty body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ApiError`] for non-2xx responses.
    pub async fn delete(&self, resource: &str) -> Result<()> {
        let url = self.get_url(resource)?;
        let request = self.http.delete(url).body(Vec::new()).build()?;
        self.dispatch(request).await.map(|_| ())
    }

    async fn send_form(&self, method: Method, url: Url, params: &Params) -> Result<Vec<u8>> {
        let request = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(params.encode())
            .build()?;
        self.dispatch(request).await
    }

    async fn dispatch(&self, mut request: Request) -> Result<Vec<u8>> {
        self.signer.sign(&mut request)?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "Sending MAAS request");

        let response = self.http.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        debug!(%method, %url, status = status.as_u16(), bytes = body.len(), "MAAS response received");

        if !status.is_success() {
            return Err(Error::ApiError {
                status: status.as_u16(),
                status_line: status.to_string(),
                body,
            });
        }

        Ok(body)
    }
}

fn set_query(url: &mut Url, query: &Params) {
    if query.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&query.encode()));
    }
}
