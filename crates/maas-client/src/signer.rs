//! Request signing.
//!
//! MAAS authenticates API calls with OAuth 1.0 using the PLAINTEXT signature
//! method. The consumer secret is always empty and the signature is the
//! consumer and token secrets joined with `&`, so the header is identical for
//! every request made with the same credentials.

use crate::Result;
use maas_core::Error;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Request;
use secrecy::{ExposeSecret, SecretString};

/// Realm announced in the Authorization header of MAAS requests.
pub const MAAS_REALM: &str = "MAAS API";

/// Attaches whatever credentials a request needs before it is sent.
///
/// Implementations hold no per-request state and may be shared between
/// concurrent calls.
#[cfg_attr(test, mockall::automock)]
pub trait Signer: Send + Sync {
    /// Sign `request` in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be encoded into a header.
    fn sign(&self, request: &mut Request) -> Result<()>;
}

/// Signer for unauthenticated access; leaves requests untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousSigner;

impl Signer for AnonymousSigner {
    fn sign(&self, _request: &mut Request) -> Result<()> {
        Ok(())
    }
}

/// OAuth 1.0 consumer and token credentials.
#[derive(Debug)]
pub struct OAuthToken {
    consumer_key: String,
    consumer_secret: SecretString,
    token_key: String,
    token_secret: SecretString,
}

impl OAuthToken {
    /// Create a token from its four parts.
    #[must_use]
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token_key: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: SecretString::from(consumer_secret.into()),
            token_key: token_key.into(),
            token_secret: SecretString::from(token_secret.into()),
        }
    }

    /// Parse a MAAS API key of the form `<consumer key>:<token key>:<token secret>`.
    ///
    /// The consumer secret is left empty, as MAAS expects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] unless the key has exactly three fields.
    pub fn from_api_key(api_key: &str) -> Result<Self> {
        let elements: Vec<&str> = api_key.split(':').collect();
        let [consumer_key, token_key, token_secret] = elements.as_slice() else {
            return Err(Error::InvalidArgument(
                "Invalid API key. The format of the key must be \
                 \"<consumer key>:<token key>:<token secret>\"."
                    .to_string(),
            ));
        };

        Ok(Self::new(*consumer_key, "", *token_key, *token_secret))
    }

    /// Consumer key.
    #[must_use]
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Token key.
    #[must_use]
    pub fn token_key(&self) -> &str {
        &self.token_key
    }
}

/// OAuth 1.0 PLAINTEXT signer.
#[derive(Debug)]
pub struct PlainTextSigner {
    token: OAuthToken,
    realm: String,
}

impl PlainTextSigner {
    /// Create a signer for `token` announcing `realm`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the consumer key, token key or
    /// token secret is empty.
    pub fn new(token: OAuthToken, realm: impl Into<String>) -> Result<Self> {
        let missing = [
            ("consumer key", token.consumer_key.is_empty()),
            ("token key", token.token_key.is_empty()),
            ("token secret", token.token_secret.expose_secret().is_empty()),
        ]
        .into_iter()
        .find_map(|(field, empty)| empty.then_some(field));

        if let Some(field) = missing {
            return Err(Error::InvalidArgument(format!(
                "OAuth token is missing its {field}"
            )));
        }

        Ok(Self {
            token,
            realm: realm.into(),
        })
    }

    /// The realm announced in the Authorization header.
    #[must_use]
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Compute the Authorization header value.
    #[must_use]
    pub fn authorization(&self) -> String {
        let signature = format!(
            "{}&{}",
            self.token.consumer_secret.expose_secret(),
            self.token.token_secret.expose_secret()
        );

        format!(
            "OAuth oauth_consumer_key=\"{}\", oauth_token=\"{}\", \
             oauth_signature_method=\"PLAINTEXT\", oauth_signature=\"{}\", \
             oauth_version=\"1.0\", realm=\"{}\"",
            urlencoding::encode(&self.token.consumer_key),
            urlencoding::encode(&self.token.token_key),
            urlencoding::encode(&signature),
            urlencoding::encode(&self.realm),
        )
    }
}

impl Signer for PlainTextSigner {
    fn sign(&self, request: &mut Request) -> Result<()> {
        let mut value = HeaderValue::from_str(&self.authorization())?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}
