//! Resource objects returned by the MAAS API.
//!
//! Every MAAS resource carries a `resource_uri` naming its own address. A
//! [`MaasObject`] pairs those JSON fields with the client that fetched them so
//! follow-up calls can be made against the same resource.

use crate::client::MaasClient;
use crate::Result;
use maas_core::{Error, Params};
use serde_json::{Map, Value};
use url::Url;

/// Field naming a resource's own address.
pub const RESOURCE_URI: &str = "resource_uri";

/// A MAAS resource: its JSON fields plus the client used to reach it.
#[derive(Clone)]
pub struct MaasObject {
    client: MaasClient,
    resource_uri: String,
    values: Map<String, Value>,
}

/// Build the root object of the API exposed by `client`.
#[must_use]
pub fn new_maas(client: MaasClient) -> MaasObject {
    MaasObject::root(client)
}

impl MaasObject {
    /// Root object whose only field is the client's base address.
    #[must_use]
    pub fn root(client: MaasClient) -> Self {
        let resource_uri = client.base_url().to_string();
        Self::at(client, resource_uri)
    }

    /// Wrap a decoded JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecodeError`] if `values` has no string `resource_uri`.
    pub fn from_values(client: MaasClient, values: Map<String, Value>) -> Result<Self> {
        let resource_uri = values
            .get(RESOURCE_URI)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::DecodeError(format!("MAAS object has no string `{RESOURCE_URI}` field"))
            })?
            .to_string();

        Ok(Self {
            client,
            resource_uri,
            values,
        })
    }

    fn at(client: MaasClient, resource_uri: String) -> Self {
        let mut values = Map::new();
        values.insert(RESOURCE_URI.to_string(), Value::String(resource_uri.clone()));
        Self {
            client,
            resource_uri,
            values,
        }
    }

    /// The client this object issues requests through.
    #[must_use]
    pub fn client(&self) -> &MaasClient {
        &self.client
    }

    /// The resource's own address, as reported by the server.
    #[must_use]
    pub fn resource_uri(&self) -> &str {
        &self.resource_uri
    }

    /// All JSON fields of the object.
    #[must_use]
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Absolute URL of the resource.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if `resource_uri` cannot be resolved.
    pub fn uri(&self) -> Result<Url> {
        self.client.get_url(&self.resource_uri)
    }

    /// Child resource `name`, resolved against this object's address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the child address cannot be resolved.
    pub fn sub_object(&self, name: &str) -> Result<Self> {
        let mut url = self.uri()?.join(name)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self::at(self.client.clone(), url.to_string()))
    }

    /// Fetch the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns the client error, or [`Error::DecodeError`] if the body is not
    /// a JSON object with a `resource_uri`.
    pub async fn get(&self) -> Result<Self> {
        let body = self
            .client
            .get(&self.resource_uri, "", &Params::new())
            .await?;
        self.decode_object(&body)
    }

    /// Update the resource with `params` (PUT).
    ///
    /// # Errors
    ///
    /// Returns the client error, or [`Error::DecodeError`] for an unexpected body.
    pub async fn update(&self, params: &Params) -> Result<Self> {
        let body = self.client.put(&self.resource_uri, params).await?;
        self.decode_object(&body)
    }

    /// Delete the resource.
    ///
    /// # Errors
    ///
    /// Returns the client error.
    pub async fn delete(&self) -> Result<()> {
        self.client.delete(&self.resource_uri).await
    }

    /// Invoke a GET operation on the resource.
    ///
    /// # Errors
    ///
    /// Returns the client error, or [`Error::DecodeError`] if the body is not JSON.
    pub async fn call_get(&self, operation: &str, params: &Params) -> Result<Value> {
        let body = self
            .client
            .get(&self.resource_uri, operation, params)
            .await?;
        decode_value(&body)
    }

    /// Invoke a POST operation on the resource.
    ///
    /// # Errors
    ///
    /// Returns the client error, or [`Error::DecodeError`] if the body is not JSON.
    pub async fn call_post(&self, operation: &str, params: &Params) -> Result<Value> {
        let body = self
            .client
            .post(&self.resource_uri, operation, params)
            .await?;
        decode_value(&body)
    }

    fn decode_object(&self, body: &[u8]) -> Result<Self> {
        match decode_value(body)? {
            Value::Object(values) => Self::from_values(self.client.clone(), values),
            other => Err(Error::DecodeError(format!(
                "expected a JSON object for `{}`, got {other}",
                self.resource_uri
            ))),
        }
    }
}

// Operations such as `release` may answer with an empty body.
fn decode_value(body: &[u8]) -> Result<Value> {
    if body.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(body)?)
}
