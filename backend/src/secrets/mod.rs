//! Configuration secret retrieval
//!
//! Both note handlers resolve the bucket name and the encryption key id from a
//! single JSON secret on every request. Nothing is cached between requests.
mod error;

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;

pub use error::{SecretError, SecretResult};

/// Secret entry holding the bucket name
pub const BUCKET_SECRET_FIELD: &str = "jotnook-secret-bucket";

/// Secret entry holding the key-management key identifier
pub const KEY_ID_SECRET_FIELD: &str = "jotnook-secret-key";

/// Named configuration values resolved from the secret store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secrets {
    /// Bucket holding every note object
    pub bucket: String,
    /// Key id passed to the encrypt operation
    pub key_id: String,
    /// Any other entries of the secret
    pub extra: HashMap<String, String>,
}

impl Secrets {
    /// Builds the bundle from a secret's JSON payload
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Malformed` if the payload is not a JSON object of strings
    /// Returns `SecretError::MissingField` if the bucket or key entry is absent
    pub fn from_json(payload: &str) -> SecretResult<Self> {
        let mut values: HashMap<String, String> = serde_json::from_str(payload)?;

        let bucket = values
            .remove(BUCKET_SECRET_FIELD)
            .ok_or(SecretError::MissingField(BUCKET_SECRET_FIELD))?;
        let key_id = values
            .remove(KEY_ID_SECRET_FIELD)
            .ok_or(SecretError::MissingField(KEY_ID_SECRET_FIELD))?;

        Ok(Self {
            bucket,
            key_id,
            extra: values,
        })
    }
}

/// Fetches the secrets bundle for one request
#[async_trait]
pub trait SecretResolver: Send + Sync {
    /// Fetches a fresh copy of the secrets bundle
    ///
    /// # Errors
    ///
    /// Returns a `SecretError` when the store is unreachable, the secret does not
    /// exist, or its content cannot be used
    async fn resolve(&self) -> SecretResult<Secrets>;
}

/// Resolves secrets from AWS Secrets Manager
pub struct SecretsManagerResolver {
    client: SecretsManagerClient,
    secret_id: String,
}

impl SecretsManagerResolver {
    #[must_use]
    pub const fn new(client: SecretsManagerClient, secret_id: String) -> Self {
        Self { client, secret_id }
    }
}

#[async_trait]
impl SecretResolver for SecretsManagerResolver {
    async fn resolve(&self) -> SecretResult<Secrets> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(&self.secret_id)
            .send()
            .await?;

        let payload = output.secret_string().ok_or_else(|| {
            SecretError::Malformed(format!("secret {} has no string value", self.secret_id))
        })?;

        Secrets::from_json(payload)
    }
}
