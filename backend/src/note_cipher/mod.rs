//! Note text encryption backed by AWS KMS
//!
//! The ciphertext blob returned by `Encrypt` is stored verbatim. It embeds the
//! key it was produced with, so `Decrypt` needs no key id.
mod error;

use async_trait::async_trait;
use aws_sdk_kms::{primitives::Blob, Client as KmsClient};

pub use error::{CipherError, CipherResult};

/// Largest plaintext KMS `Encrypt` accepts, in bytes
pub const MAX_PLAINTEXT_BYTES: usize = 4096;

/// Encrypts and decrypts note text
#[async_trait]
pub trait NoteCipher: Send + Sync {
    /// Encrypts `plaintext` under `key_id`, returning an opaque ciphertext blob
    ///
    /// # Errors
    ///
    /// Returns a `CipherError` if the key service rejects or fails the request
    async fn encrypt(&self, key_id: &str, plaintext: &[u8]) -> CipherResult<Vec<u8>>;

    /// Decrypts a ciphertext blob produced by [`NoteCipher::encrypt`]
    ///
    /// # Errors
    ///
    /// Returns a `CipherError` if the blob cannot be decrypted
    async fn decrypt(&self, ciphertext: &[u8]) -> CipherResult<Vec<u8>>;
}

/// Cipher delegating to AWS KMS symmetric keys
#[derive(Clone, Debug)]
pub struct KmsNoteCipher {
    kms_client: KmsClient,
}

impl KmsNoteCipher {
    #[must_use]
    pub const fn new(kms_client: KmsClient) -> Self {
        Self { kms_client }
    }
}

#[async_trait]
impl NoteCipher for KmsNoteCipher {
    async fn encrypt(&self, key_id: &str, plaintext: &[u8]) -> CipherResult<Vec<u8>> {
        let result = self
            .kms_client
            .encrypt()
            .key_id(key_id)
            .plaintext(Blob::new(plaintext))
            .send()
            .await?;

        result.ciphertext_blob().map_or_else(
            || Err(CipherError::EmptyResponse("ciphertext")),
            |blob| Ok(blob.as_ref().to_vec()),
        )
    }

    async fn decrypt(&self, ciphertext: &[u8]) -> CipherResult<Vec<u8>> {
        let result = self
            .kms_client
            .decrypt()
            .ciphertext_blob(Blob::new(ciphertext))
            .send()
            .await?;

        result.plaintext().map_or_else(
            || Err(CipherError::EmptyResponse("plaintext")),
            |blob| Ok(blob.as_ref().to_vec()),
        )
    }
}
