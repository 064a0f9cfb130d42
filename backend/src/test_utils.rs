use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    note_cipher::{CipherError, CipherResult, NoteCipher},
    note_storage::{ObjectStore, StorageError, StorageResult},
    secrets::{SecretError, SecretResolver, SecretResult, Secrets},
};

/// An object held by [`InMemoryObjectStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Object store keeping everything in a sorted map, so listings are lexicographic
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<BTreeMap<(String, String), StoredObject>>,
    failing_put_suffix: Mutex<Option<String>>,
    fail_listing: Mutex<bool>,
}

impl InMemoryObjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an object directly, bypassing the handlers
    pub async fn insert(&self, bucket: &str, key: &str, body: Vec<u8>) {
        self.objects.lock().await.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: mime::APPLICATION_OCTET_STREAM.to_string(),
            },
        );
    }

    pub async fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// All keys of `bucket`, sorted
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, key)| key.clone())
            .collect()
    }

    /// Makes every write to a key ending in `suffix` fail
    pub async fn fail_puts_ending_with(&self, suffix: &str) {
        *self.failing_put_suffix.lock().await = Some(suffix.to_string());
    }

    /// Makes every listing call fail
    pub async fn fail_listing(&self) {
        *self.fail_listing.lock().await = true;
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn list_keys(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<String>> {
        if *self.fail_listing.lock().await {
            return Err(StorageError::Upstream("listing unavailable".to_string()));
        }

        Ok(self
            .keys(bucket)
            .await
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        self.object(bucket, key)
            .await
            .map(|object| object.body)
            .ok_or_else(|| StorageError::Service(format!("NoSuchKey: {key}")))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        if let Some(suffix) = self.failing_put_suffix.lock().await.as_deref() {
            if key.ends_with(suffix) {
                return Err(StorageError::Service(format!("write to {key} rejected")));
            }
        }

        self.objects.lock().await.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}

const FAKE_CIPHER_MAGIC: &[u8] = b"FAKEKMS1";

/// Reversible cipher that tags its output, so foreign bytes fail to decrypt
///
/// Blob layout: magic, key id length (u16 BE), key id, plaintext.
#[derive(Debug, Default)]
pub struct FakeCipher {
    decrypt_calls: AtomicUsize,
    fail_encrypt: bool,
}

impl FakeCipher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cipher whose encrypt operation always fails
    #[must_use]
    pub fn failing_encrypt() -> Self {
        Self {
            fail_encrypt: true,
            ..Self::default()
        }
    }

    pub fn decrypt_calls(&self) -> usize {
        self.decrypt_calls.load(Ordering::SeqCst)
    }

    /// Key id a blob was encrypted under
    #[must_use]
    pub fn key_id_of(ciphertext: &[u8]) -> Option<String> {
        let rest = ciphertext.strip_prefix(FAKE_CIPHER_MAGIC)?;
        let (len, rest) = rest.split_first_chunk::<2>()?;
        let key_id = rest.get(..usize::from(u16::from_be_bytes(*len)))?;
        String::from_utf8(key_id.to_vec()).ok()
    }
}

#[async_trait]
impl NoteCipher for FakeCipher {
    async fn encrypt(&self, key_id: &str, plaintext: &[u8]) -> CipherResult<Vec<u8>> {
        if self.fail_encrypt {
            return Err(CipherError::Service("NotFoundException".to_string()));
        }

        let key_len = u16::try_from(key_id.len())
            .map_err(|_| CipherError::Service("key id too long".to_string()))?;

        let mut blob = FAKE_CIPHER_MAGIC.to_vec();
        blob.extend_from_slice(&key_len.to_be_bytes());
        blob.extend_from_slice(key_id.as_bytes());
        blob.extend_from_slice(plaintext);
        Ok(blob)
    }

    async fn decrypt(&self, ciphertext: &[u8]) -> CipherResult<Vec<u8>> {
        self.decrypt_calls.fetch_add(1, Ordering::SeqCst);

        let invalid = || CipherError::Service("InvalidCiphertextException".to_string());
        let rest = ciphertext.strip_prefix(FAKE_CIPHER_MAGIC).ok_or_else(invalid)?;
        let (len, rest) = rest.split_first_chunk::<2>().ok_or_else(invalid)?;
        let plaintext = rest
            .get(usize::from(u16::from_be_bytes(*len))..)
            .ok_or_else(invalid)?;

        Ok(plaintext.to_vec())
    }
}

/// Resolver returning a fixed bundle, or failing every time
#[derive(Debug, Clone)]
pub struct StaticSecretResolver {
    secrets: Option<Secrets>,
}

impl StaticSecretResolver {
    #[must_use]
    pub fn new(bucket: &str, key_id: &str) -> Self {
        Self {
            secrets: Some(Secrets {
                bucket: bucket.to_string(),
                key_id: key_id.to_string(),
                extra: std::collections::HashMap::new(),
            }),
        }
    }

    /// Resolver behaving like an unreachable secret store
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { secrets: None }
    }
}

#[async_trait]
impl SecretResolver for StaticSecretResolver {
    async fn resolve(&self) -> SecretResult<Secrets> {
        self.secrets.clone().ok_or_else(|| {
            SecretError::Unavailable("ResourceNotFoundException: jotnook-secrets".to_string())
        })
    }
}
