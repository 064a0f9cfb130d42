//! Client for the `/fetch` and `/upload` endpoints

use async_trait::async_trait;
use jotnook_types::{ErrorResponse, NoteRecord, SaveNoteRequest};
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    Client, Response, Url,
};

use crate::error::{ApiError, ApiResult};

/// Remote operations the view depends on
#[async_trait]
pub trait NotesApi: Send + Sync {
    /// Fetches every stored note
    async fn fetch_notes(&self) -> ApiResult<Vec<NoteRecord>>;

    /// Submits a new note
    async fn save_note(&self, request: &SaveNoteRequest) -> ApiResult<()>;
}

/// [`NotesApi`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpNotesApi {
    client: Client,
    fetch_url: Url,
    upload_url: Url,
}

impl HttpNotesApi {
    /// Creates a client for endpoints mounted under `base_url`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidBaseUrl` if `base_url` is not an absolute URL
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Same as [`HttpNotesApi::new`] with a preconfigured client
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidBaseUrl` if `base_url` is not an absolute URL
    pub fn with_client(client: Client, base_url: &str) -> ApiResult<Self> {
        // `Url::join` replaces the last segment unless the base ends with a slash
        let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        let join = |path: &str| {
            base.join(path)
                .map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))
        };

        Ok(Self {
            client,
            fetch_url: join("fetch")?,
            upload_url: join("upload")?,
        })
    }

    #[must_use]
    pub const fn fetch_url(&self) -> &Url {
        &self.fetch_url
    }

    #[must_use]
    pub const fn upload_url(&self) -> &Url {
        &self.upload_url
    }
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|error| error.message)
        .unwrap_or(body);

    ApiError::Status { status, message }
}

#[async_trait]
impl NotesApi for HttpNotesApi {
    async fn fetch_notes(&self) -> ApiResult<Vec<NoteRecord>> {
        let response = self
            .client
            .get(self.fetch_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response.json().await?)
    }

    async fn save_note(&self, request: &SaveNoteRequest) -> ApiResult<()> {
        let response = self
            .client
            .post(self.upload_url.clone())
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }
}
