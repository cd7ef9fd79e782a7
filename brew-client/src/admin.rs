//! Admin session and menu editing payloads

use crate::error::StorageResult;
use crate::http::HttpClient;
use crate::storage::{ADMIN_TOKEN_KEY, Storage, read_json, write_json};
use crate::{ClientError, ClientResult};

/// Image attached to a menu create/update form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// MIME type, e.g. "image/png"
    pub content_type: String,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            content_type: content_type.into(),
        }
    }
}

/// Menu item fields sent as multipart. The image is required on create
/// and optional on update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuItemDraft {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    pub image: Option<ImageUpload>,
}

impl MenuItemDraft {
    pub fn new(name: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }
}

/// Admin login state, persisted across restarts
pub struct AdminSession<S: Storage> {
    storage: S,
    client: HttpClient,
}

impl<S: Storage> AdminSession<S> {
    /// Restore the session; a stored token is attached to the client
    pub fn new(storage: S, client: HttpClient) -> Self {
        let token = read_json::<String>(&storage, ADMIN_TOKEN_KEY).filter(|t| !t.is_empty());
        let mut client = client;
        client.set_token(token);
        Self { storage, client }
    }

    pub fn is_logged_in(&self) -> bool {
        self.client.token().is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.client.token()
    }

    /// POST /api/admin/login, then persist the token
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<()> {
        let response = self.client.login(email, password).await?;
        if response.token.is_empty() {
            return Err(ClientError::InvalidResponse("Missing token".to_string()));
        }

        write_json(&self.storage, ADMIN_TOKEN_KEY, &response.token)
            .map_err(|e| ClientError::Internal(e.to_string()))?;
        self.client.set_token(Some(response.token));
        tracing::info!(email = %email.trim(), "Admin logged in");
        Ok(())
    }

    pub fn logout(&mut self) -> StorageResult<()> {
        self.client.set_token(None);
        self.storage.remove(ADMIN_TOKEN_KEY)
    }

    /// Client carrying the bearer token, or `Unauthorized` when logged out
    pub fn authorized_client(&self) -> ClientResult<&HttpClient> {
        if self.is_logged_in() {
            Ok(&self.client)
        } else {
            Err(ClientError::Unauthorized)
        }
    }
}
