//! HTTP client for the Velvet Brew REST API

use crate::admin::MenuItemDraft;
use crate::menu::resolve_image_url;
use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared::ApiResponse;
use shared::models::{LoginRequest, LoginResponse, MenuItem};
use shared::order::{Order, OrderPayload, TrackQuery, TrackedOrder};

/// HTTP client for the storefront and admin endpoints
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(t) => request.bearer_auth(t),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorized(self.client.get(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let request = self.authorized(self.client.post(self.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorized(self.client.delete(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn send_multipart<T: DeserializeOwned>(&self, request: RequestBuilder, form: Form) -> ClientResult<T> {
        let response = self.authorized(request.multipart(form)).send().await?;
        Self::handle_response(response).await
    }

    /// Map non-2xx statuses to typed errors, using the body's `message` when present
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or(text);
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(message)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
                StatusCode::CONFLICT => Err(ClientError::Conflict(message)),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY | StatusCode::PAYLOAD_TOO_LARGE => {
                    Err(ClientError::Validation(message))
                }
                _ => Err(ClientError::Internal(message)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    /// `success: false` on a 2xx response is still a failure
    fn ensure_success<T>(body: ApiResponse<T>, fallback: &str) -> ClientResult<ApiResponse<T>> {
        if body.success {
            Ok(body)
        } else {
            Err(ClientError::Rejected(
                body.message.unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }

    /// Absolute URL for a menu image path
    pub fn image_url(&self, image: &str) -> String {
        resolve_image_url(&self.base_url, image)
    }

    // ========== Menu API ==========

    /// GET /api/menu
    pub async fn menu(&self) -> ClientResult<Vec<MenuItem>> {
        let body = self.get::<ApiResponse<Vec<MenuItem>>>("/api/menu").await?;
        Self::ensure_success(body, "Failed to load menu")?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing menu data".to_string()))
    }

    /// POST /api/menu (admin)
    pub async fn create_menu_item(&self, draft: &MenuItemDraft) -> ClientResult<Option<String>> {
        let form = Self::menu_form(draft)?;
        let body: ApiResponse<serde_json::Value> =
            self.send_multipart(self.client.post(self.url("/api/menu")), form).await?;
        Ok(Self::ensure_success(body, "Failed to create menu item")?.message)
    }

    /// PUT /api/menu/:id (admin)
    pub async fn update_menu_item(&self, id: &str, draft: &MenuItemDraft) -> ClientResult<Option<String>> {
        let form = Self::menu_form(draft)?;
        let url = self.url(&format!("/api/menu/{id}"));
        let body: ApiResponse<serde_json::Value> = self.send_multipart(self.client.put(url), form).await?;
        Ok(Self::ensure_success(body, "Failed to update menu item")?.message)
    }

    /// DELETE /api/menu/:id (admin)
    pub async fn delete_menu_item(&self, id: &str) -> ClientResult<Option<String>> {
        let body: ApiResponse<serde_json::Value> = self.delete(&format!("/api/menu/{id}")).await?;
        Ok(Self::ensure_success(body, "Failed to delete menu item")?.message)
    }

    fn menu_form(draft: &MenuItemDraft) -> ClientResult<Form> {
        let mut form = Form::new()
            .text("name", draft.name.clone())
            .text("price", draft.price.to_string())
            .text("category", draft.category.clone())
            .text("description", draft.description.clone());

        if let Some(image) = &draft.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)?;
            form = form.part("image", part);
        }
        Ok(form)
    }

    // ========== Order API ==========

    /// POST /api/orders
    pub async fn submit_order(&self, payload: &OrderPayload) -> ClientResult<Option<String>> {
        let body: ApiResponse<serde_json::Value> = self.post("/api/orders", payload).await?;
        Ok(Self::ensure_success(body, "Failed to place order")?.message)
    }

    /// GET /api/orders (admin)
    pub async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        let body = self.get::<ApiResponse<Vec<Order>>>("/api/orders").await?;
        Self::ensure_success(body, "Failed to load orders")?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing order data".to_string()))
    }

    /// GET /api/orders/track?orderId=..&phone=..
    pub async fn track_order(&self, query: &TrackQuery) -> ClientResult<TrackedOrder> {
        let request = self.client.get(self.url("/api/orders/track")).query(query);
        let response = request.send().await?;
        let body: ApiResponse<TrackedOrder> = Self::handle_response(response).await?;
        Self::ensure_success(body, "Order not found")?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing order data".to_string()))
    }

    // ========== Admin API ==========

    /// POST /api/admin/login
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.post("/api/admin/login", &request).await
    }
}
