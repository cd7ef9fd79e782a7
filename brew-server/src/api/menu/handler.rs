//! Menu API Handlers

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use shared::models::MenuItem;

use super::upload::{ImageField, store_image};
use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::db::repository::menu::{self, MenuItemCreate, MenuItemUpdate};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, parse_price, validate_optional_text, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// Parsed multipart menu form
#[derive(Debug, Default)]
struct MenuForm {
    name: Option<String>,
    price: Option<String>,
    category: Option<String>,
    description: Option<String>,
    image: Option<ImageField>,
}

/// Validated text fields of a menu form
struct MenuFields {
    name: String,
    price: f64,
    category: String,
    description: String,
}

impl MenuForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = MenuForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "image" => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
                        .to_vec();
                    // Browsers send an empty part when no file was picked
                    if !data.is_empty() || file_name.as_deref().is_some_and(|n| !n.is_empty()) {
                        form.image = Some(ImageField {
                            file_name,
                            content_type,
                            data,
                        });
                    }
                }
                "name" | "price" | "category" | "description" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
                    let slot = match name.as_str() {
                        "name" => &mut form.name,
                        "price" => &mut form.price,
                        "category" => &mut form.category,
                        _ => &mut form.description,
                    };
                    *slot = Some(text);
                }
                other => tracing::debug!(field = other, "Ignoring unknown menu form field"),
            }
        }

        Ok(form)
    }

    fn fields(&mut self) -> AppResult<MenuFields> {
        let name = self.name.take().unwrap_or_default();
        let category = self.category.take().unwrap_or_default();
        let price = self.price.take().unwrap_or_default();
        let description = self.description.take();

        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        if price.trim().is_empty() {
            return Err(AppError::required_field("price"));
        }
        let price = parse_price(&price)?;
        validate_required_text(&category, "category", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&description, "description", MAX_NOTE_LEN)?;

        Ok(MenuFields {
            name: name.trim().to_string(),
            price,
            category: category.trim().to_string(),
            description: description.map(|d| d.trim().to_string()).unwrap_or_default(),
        })
    }
}

/// GET /api/menu - 获取菜单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<MenuItem>>>> {
    let items = menu::find_all(state.pool()).await?;
    Ok(Json(ApiResponse::success(items)))
}

/// POST /api/menu - 新建菜品 (必须带图片)
pub async fn create(
    State(state): State<ServerState>,
    Extension(admin): Extension<CurrentAdmin>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<MenuItem>>)> {
    let mut form = MenuForm::read(multipart).await?;
    let fields = form.fields()?;
    let image = form
        .image
        .take()
        .ok_or_else(|| AppError::with_message(ErrorCode::NoFileProvided, "Image is required"))?;

    let image = store_image(state.uploads_dir(), image, state.config.max_upload_bytes).await?;
    let item = menu::create(
        state.pool(),
        MenuItemCreate {
            name: fields.name,
            price: fields.price,
            category: fields.category,
            description: fields.description,
            image,
        },
    )
    .await?;

    tracing::info!(id = %item.id, name = %item.name, admin = %admin.email, "Menu item created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message("Menu item created", item)),
    ))
}

/// PUT /api/menu/{id} - 更新菜品 (图片可选)
pub async fn update(
    State(state): State<ServerState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    if menu::find_by_id(state.pool(), &id).await?.is_none() {
        return Err(AppError::new(ErrorCode::MenuItemNotFound));
    }

    let mut form = MenuForm::read(multipart).await?;
    let fields = form.fields()?;
    let image = match form.image.take() {
        Some(field) => Some(store_image(state.uploads_dir(), field, state.config.max_upload_bytes).await?),
        None => None,
    };

    let item = menu::update(
        state.pool(),
        &id,
        MenuItemUpdate {
            name: fields.name,
            price: fields.price,
            category: fields.category,
            description: fields.description,
            image,
        },
    )
    .await?;

    tracing::info!(id = %item.id, admin = %admin.email, "Menu item updated");
    Ok(Json(ApiResponse::success_with_message("Menu item updated", item)))
}

/// DELETE /api/menu/{id} - 删除菜品
///
/// 图片文件保留, 相同内容的图片可能被其他菜品引用
pub async fn delete(
    State(state): State<ServerState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !menu::delete(state.pool(), &id).await? {
        return Err(AppError::new(ErrorCode::MenuItemNotFound));
    }

    tracing::info!(id = %id, admin = %admin.email, "Menu item deleted");
    Ok(Json(ApiResponse::ok("Menu item deleted")))
}
