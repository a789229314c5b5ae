use std::{path::Path, sync::Arc};

use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    AppState,
    errors::{AppError, AppResult},
    models::{ApiResponse, Book, CreateBookRequest, Pagination, SearchData, SearchParams},
};

/// Health check endpoint.
#[must_use]
#[allow(clippy::unused_async)]
pub async fn health_check() -> &'static str {
    "OK"
}

/// Create a book from a multipart form: `title`, `author`, `publisher` and an
/// `image` file part whose filename supplies the stored extension.
///
/// # Errors
/// Returns validation errors for missing fields or length violations, and
/// I/O errors if persisting the image fails.
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<Book>>)> {
    let mut title = None;
    let mut author = None;
    let mut publisher = None;
    let mut image: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Anyhow(e.into()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                title = Some(field.text().await.map_err(|e| AppError::Anyhow(e.into()))?);
            }
            "author" => {
                author = Some(field.text().await.map_err(|e| AppError::Anyhow(e.into()))?);
            }
            "publisher" => {
                publisher = Some(field.text().await.map_err(|e| AppError::Anyhow(e.into()))?);
            }
            "image" => {
                let file_name = field.file_name().unwrap_or("upload.bin").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Anyhow(e.into()))?;
                image = Some((file_name, data));
            }
            _ => {}
        }
    }

    let payload = CreateBookRequest {
        title: title.ok_or(AppError::MissingField("title"))?,
        author: author.ok_or(AppError::MissingField("author"))?,
        publisher: publisher.ok_or(AppError::MissingField("publisher"))?,
    };
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (file_name, data) = image.ok_or(AppError::MissingField("image"))?;
    if (data.len() as u64) > state.config.max_upload_bytes {
        return Err(AppError::Validation("file too large".into()));
    }

    let ext = extension_of(&file_name);
    let book = state
        .store
        .create(payload.title, payload.author, payload.publisher, &data, &ext)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(book))))
}

/// Search books by title, author or publisher with pagination.
///
/// # Errors
/// Returns validation errors for query length or pagination range violations.
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<ApiResponse<SearchData>>> {
    params
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (books, total) = state
        .store
        .search(&params.query, params.page, params.page_size)
        .await;

    let pagination = Pagination {
        page: params.page,
        page_size: params.page_size,
        total,
        total_pages: total.div_ceil(params.page_size),
    };

    Ok(Json(ApiResponse::ok(SearchData { books, pagination })))
}

/// Extension of an uploaded filename including the leading dot, or empty when
/// the filename has none.
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::extension_of;

    #[test]
    fn extension_includes_dot() {
        assert_eq!(extension_of("cover.png"), ".png");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
    }

    #[test]
    fn missing_extension_is_empty() {
        assert_eq!(extension_of("cover"), "");
        assert_eq!(extension_of(""), "");
    }
}
