use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::accounts::entitlements::FILE_UPLOAD;
use crate::errors::AppError;
use crate::models::upload::UploadedFileRow;
use crate::state::AppState;
use crate::uploads::extract::extract_text;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadQuery {
    pub user_id: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileSummary {
    pub filename: String,
    pub content_extracted: bool,
    pub size: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file: UploadedFileSummary,
}

#[derive(Debug, Serialize)]
pub struct FileContextResponse {
    pub context: String,
}

/// POST /api/uploads?userId=
///
/// Multipart upload with a single `file` field. Text is extracted best effort
/// and stored with the file when a `userId` is given.
pub async fn handle_upload(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    if let (true, Some(user_id)) = (state.config.enforce_plan_limits, query.user_id) {
        state.accounts.require_feature(user_id, FILE_UPLOAD).await?;
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("unknown").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;
        let size = data.len();
        info!("Processing upload {filename} ({size} bytes)");

        let content = extract_text(&filename, data).await;

        if let Some(user_id) = query.user_id {
            sqlx::query("INSERT INTO uploaded_files (user_id, filename, content) VALUES ($1, $2, $3)")
                .bind(user_id)
                .bind(&filename)
                .bind(&content)
                .execute(&state.db)
                .await?;
            info!("Saved upload {filename} for user {user_id}");
        }

        return Ok(Json(UploadResponse {
            file: UploadedFileSummary {
                filename,
                content_extracted: !content.is_empty(),
                size,
            },
        }));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

/// GET /api/uploads?userId=
///
/// Lists uploaded filenames, for one user or for everyone when no `userId` is given.
pub async fn handle_list_uploads(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
) -> Result<Json<Value>, AppError> {
    let files: Vec<UploadedFileRow> = match query.user_id {
        Some(user_id) => {
            if state.config.enforce_plan_limits {
                state.accounts.require_feature(user_id, FILE_UPLOAD).await?;
            }
            sqlx::query_as("SELECT * FROM uploaded_files WHERE user_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(&state.db)
                .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM uploaded_files ORDER BY id")
                .fetch_all(&state.db)
                .await?
        }
    };

    let names: Vec<String> = files.into_iter().map(|f| f.filename).collect();
    Ok(Json(json!({ "files": names })))
}

/// GET /api/uploads/context?userId=
///
/// Concatenated text of the user's uploads, for use as chat context.
/// Always requires the `file_upload` plan feature.
pub async fn handle_file_context(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
) -> Result<Json<FileContextResponse>, AppError> {
    let user_id = query
        .user_id
        .ok_or_else(|| AppError::Validation("userId required".to_string()))?;

    state.accounts.require_feature(user_id, FILE_UPLOAD).await?;
    let context = state.accounts.file_context(user_id).await?;

    Ok(Json(FileContextResponse { context }))
}
