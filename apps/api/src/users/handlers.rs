use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserLookup {
    pub email: Option<String>,
    pub id: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub company: Option<String>,
    pub plan_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserRow,
}

/// POST /api/users
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let email = req
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Email required".to_string()))?;

    let user = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (email, name, company) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(email.trim())
    .bind(req.name)
    .bind(req.company)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(UserResponse { user }))
}

/// GET /api/users?email= | ?id=
pub async fn handle_get_user(
    State(state): State<AppState>,
    Query(lookup): Query<UserLookup>,
) -> Result<Json<UserResponse>, AppError> {
    let user = match (lookup.email, lookup.id) {
        (Some(email), _) => {
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&state.db)
                .await?
        }
        (None, Some(id)) => {
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&state.db)
                .await?
        }
        (None, None) => None,
    };

    let user = user.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(UserResponse { user }))
}

/// PUT /api/users
///
/// Updates profile fields and plan assignment. Omitted fields keep their value.
pub async fn handle_update_user(
    State(state): State<AppState>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let id = req
        .id
        .ok_or_else(|| AppError::Validation("User id required".to_string()))?;

    let user = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            company = COALESCE($3, company),
            plan_id = COALESCE($4, plan_id)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(req.name)
    .bind(req.company)
    .bind(req.plan_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

    Ok(Json(UserResponse { user }))
}
