//! Template library routes. Templates are listed newest first; a plan with a
//! `templates` limit of N sees only the first N of that list.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::accounts::entitlements::template_limit;
use crate::errors::AppError;
use crate::models::template::TemplateRow;
use crate::state::AppState;
use crate::templates::seed::DEFAULT_TEMPLATES;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateQuery {
    pub user_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct TemplateRequest {
    pub id: Option<i32>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub template: TemplateRow,
}

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<TemplateRow>,
}

/// GET /api/templates?userId=
pub async fn handle_list_templates(
    State(state): State<AppState>,
    Query(query): Query<TemplateQuery>,
) -> Result<Json<TemplatesResponse>, AppError> {
    let templates = all_templates(&state).await?;
    let limit = plan_template_limit(&state, query.user_id).await?;
    Ok(Json(TemplatesResponse {
        templates: apply_limit(templates, limit),
    }))
}

/// GET /api/templates/:id?userId=
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<TemplateQuery>,
) -> Result<Json<TemplateResponse>, AppError> {
    let template = sqlx::query_as::<_, TemplateRow>("SELECT * FROM templates WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Template not found".to_string()))?;

    if let Some(limit) = plan_template_limit(&state, query.user_id).await? {
        let ordered: Vec<i32> = all_templates(&state).await?.iter().map(|t| t.id).collect();
        if !within_limit(&ordered, id, limit) {
            return Err(AppError::forbidden(
                "Template not available in your current plan. Upgrade to access more templates.",
                Some("Self-Serve"),
            ));
        }
    }

    Ok(Json(TemplateResponse { template }))
}

/// POST /api/templates
pub async fn handle_create_template(
    State(state): State<AppState>,
    Json(req): Json<TemplateRequest>,
) -> Result<Json<TemplateResponse>, AppError> {
    let title = req
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Template title required".to_string()))?;
    let content = req
        .content
        .ok_or_else(|| AppError::Validation("Template content required".to_string()))?;

    let template = sqlx::query_as::<_, TemplateRow>(
        "INSERT INTO templates (title, category, content) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(title)
    .bind(req.category)
    .bind(content)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(TemplateResponse { template }))
}

/// PUT /api/templates (id in body)
pub async fn handle_update_template(
    State(state): State<AppState>,
    Json(req): Json<TemplateRequest>,
) -> Result<Json<TemplateResponse>, AppError> {
    let id = req
        .id
        .ok_or_else(|| AppError::Validation("Template id required".to_string()))?;
    update_template(&state, id, req).await
}

/// PUT /api/templates/:id
pub async fn handle_update_template_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<TemplateRequest>,
) -> Result<Json<TemplateResponse>, AppError> {
    update_template(&state, id, req).await
}

/// POST /api/init-templates
pub async fn handle_init_templates(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let mut created = 0;
    for seed in &DEFAULT_TEMPLATES {
        let result = sqlx::query(
            r#"
            INSERT INTO templates (title, category, content)
            SELECT $1, $2, $3
            WHERE NOT EXISTS (SELECT 1 FROM templates WHERE title = $1)
            "#,
        )
        .bind(seed.title)
        .bind(seed.category)
        .bind(seed.content)
        .execute(&state.db)
        .await?;
        created += result.rows_affected();
    }
    info!("Seeded {created} templates");

    Ok(Json(json!({ "message": "Templates initialized successfully" })))
}

async fn update_template(
    state: &AppState,
    id: i32,
    req: TemplateRequest,
) -> Result<Json<TemplateResponse>, AppError> {
    let template = sqlx::query_as::<_, TemplateRow>(
        r#"
        UPDATE templates
        SET title = COALESCE($2, title),
            category = COALESCE($3, category),
            content = COALESCE($4, content)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(req.title)
    .bind(req.category)
    .bind(req.content)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Template not found".to_string()))?;

    Ok(Json(TemplateResponse { template }))
}

async fn all_templates(state: &AppState) -> Result<Vec<TemplateRow>, AppError> {
    Ok(
        sqlx::query_as::<_, TemplateRow>("SELECT * FROM templates ORDER BY created_at DESC, id DESC")
            .fetch_all(&state.db)
            .await?,
    )
}

/// The user's template limit, or `None` when limits are off or no plan applies.
async fn plan_template_limit(
    state: &AppState,
    user_id: Option<i32>,
) -> Result<Option<usize>, AppError> {
    let Some(user_id) = user_id.filter(|_| state.config.enforce_plan_limits) else {
        return Ok(None);
    };
    Ok(state
        .accounts
        .plan_features(user_id)
        .await?
        .as_ref()
        .and_then(template_limit))
}

fn apply_limit<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

fn within_limit(ordered_ids: &[i32], id: i32, limit: usize) -> bool {
    ordered_ids.iter().take(limit).any(|&allowed| allowed == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_limit_keeps_newest() {
        assert_eq!(apply_limit(vec![5, 4, 3, 2, 1], Some(3)), vec![5, 4, 3]);
        assert_eq!(apply_limit(vec![5, 4], Some(3)), vec![5, 4]);
        assert_eq!(apply_limit(vec![5, 4, 3], None), vec![5, 4, 3]);
    }

    #[test]
    fn test_within_limit() {
        let ordered = [9, 7, 4, 1];
        assert!(within_limit(&ordered, 7, 2));
        assert!(!within_limit(&ordered, 4, 2));
        assert!(!within_limit(&ordered, 9, 0));
    }

    #[test]
    fn test_default_templates_have_unique_titles() {
        let mut titles: Vec<&str> = DEFAULT_TEMPLATES.iter().map(|t| t.title).collect();
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), DEFAULT_TEMPLATES.len());
    }
}
