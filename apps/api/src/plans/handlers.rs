use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::accounts::entitlements::{default_plans, feature_enabled, upgrade_plan_for};
use crate::errors::AppError;
use crate::models::plan::PlanRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub id: Option<i32>,
    pub name: Option<String>,
    /// Number or numeric string, in cents.
    pub price: Option<Value>,
    /// JSON object, or a string containing one.
    pub features: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub plan: PlanRow,
}

#[derive(Debug, Serialize)]
pub struct PlansResponse {
    pub plans: Vec<PlanRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckFeatureRequest {
    pub user_id: Option<i32>,
    pub feature: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckFeatureResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_plan: Option<String>,
}

/// GET /api/plans
pub async fn handle_list_plans(
    State(state): State<AppState>,
) -> Result<Json<PlansResponse>, AppError> {
    let plans = sqlx::query_as::<_, PlanRow>("SELECT * FROM plans ORDER BY price ASC")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(PlansResponse { plans }))
}

/// POST /api/plans
pub async fn handle_create_plan(
    State(state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    let name = req
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Plan name required".to_string()))?;
    let price = parse_price(req.price.as_ref())?.unwrap_or(0);
    let features = parse_features(req.features)?;

    let plan = sqlx::query_as::<_, PlanRow>(
        "INSERT INTO plans (name, price, features) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(name)
    .bind(price)
    .bind(features)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(PlanResponse { plan }))
}

/// PUT /api/plans
pub async fn handle_update_plan(
    State(state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    let id = req
        .id
        .ok_or_else(|| AppError::Validation("Plan id required".to_string()))?;
    let price = parse_price(req.price.as_ref())?;
    let features = parse_features(req.features)?;

    let plan = sqlx::query_as::<_, PlanRow>(
        r#"
        UPDATE plans
        SET name = COALESCE($2, name),
            price = COALESCE($3, price),
            features = $4
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(req.name)
    .bind(price)
    .bind(features)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Plan {id} not found")))?;

    Ok(Json(PlanResponse { plan }))
}

/// POST /api/init-plans
///
/// Inserts the default plans that do not exist yet. Safe to call repeatedly.
pub async fn handle_init_plans(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let mut created = 0;
    for seed in default_plans() {
        let result = sqlx::query(
            "INSERT INTO plans (name, price, features) VALUES ($1, $2, $3) ON CONFLICT (name) DO NOTHING",
        )
        .bind(seed.name)
        .bind(seed.price)
        .bind(&seed.features)
        .execute(&state.db)
        .await?;
        created += result.rows_affected();
    }
    info!("Seeded {created} plans");

    Ok(Json(json!({ "message": "Plans initialized successfully" })))
}

/// POST /api/check-feature
pub async fn handle_check_feature(
    State(state): State<AppState>,
    Json(req): Json<CheckFeatureRequest>,
) -> Result<Json<CheckFeatureResponse>, AppError> {
    let (Some(user_id), Some(feature)) = (req.user_id, req.feature) else {
        return Err(AppError::Validation(
            "userId and feature required".to_string(),
        ));
    };

    let allowed = state
        .accounts
        .plan_features(user_id)
        .await?
        .map(|features| feature_enabled(&features, &feature))
        .unwrap_or(false);

    Ok(Json(CheckFeatureResponse {
        allowed,
        upgrade_plan: (!allowed).then(|| upgrade_plan_for(&feature).to_string()),
    }))
}

fn parse_price(price: Option<&Value>) -> Result<Option<i32>, AppError> {
    let invalid = || AppError::Validation("Invalid price".to_string());
    match price {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Some)
            .ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse::<i32>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

fn parse_features(features: Option<Value>) -> Result<Value, AppError> {
    let invalid = || AppError::Validation("Invalid features format".to_string());
    match features {
        None | Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(&raw) {
            Ok(parsed @ Value::Object(_)) => Ok(parsed),
            _ => Err(invalid()),
        },
        Some(obj @ Value::Object(_)) => Ok(obj),
        Some(_) => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_accept_object_or_json_string() {
        let obj = json!({"templates": 3});
        assert_eq!(parse_features(Some(obj.clone())).unwrap(), obj);
        assert_eq!(
            parse_features(Some(json!("{\"templates\": 3}"))).unwrap(),
            obj
        );
        assert_eq!(parse_features(None).unwrap(), json!({}));
    }

    #[test]
    fn test_features_reject_garbage() {
        assert!(parse_features(Some(json!("not json"))).is_err());
        assert!(parse_features(Some(json!("[1, 2]"))).is_err());
        assert!(parse_features(Some(json!(42))).is_err());
    }

    #[test]
    fn test_price_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_price(Some(&json!(9900))).unwrap(), Some(9900));
        assert_eq!(parse_price(Some(&json!(" 200000 "))).unwrap(), Some(200000));
        assert_eq!(parse_price(None).unwrap(), None);
        assert!(parse_price(Some(&json!("free"))).is_err());
        assert!(parse_price(Some(&json!(1.5))).is_err());
    }
}
