//! Plan feature evaluation. Pure functions over a plan's `features` JSON.

use serde_json::{json, Value};

pub const AI_AGENT: &str = "ai_agent";
pub const FILE_UPLOAD: &str = "file_upload";
pub const LIVE_CONSULTATION: &str = "live_consultation";
pub const TEMPLATES: &str = "templates";

/// A feature is enabled when its value is `true` or a number greater than zero.
pub fn feature_enabled(features: &Value, feature: &str) -> bool {
    match features.get(feature) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|v| v > 0.0).unwrap_or(false),
        _ => false,
    }
}

/// The cheapest plan that unlocks `feature`.
pub fn upgrade_plan_for(feature: &str) -> &'static str {
    match feature {
        LIVE_CONSULTATION => "Expert",
        _ => "Self-Serve",
    }
}

/// Number of templates the plan may see. `None` means no limit is configured.
pub fn template_limit(features: &Value) -> Option<usize> {
    features
        .get(TEMPLATES)
        .and_then(Value::as_u64)
        .map(|n| n as usize)
}

/// The denial message shown when `feature` is missing.
pub fn denial_message(feature: &str) -> String {
    match feature {
        AI_AGENT => "AI Agent requires Self-Serve plan or higher".to_string(),
        FILE_UPLOAD => "File upload requires Self-Serve plan or higher".to_string(),
        other => format!(
            "The {other} feature requires the {} plan or higher",
            upgrade_plan_for(other)
        ),
    }
}

/// A seeded plan: name, monthly price in cents, features.
pub struct PlanSeed {
    pub name: &'static str,
    pub price: i32,
    pub features: Value,
}

pub fn default_plans() -> Vec<PlanSeed> {
    vec![
        PlanSeed {
            name: "Free",
            price: 0,
            features: json!({
                "templates": 3, "ai_agent": false, "file_upload": false, "live_consultation": false
            }),
        },
        PlanSeed {
            name: "Self-Serve",
            price: 9900,
            features: json!({
                "templates": 20, "ai_agent": true, "file_upload": true, "live_consultation": false
            }),
        },
        PlanSeed {
            name: "Expert",
            price: 200000,
            features: json!({
                "templates": 20, "ai_agent": true, "file_upload": true,
                "live_consultation": true, "consultation_hours": 5
            }),
        },
        PlanSeed {
            name: "Premium",
            price: 500000,
            features: json!({
                "templates": 20, "ai_agent": true, "file_upload": true,
                "live_consultation": true, "consultation_hours": -1, "custom_implementation": true
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_and_positive_numbers_enable() {
        let features = json!({"ai_agent": true, "templates": 3, "consultation_hours": 5});
        assert!(feature_enabled(&features, AI_AGENT));
        assert!(feature_enabled(&features, TEMPLATES));
        assert!(feature_enabled(&features, "consultation_hours"));
    }

    #[test]
    fn test_false_zero_negative_and_missing_disable() {
        let features = json!({"file_upload": false, "templates": 0, "consultation_hours": -1});
        assert!(!feature_enabled(&features, FILE_UPLOAD));
        assert!(!feature_enabled(&features, TEMPLATES));
        assert!(!feature_enabled(&features, "consultation_hours"));
        assert!(!feature_enabled(&features, LIVE_CONSULTATION));
    }

    #[test]
    fn test_non_object_features_disable_everything() {
        assert!(!feature_enabled(&Value::Null, AI_AGENT));
        assert!(!feature_enabled(&json!("ai_agent"), AI_AGENT));
    }

    #[test]
    fn test_upgrade_hints() {
        assert_eq!(upgrade_plan_for(AI_AGENT), "Self-Serve");
        assert_eq!(upgrade_plan_for(FILE_UPLOAD), "Self-Serve");
        assert_eq!(upgrade_plan_for(LIVE_CONSULTATION), "Expert");
        assert_eq!(upgrade_plan_for("anything_else"), "Self-Serve");
    }

    #[test]
    fn test_template_limit() {
        assert_eq!(template_limit(&json!({"templates": 3})), Some(3));
        assert_eq!(template_limit(&json!({})), None);
    }

    #[test]
    fn test_default_plans_are_ordered_by_price() {
        let plans = default_plans();
        assert_eq!(plans.len(), 4);
        assert!(plans.windows(2).all(|w| w[0].price < w[1].price));
        assert!(!feature_enabled(&plans[0].features, AI_AGENT));
        assert!(feature_enabled(&plans[1].features, AI_AGENT));
    }
}
