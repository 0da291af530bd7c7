pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::plans::handlers as plans;
use crate::state::AppState;
use crate::templates::handlers as templates;
use crate::uploads::extract::MAX_UPLOAD_BYTES;
use crate::uploads::handlers as uploads;
use crate::users::handlers as users;
use crate::workflow::handlers as chat;

/// Headroom for multipart framing on top of the file size limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Chat engine
        .route("/api/chat", post(chat::handle_chat))
        .route(
            "/api/debug/conversations",
            get(chat::handle_list_conversations).delete(chat::handle_clear_conversations),
        )
        .route(
            "/api/debug/conversations/:id",
            get(chat::handle_get_conversation),
        )
        // Accounts & plans
        .route(
            "/api/users",
            get(users::handle_get_user)
                .post(users::handle_create_user)
                .put(users::handle_update_user),
        )
        .route(
            "/api/plans",
            get(plans::handle_list_plans)
                .post(plans::handle_create_plan)
                .put(plans::handle_update_plan),
        )
        .route("/api/init-plans", post(plans::handle_init_plans))
        .route("/api/check-feature", post(plans::handle_check_feature))
        // Template library
        .route(
            "/api/templates",
            get(templates::handle_list_templates)
                .post(templates::handle_create_template)
                .put(templates::handle_update_template),
        )
        .route(
            "/api/templates/:id",
            get(templates::handle_get_template).put(templates::handle_update_template_by_id),
        )
        .route("/api/init-templates", post(templates::handle_init_templates))
        // Uploads
        .route(
            "/api/uploads",
            post(uploads::handle_upload)
                .get(uploads::handle_list_uploads)
                .layer(DefaultBodyLimit::max(
                    MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES,
                )),
        )
        .route("/api/uploads/context", get(uploads::handle_file_context))
        .with_state(state)
}
