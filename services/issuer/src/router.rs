use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use otpgate_core::health::{healthz, status};
use otpgate_core::middleware::{cors_layer, propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    dashboard::get_dashboard,
    health::readyz,
    otp::{send_otp, verify_otp},
    templates::{delete_template, upsert_template},
    tenants::{create_tenant, delete_tenant, list_tenants, update_mail_config},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/status", get(status))
        // Integration API (x-api-key)
        .route("/v1/otp/send", post(send_otp))
        .route("/v1/otp/verify", post(verify_otp))
        // Tenants (admin)
        .route("/admin/tenants", post(create_tenant))
        .route("/admin/tenants", get(list_tenants))
        .route("/admin/tenants/{tenant_id}", delete(delete_tenant))
        .route(
            "/admin/tenants/{tenant_id}/mail-config",
            put(update_mail_config),
        )
        .route("/admin/tenants/{tenant_id}/dashboard", get(get_dashboard))
        // Templates (admin)
        .route(
            "/admin/tenants/{tenant_id}/templates/{template_id}",
            put(upsert_template),
        )
        .route(
            "/admin/tenants/{tenant_id}/templates/{template_id}",
            delete(delete_template),
        )
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .layer(cors_layer())
        .with_state(state)
}
