//! Route definitions for the Insight Portal HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    http::Method,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(report_routes())
        .merge(admin_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Auth endpoints: login, logout, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// Reports visible to the authenticated user
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", get(handlers::reports::list_reports))
        .route("/reports/{code}", get(handlers::reports::get_report))
}

/// Admin endpoints: users, roles, groups, report catalog, audit log
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(handlers::admin::users::list_users))
        .route("/admin/users", post(handlers::admin::users::create_user))
        .route("/admin/users/{id}", get(handlers::admin::users::get_user))
        .route("/admin/users/{id}", put(handlers::admin::users::update_user))
        .route(
            "/admin/users/{id}",
            delete(handlers::admin::users::delete_user),
        )
        .route(
            "/admin/users/{id}/deactivate",
            post(handlers::admin::users::deactivate_user),
        )
        .route(
            "/admin/users/{id}/roles",
            post(handlers::admin::users::assign_role),
        )
        .route(
            "/admin/users/{id}/groups",
            post(handlers::admin::users::assign_group),
        )
        .route("/admin/roles", get(handlers::admin::roles::list_roles))
        .route("/admin/roles", post(handlers::admin::roles::create_role))
        .route("/admin/roles/{id}", get(handlers::admin::roles::get_role))
        .route("/admin/roles/{id}", put(handlers::admin::roles::update_role))
        .route(
            "/admin/roles/{id}",
            delete(handlers::admin::roles::delete_role),
        )
        .route(
            "/admin/roles/{id}/permissions",
            put(handlers::admin::roles::update_permissions),
        )
        .route(
            "/admin/roles/{id}/reports",
            post(handlers::admin::roles::assign_report),
        )
        .route(
            "/admin/roles/{id}/reports/{report_id}",
            delete(handlers::admin::roles::remove_report),
        )
        .route("/admin/groups", get(handlers::admin::groups::list_groups))
        .route("/admin/groups", post(handlers::admin::groups::create_group))
        .route("/admin/groups/{id}", get(handlers::admin::groups::get_group))
        .route(
            "/admin/groups/{id}",
            put(handlers::admin::groups::update_group),
        )
        .route(
            "/admin/groups/{id}",
            delete(handlers::admin::groups::delete_group),
        )
        .route(
            "/admin/groups/{id}/roles",
            post(handlers::admin::groups::assign_role),
        )
        .route(
            "/admin/reports",
            get(handlers::admin::reports::list_reports),
        )
        .route(
            "/admin/reports",
            post(handlers::admin::reports::create_report),
        )
        .route(
            "/admin/reports/{id}",
            get(handlers::admin::reports::get_report),
        )
        .route("/admin/audit", get(handlers::admin::audit::recent))
        .route(
            "/admin/audit/accounts/{id}",
            get(handlers::admin::audit::for_account),
        )
}

/// Health endpoint
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::HeaderValue;
    use axum::http::header;
    use tower_http::cors::Any;

    let allowed = &state.config.server.cors.allowed_origins;

    if allowed.contains(&"*".to_string()) {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed.iter().filter_map(|o| o.parse().ok()).collect();

    // Cookie auth needs credentials, which rules out wildcard responses.
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
