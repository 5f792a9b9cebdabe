//! FixLog route configuration.
//!
//! Defines all routes for the back-office API.

use axum::{
    Extension, Router,
    routing::{delete, get, post, put},
};
use fixlog_persistence::core::FixlogStorage;
use fixlog_persistence::types::CatalogKind;

use crate::handlers;
use crate::state::AppState;

/// Creates all FixLog API routes.
///
/// # Routes
///
/// ## Public
/// - `GET /health`, `GET /_liveness`, `GET /_readiness` - Health checks
/// - `POST /auth/signup` - Register a profile
///
/// ## Signed-in (`X-User-ID`)
/// - `GET|PUT /me` - Own profile
/// - `GET /dashboard` - Dashboard counts
/// - `GET|POST /clients`, `GET|PUT|DELETE /clients/{id}` - Client directory
/// - `GET|POST /records`, `GET|PUT|DELETE /records/{id}` - Service records
/// - `PUT /records/{id}/status` - Status change
/// - `GET|POST /notices`, `GET|PUT|DELETE /notices/{id}` - Notice board
/// - `GET|POST /groups`, `DELETE /groups/{id}` - Client groups
/// - `GET|POST /{catalog}`, `DELETE /{catalog}/{id}` - Service types, VAN
///   companies and equipment types
///
/// ## Administration
/// - `GET /admin/profiles`, `GET|PUT|DELETE /admin/profiles/{id}`
/// - `PUT /admin/profiles/{id}/role`, `/approve`, `/groups`
/// - `GET /admin/logs` - Activity log
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: FixlogStorage + Send + Sync + 'static,
{
    let router = Router::new()
        // Health
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<S>))
        // Account
        .route("/auth/signup", post(handlers::signup_handler::<S>))
        .route(
            "/me",
            get(handlers::me_handler::<S>).put(handlers::update_me_handler::<S>),
        )
        .route("/dashboard", get(handlers::dashboard_handler::<S>))
        // Clients
        .route(
            "/clients",
            get(handlers::list_clients_handler::<S>).post(handlers::create_client_handler::<S>),
        )
        .route(
            "/clients/{id}",
            get(handlers::read_client_handler::<S>)
                .put(handlers::update_client_handler::<S>)
                .delete(handlers::delete_client_handler::<S>),
        )
        // Service records
        .route(
            "/records",
            get(handlers::list_records_handler::<S>).post(handlers::create_record_handler::<S>),
        )
        .route(
            "/records/{id}",
            get(handlers::read_record_handler::<S>)
                .put(handlers::update_record_handler::<S>)
                .delete(handlers::delete_record_handler::<S>),
        )
        .route(
            "/records/{id}/status",
            put(handlers::change_status_handler::<S>),
        )
        // Notices
        .route(
            "/notices",
            get(handlers::list_notices_handler::<S>).post(handlers::create_notice_handler::<S>),
        )
        .route(
            "/notices/{id}",
            get(handlers::read_notice_handler::<S>)
                .put(handlers::update_notice_handler::<S>)
                .delete(handlers::delete_notice_handler::<S>),
        )
        // Client groups
        .route(
            "/groups",
            get(handlers::list_groups_handler::<S>).post(handlers::create_group_handler::<S>),
        )
        .route("/groups/{id}", delete(handlers::delete_group_handler::<S>))
        // Administration
        .route(
            "/admin/profiles",
            get(handlers::list_profiles_handler::<S>),
        )
        .route(
            "/admin/profiles/{id}",
            get(handlers::read_profile_handler::<S>)
                .put(handlers::update_profile_handler::<S>)
                .delete(handlers::delete_profile_handler::<S>),
        )
        .route(
            "/admin/profiles/{id}/role",
            put(handlers::change_role_handler::<S>),
        )
        .route(
            "/admin/profiles/{id}/approve",
            put(handlers::approve_profile_handler::<S>),
        )
        .route(
            "/admin/profiles/{id}/groups",
            put(handlers::set_groups_handler::<S>),
        )
        .route("/admin/logs", get(handlers::list_logs_handler::<S>));

    // Reference catalogs
    let router = catalog_routes(router, "/service-types", CatalogKind::ServiceType);
    let router = catalog_routes(router, "/van-companies", CatalogKind::VanCompany);
    let router = catalog_routes(router, "/equipment-types", CatalogKind::EquipmentType);

    router.with_state(state)
}

/// Mounts the list, create and delete routes for one catalog.
fn catalog_routes<S>(
    router: Router<AppState<S>>,
    path: &str,
    kind: CatalogKind,
) -> Router<AppState<S>>
where
    S: FixlogStorage + Send + Sync + 'static,
{
    router
        .route(
            path,
            get(handlers::list_catalog_handler::<S>)
                .post(handlers::create_catalog_handler::<S>)
                .layer(Extension(kind)),
        )
        .route(
            &format!("{path}/{{id}}"),
            delete(handlers::delete_catalog_handler::<S>).layer(Extension(kind)),
        )
}

/// Creates the health routes only.
///
/// Useful for probes and tests that do not touch the back-office data.
pub fn create_minimal_routes<S>(state: AppState<S>) -> Router
where
    S: FixlogStorage + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<S>))
        .with_state(state)
}
