// Router assembly: public routes, session-gated console routes, global layers
use axum::{
    middleware::from_fn,
    routing::get,
    Router,
};
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::{enforce_subscription_expiry, require_admin};

pub fn create_app() -> Router {
    Router::new()
        // Public
        .merge(public_routes())
        // Protected console (session gate)
        .merge(
            Router::new()
                .merge(dashboard_routes())
                .merge(action_routes())
                .merge(elevated_routes())
                .route_layer(from_fn(require_admin)),
        )
        // Global middleware; the expiry sweep runs before the session gate
        .layer(from_fn(enforce_subscription_expiry))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router {
    use handlers::public;

    Router::new()
        .route("/", get(public::login_get).post(public::login_post))
        .route("/logout", get(public::logout))
        .route("/health", get(public::health))
}

fn dashboard_routes() -> Router {
    use handlers::protected::dashboard;

    Router::new()
        .route(
            "/dashboard/hoa-create",
            get(dashboard::hoa_create_get).post(dashboard::hoa_create_post),
        )
        .route(
            "/dashboard/hoa-user-create",
            get(dashboard::hoa_user_create_get).post(dashboard::hoa_user_create_post),
        )
        .route("/dashboard/manage-hoa", get(dashboard::manage_hoa))
        .route("/dashboard/manage-hoa/:id/users", get(dashboard::hoa_users))
        .route(
            "/dashboard/manage-hoa/:id/edit",
            get(dashboard::hoa_edit_get).post(dashboard::hoa_edit_post),
        )
        .route("/dashboard/recycle-bin", get(dashboard::recycle_bin))
        .route(
            "/dashboard/security",
            get(dashboard::security_get).post(dashboard::security_post),
        )
}

fn action_routes() -> Router {
    use handlers::protected::actions;

    Router::new()
        // Tenant lifecycle
        .route("/toggle-hoa/:id", get(actions::toggle_hoa))
        .route(
            "/delete-hoa/:id",
            get(actions::delete_hoa_get).post(actions::delete_hoa_post),
        )
        .route("/restore-hoa/:id", get(actions::restore_hoa))
        // Tenant users
        .route("/toggle-user/:id", get(actions::toggle_user))
        .route("/delete-user/:id", get(actions::delete_user))
}

fn elevated_routes() -> Router {
    use handlers::elevated;

    Router::new().route(
        "/permanent-delete-hoa/:id",
        get(elevated::permanent_delete_get).post(elevated::permanent_delete_post),
    )
}
