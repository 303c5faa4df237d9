//! Route table. Everything is mounted under `/api`; `/` and `/health` stay at
//! the root for load balancers.

use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::handlers::{admin, health::health, protected, public};
use crate::middleware::{require_admin, require_auth};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes(state.clone()));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", api)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors(&state.config)),
        )
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(public::auth::register))
        .route("/auth/login", post(public::auth::login))
        .route("/portfolio", get(public::portfolio::list))
        .route("/portfolio/featured", get(public::portfolio::featured))
        .route("/portfolio/categories", get(public::portfolio::categories))
        .route("/portfolio/category/:category", get(public::portfolio::by_category))
        .route("/portfolio/:id", get(public::portfolio::get))
        .route("/blog", get(public::blog::list))
        .route("/blog/:slug", get(public::blog::get_by_slug))
        .route("/contact", post(public::contact::submit))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{auth, dashboard, favorites, messages, orders, projects};

    Router::new()
        .route(
            "/auth/profile",
            get(auth::profile).patch(auth::update_profile).put(auth::update_profile),
        )
        .route("/auth/refresh", post(auth::refresh))
        .route("/user/dashboard", get(dashboard::dashboard))
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/:id",
            get(projects::get)
                .put(projects::update)
                .patch(projects::update)
                .delete(projects::delete),
        )
        .route("/orders", get(orders::list).post(orders::create))
        .route("/orders/:id", get(orders::get).delete(orders::delete))
        .route(
            "/orders/:id/status",
            put(orders::update_status).patch(orders::update_status),
        )
        .route("/messages", get(messages::list).post(messages::create))
        .route("/messages/unread-count", get(messages::unread_count))
        .route("/messages/:id", get(messages::get).delete(messages::delete))
        .route(
            "/messages/:id/read",
            put(messages::mark_read).patch(messages::mark_read),
        )
        .route("/favorites", get(favorites::list).post(favorites::add))
        .route("/favorites/check/:projectId", get(favorites::check))
        .route("/favorites/:projectId", axum::routing::delete(favorites::remove))
        .nest("/admin", admin_routes())
        .route_layer(from_fn_with_state(state, require_auth))
}

fn admin_routes() -> Router<AppState> {
    use admin::{blog, contacts, dashboard, messages, orders, portfolio, projects, settings, users};

    Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        // users
        .route("/users", get(users::list))
        .route("/users/stats", get(users::stats))
        .route("/users/:id/role", put(users::update_role).patch(users::update_role))
        .route("/users/:id/ban", put(users::ban).patch(users::ban))
        .route("/users/:id/unban", put(users::unban).patch(users::unban))
        // client projects
        .route("/projects", get(projects::list))
        .route("/projects/stats", get(projects::stats))
        .route(
            "/projects/:id/status",
            put(projects::update_status).patch(projects::update_status),
        )
        // orders
        .route("/orders", get(orders::list))
        .route("/orders/stats", get(orders::stats))
        // messages
        .route("/messages", get(messages::list))
        .route("/messages/send", post(messages::send))
        .route("/messages/stats", get(messages::stats))
        // settings
        .route(
            "/settings",
            get(settings::list).put(settings::update_many).patch(settings::update_many),
        )
        .route("/settings/object", get(settings::object))
        .route("/settings/:key", put(settings::update).patch(settings::update))
        // blog
        .route("/blog", get(blog::list).post(blog::create))
        .route("/blog/published", get(blog::published))
        .route("/blog/stats", get(blog::stats))
        .route("/blog/slug/:slug", get(blog::get_by_slug))
        .route(
            "/blog/:id",
            get(blog::get).put(blog::update).patch(blog::update).delete(blog::delete),
        )
        // contact submissions
        .route("/contacts", get(contacts::list))
        .route("/contacts/statistics", get(contacts::statistics))
        .route(
            "/contacts/:id",
            get(contacts::get)
                .put(contacts::update)
                .patch(contacts::update)
                .delete(contacts::delete),
        )
        .route("/contacts/:id/reply", put(contacts::reply).patch(contacts::reply))
        .route("/contacts/:id/read", put(contacts::mark_read).patch(contacts::mark_read))
        // portfolio
        .route("/portfolio", get(portfolio::list).post(portfolio::create))
        .route(
            "/portfolio/:id",
            put(portfolio::update)
                .patch(portfolio::update)
                .delete(portfolio::delete),
        )
        .route_layer(from_fn(require_admin))
}

fn cors(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Artika Graphics API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "health": "/health, /api/health (public)",
                "auth": "/api/auth/register, /api/auth/login (public); /api/auth/profile, /api/auth/refresh (token)",
                "public": "/api/portfolio, /api/blog, /api/contact",
                "client": "/api/projects, /api/orders, /api/messages, /api/favorites, /api/user/dashboard (token)",
                "admin": "/api/admin/* (admin token)"
            }
        }
    }))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
