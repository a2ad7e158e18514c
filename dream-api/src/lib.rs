use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod about;
pub mod admin;
pub mod auth;
pub mod booking;
pub mod chrome;
pub mod contact;
pub mod destinations;
pub mod error;
pub mod home;
pub mod middleware;
pub mod profile;
pub mod state;

pub use state::{AppState, AuthConfig};

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    // Routes that refuse guests outright; booking gates itself in-handler so
    // its rejection carries the sign-in prompt view.
    let protected = Router::new()
        .merge(profile::routes())
        .merge(admin::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::session_middleware,
        ));

    Router::new()
        .merge(home::routes())
        .merge(about::routes())
        .merge(destinations::routes())
        .merge(booking::routes())
        .merge(contact::routes())
        .merge(auth::routes())
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
