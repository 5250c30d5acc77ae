use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    contact_method_not_allowed, create_contact_handler, create_short_url_handler,
    health_handler, not_found_handler, redirect_handler, shorten_method_not_allowed,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route(
                "/api/shorten",
                post(create_short_url_handler).fallback(shorten_method_not_allowed),
            )
            .route(
                "/api/contact",
                post(create_contact_handler).fallback(contact_method_not_allowed),
            )
            .route("/s/{short_code}", get(redirect_handler))
            .fallback(not_found_handler)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
