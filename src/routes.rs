use axum::{
    routing::{get, post},
    Router,
};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::handlers;

// Embed the default stylesheet in the binary
const DEFAULT_STYLESHEET: &str = include_str!("../static/styles.css");

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard::dashboard_get))
        .route("/refresh", post(handlers::dashboard::refresh_post))
        .route("/create/open", post(handlers::dashboard::create_open_post))
        .route("/create", post(handlers::dashboard::create_post))
        .route("/amis/refresh", post(handlers::dashboard::amis_refresh_post))
        .route("/close", post(handlers::dashboard::close_post))
        .route("/instance/:instance_id", post(handlers::instances::instance_open_post))
        .route("/instance/:instance_id/:action", post(handlers::instances::instance_action_post))
        .route("/terminate/confirm", post(handlers::instances::terminate_confirm_post))
        .route(
            "/static/styles.css",
            get(|| async { ([(CONTENT_TYPE, "text/css")], DEFAULT_STYLESHEET) }),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::if_not_present(
                    CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                )),
        )
        .with_state(state)
}
