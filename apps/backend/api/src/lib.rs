use axum::{Router, middleware::from_fn, routing::get};
use state::AppState;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, decompression::RequestDecompressionLayer,
    trace::TraceLayer,
};

mod middleware;
mod routes;

pub mod config;
pub mod error;
pub mod metrics;
pub mod state;

pub use middleware::session::{USER_ID_HEADER, USER_ROLE_HEADER};

pub fn construct_router(state: AppState) -> Router {
    let scratchoff = routes::scratchoff::routes()
        .nest("/settings", routes::settings::routes())
        .route_layer(from_fn(middleware::session::session_middleware));

    let router = Router::new()
        .nest("/health", routes::health::routes())
        .nest("/scratchoff", scratchoff)
        .with_state(state)
        .route("/metrics", get(crate::metrics::handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(
            ServiceBuilder::new()
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new()),
        );

    Router::new().nest("/api/v1", router)
}
