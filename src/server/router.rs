// 路由

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;

use super::handlers;
use super::state::AppState;

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// 构建应用路由
pub fn build_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.server));

    Router::new()
        .route("/crear-directorio", post(handlers::create_directory))
        .route(
            "/subir-archivo",
            // 上传不限制大小
            post(handlers::upload_file).layer(DefaultBodyLimit::disable()),
        )
        .route("/listar-directorios", get(handlers::list_directories))
        .route("/listar-archivos/:directorio", get(handlers::list_files))
        .route(
            "/eliminar-archivo/:directorio/:archivo",
            delete(handlers::delete_file),
        )
        .route("/health", get(handlers::health_check))
        .with_state(state)
        .layer(middleware)
}
