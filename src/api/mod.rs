//! HTTP layer: route handlers, OpenAPI document, and router composition.

pub mod handlers;
pub mod openapi;

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::error::GatewayError;
use crate::ws::handler::ws_handler;

/// Builds the router with all HTTP endpoints (no WebSocket, no layers).
pub fn build_router() -> Router<AppState> {
    Router::new().merge(handlers::routes())
}

/// Builds the complete application: HTTP endpoints, `/ws`, API docs, and
/// the trace and CORS layers.
///
/// # Errors
///
/// Returns [`GatewayError::Config`] if an allowed origin is not a valid
/// header value.
pub fn build_app(state: AppState, allowed_origins: &[String]) -> Result<Router, GatewayError> {
    let router = build_router().route("/ws", get(ws_handler));

    Ok(with_docs(router)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins)?)
        .with_state(state))
}

/// Builds the CORS policy.
///
/// An empty list allows any origin. Otherwise only the listed origins may
/// call `GET`/`POST`, with credentials.
///
/// # Errors
///
/// Returns [`GatewayError::Config`] if an origin is not a valid header value.
pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, GatewayError> {
    if allowed_origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| GatewayError::Config(format!("CORS origin `{origin}`: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_credentials(true))
}

#[cfg(feature = "swagger-ui")]
fn with_docs(router: Router<AppState>) -> Router<AppState> {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    router.merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
    )
}

#[cfg(not(feature = "swagger-ui"))]
fn with_docs(router: Router<AppState>) -> Router<AppState> {
    router.route("/api-docs/openapi.json", get(openapi_json))
}

#[cfg(not(feature = "swagger-ui"))]
async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;

    axum::Json(openapi::ApiDoc::openapi())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_origin_list_is_permissive() {
        assert!(cors_layer(&[]).is_ok());
    }

    #[test]
    fn explicit_origins_are_accepted() {
        let origins = vec![
            "https://chat.example.com".to_string(),
            "http://localhost:5173".to_string(),
        ];
        assert!(cors_layer(&origins).is_ok());
    }

    #[test]
    fn invalid_origin_is_a_config_error() {
        let origins = vec!["https://bad\norigin".to_string()];
        assert!(matches!(cors_layer(&origins), Err(GatewayError::Config(_))));
    }
}
