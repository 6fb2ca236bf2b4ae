//! OpenAPI document for the HTTP surface.

use utoipa::OpenApi;

use super::handlers::system;
use crate::error::{ErrorBody, ErrorResponse};
use crate::service::EngineStats;

/// Generated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "roulette-gateway",
        description = "Anonymous one-to-one matchmaking and WebRTC signaling relay. Clients connect over WebSocket at `/ws`."
    ),
    paths(system::health_handler, system::stats_handler),
    components(schemas(system::HealthResponse, EngineStats, ErrorResponse, ErrorBody)),
    tags((name = "System", description = "Health and matchmaking statistics"))
)]
pub struct ApiDoc;
