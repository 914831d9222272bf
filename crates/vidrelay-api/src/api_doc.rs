//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vidrelay API",
        description = "Relay service: downloads a media URL via an external tool and forwards the file to a remote storage endpoint.",
        version = "0.1.0"
    ),
    paths(
        handlers::health::health_check,
        handlers::formats::list_formats,
        handlers::download::download_video,
        handlers::update::update_tool,
    ),
    components(schemas(
        ErrorResponse,
        handlers::formats::FormatsRequest,
        handlers::formats::FormatsResponse,
        handlers::download::DownloadRequestBody,
        handlers::update::UpdateResponse,
        handlers::health::HealthResponse,
        vidrelay_pipeline::FormatDescriptor,
    )),
    tags(
        (name = "relay", description = "Format probing and download-and-relay"),
        (name = "admin", description = "Health and downloader maintenance")
    )
)]
pub struct ApiDoc;
