// OpenAPI specification generation
//
// Covers the JSON API used by the editor page. HTML pages and liveness
// endpoints are not part of the document.

use crate::api;
use crate::api::ErrorResponse;
use nema_core::{Eat, EatFile, EatStatus, PublishRequest, PublishResponse};
use utoipa::OpenApi;

/// OpenAPI documentation for the portal API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::events::list_events,
        api::eats::get_eat,
        api::publish::publish_eat,
        api::upload::upload_file,
    ),
    components(
        schemas(
            Eat, EatFile, EatStatus,
            PublishRequest, PublishResponse,
            api::upload::UploadForm,
            ErrorResponse,
        )
    ),
    tags(
        (name = "events", description = "Recent event listing"),
        (name = "eats", description = "Emergency Advisory Text lookup and publishing"),
        (name = "files", description = "Attachment uploads")
    ),
    info(
        title = "NEMA MAR Portal API",
        version = "0.1.0",
        description = "API for publishing and retrieving Emergency Advisory Text records",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;
