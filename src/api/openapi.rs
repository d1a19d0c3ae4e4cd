use super::handlers::{health, login, view};
use utoipa::{openapi::OpenApi as Document, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(view::view, login::login, login::logout, health::health),
    components(schemas(health::Health)),
    tags(
        (name = "session", description = "Cookie session view, login and logout"),
        (name = "health", description = "Service status")
    )
)]
struct ApiDoc;

/// `OpenAPI` document for every routed endpoint, with Cargo metadata as info.
#[must_use]
pub fn openapi() -> Document {
    let mut doc = ApiDoc::openapi();
    doc.info.title = env!("CARGO_PKG_NAME").to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc.info.description = Some(env!("CARGO_PKG_DESCRIPTION").to_string());
    doc
}
