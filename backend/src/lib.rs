//! Blog backend library: a single-file JSON post store with serialised,
//! crash-safe writes behind a small REST API.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use inbound::http::configure;
pub use middleware::Trace;
