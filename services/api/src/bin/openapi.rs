//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI 3 document for the PDF chat REST API. The output path
//! defaults to `openapi.json` and can be given as the first argument.

use api_lib::web::rest::ApiDoc;
use tracing::info;
use utoipa::OpenApi;

fn write_spec(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let spec_json = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(path, spec_json)?;
    info!("OpenAPI specification written to {}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());
    write_spec(&path)
}
