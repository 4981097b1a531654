//! Writes the OpenAPI document to specs/trolley-api.json.

use std::fs;
use std::path::Path;

use utoipa::OpenApi;

fn main() {
    let json = trolley_api::routes::ApiDoc::openapi()
        .to_pretty_json()
        .expect("serialize OpenAPI document");

    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../specs/trolley-api.json");
    fs::create_dir_all(path.parent().expect("path has a parent")).expect("create specs dir");
    fs::write(&path, json).expect("write OpenAPI document");

    println!("Wrote {}", path.display());
}
