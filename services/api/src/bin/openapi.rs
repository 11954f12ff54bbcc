//! services/api/src/bin/openapi.rs
//!
//! Dumps the room and feedback API description.
//!
//! `openapi` writes `openapi.json`, `openapi FILE` writes FILE and `openapi -` prints the
//! document to stdout.

use api_lib::web::rest::ApiDoc;
use std::io::Write;
use std::path::PathBuf;
use utoipa::OpenApi;

#[derive(Debug, PartialEq)]
enum Output {
    Stdout,
    File(PathBuf),
}

fn output_from_args(mut args: impl Iterator<Item = String>) -> Output {
    match args.next().as_deref() {
        Some("-") => Output::Stdout,
        Some(path) => Output::File(PathBuf::from(path)),
        None => Output::File(PathBuf::from("openapi.json")),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let doc = ApiDoc::openapi();
    let path_count = doc.paths.paths.len();
    let json = doc.to_pretty_json()?;

    match output_from_args(std::env::args().skip(1)) {
        Output::Stdout => std::io::stdout().write_all(json.as_bytes())?,
        Output::File(path) => {
            std::fs::write(&path, json)?;
            eprintln!("Described {} paths in {}", path_count, path.display());
        }
    }
    Ok(())
}
