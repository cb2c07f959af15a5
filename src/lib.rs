pub mod span;
pub mod diagnostics;
pub mod manifest;
pub mod typeck;

use std::path::Path;

use diagnostics::CheckError;
use typeck::{CheckReport, Program};

pub use manifest::load_program;

/// Load a manifest from source text and check every call site in it.
pub fn check_source(source: &str) -> Result<CheckReport, CheckError> {
    let program = manifest::load_program(source)?;
    typeck::check_program(&program)
}

/// Read a manifest file's source text.
pub fn read_manifest(path: &Path) -> Result<String, CheckError> {
    std::fs::read_to_string(path)
        .map_err(|e| CheckError::manifest(format!("could not read file: {e}"), None).with_path(path.to_path_buf()))
}

/// Load manifest source read from `path`. Manifest errors carry the path.
pub fn load_source(path: &Path, source: &str) -> Result<Program, CheckError> {
    manifest::load_program(source).map_err(|e| e.with_path(path.to_path_buf()))
}

/// Read a manifest file and load it. Manifest errors carry the file path.
pub fn load_file(path: &Path) -> Result<(Program, String), CheckError> {
    let source = read_manifest(path)?;
    let program = load_source(path, &source)?;
    Ok((program, source))
}

/// Read a manifest file and check every call site in it.
pub fn check_file(path: &Path) -> Result<CheckReport, CheckError> {
    let (program, _source) = load_file(path)?;
    typeck::check_program(&program)
}
