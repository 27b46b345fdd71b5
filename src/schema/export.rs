//! SDL export
//!
//! The generated schema is written out as SDL so client codegen can pick it
//! up without a running server.

use crate::error::Result;
use async_graphql::dynamic::Schema;
use std::fs;
use std::path::Path;

/// Write the schema's SDL to `path`, creating parent directories as needed
pub fn export_schema(schema: &Schema, path: &str) -> Result<()> {
    let sdl = schema.sdl();

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, &sdl)?;

    tracing::info!("Exported schema to {} ({} bytes)", path, sdl.len());
    Ok(())
}
