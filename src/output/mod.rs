/*!
Renderers for a finished build.

- `json`: the topology mapping itself, consumed by downstream tools.
- `mermaid`: a `graph LR` diagram for quick visual review.
- `summary`: a plain-text report of counts, correlation passes and unresolved router-ids.
*/

pub mod json;
pub mod mermaid;
pub mod summary;

use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use tracing::info;

use crate::topology::{TopologyBuild, TopologyError, TopologyResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Mermaid,
    Summary,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [
        OutputFormat::Json,
        OutputFormat::Mermaid,
        OutputFormat::Summary,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            OutputFormat::Json => "topology.json",
            OutputFormat::Mermaid => "topology.mmd",
            OutputFormat::Summary => "summary.txt",
        }
    }

    pub fn render(&self, build: &TopologyBuild, generated_at: SystemTime) -> TopologyResult<String> {
        match self {
            OutputFormat::Json => json::render_json(&build.topology),
            OutputFormat::Mermaid => Ok(mermaid::render_mermaid(&build.topology)),
            OutputFormat::Summary => Ok(summary::render_summary(build, generated_at)),
        }
    }
}

/// Renders each requested format into `dir`, creating it if needed. Returns the written paths.
pub fn write_outputs(
    build: &TopologyBuild,
    dir: &Path,
    formats: &[OutputFormat],
    generated_at: SystemTime,
) -> TopologyResult<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| {
        TopologyError::Output(format!("cannot create output directory {}: {e}", dir.display()))
    })?;

    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let path = dir.join(format.file_name());
        let contents = format.render(build, generated_at)?;
        fs::write(&path, contents)
            .map_err(|e| TopologyError::Output(format!("cannot write {}: {e}", path.display())))?;
        info!(path = %path.display(), "output written");
        written.push(path);
    }
    Ok(written)
}
