/*!
Capture-directory data source.

This module defines:
- `parse_neighbor_file` / `parse_neighbor_text`: one neighbor-table capture to one `DeviceCapture`.
- `parse_overview_file`: one overview capture to one `RouterIdSeed`.
- `CaptureDirectory`: a `CaptureSource` over a directory of neighbor captures and an optional
  directory of overview captures.

Every file is named after the device it was taken from; the filename stem is the hostname.
Files ending in `.json` hold pre-parsed field records (a JSON array of objects, as written by
an external TextFSM run) and skip template detection.
*/

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{
    network::router::Hostname,
    parsers::{
        DeviceProfile, OspfVersion, Vendor,
        ospf_parser::{
            CaptureError,
            fields::{NeighborRecord, VendorFieldMap},
            overview::parse_router_id,
            template::{self, FieldRecord},
        },
    },
    topology::source::{CaptureSource, DeviceCapture, RouterIdSeed, TopologyError, TopologyResult},
};

/// Hostname of the device a capture file belongs to.
pub fn hostname_from_path(path: &Path) -> Option<Hostname> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::trim)
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

fn read_capture(path: &Path) -> Result<String, CaptureError> {
    let bytes = fs::read(path).map_err(|source| CaptureError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parses one neighbor-table capture.
///
/// Returns `Ok(None)` when the file is empty, no template recognizes it, or it yields no
/// usable rows.
pub fn parse_neighbor_file(
    path: &Path,
    protocol_override: Option<OspfVersion>,
) -> Result<Option<DeviceCapture>, CaptureError> {
    let Some(hostname) = hostname_from_path(path) else {
        debug!(path = %path.display(), "capture file has no usable name, skipping");
        return Ok(None);
    };
    let text = read_capture(path)?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let records = parse_records_json(&text).map_err(|message| CaptureError::InvalidRecords {
            path: path.display().to_string(),
            message,
        })?;
        let profile = DeviceProfile {
            vendor: Vendor::Unknown,
            version: protocol_override.unwrap_or(OspfVersion::V2),
        };
        return Ok(capture_from_records(hostname, profile, &records, VendorFieldMap::generic()));
    }

    Ok(parse_neighbor_text(&hostname, &text, protocol_override))
}

/// Parses raw neighbor-table text captured from `hostname`.
pub fn parse_neighbor_text(
    hostname: &str,
    text: &str,
    protocol_override: Option<OspfVersion>,
) -> Option<DeviceCapture> {
    if text.trim().is_empty() {
        debug!(hostname, "empty capture, skipping");
        return None;
    }
    let Some(template) = template::detect(text, protocol_override) else {
        if protocol_override.is_some() && template::detect(text, None).is_some() {
            warn!(
                hostname,
                "capture matches a neighbor template for a different OSPF version than requested, skipping"
            );
        } else {
            debug!(hostname, "no neighbor template recognizes the capture, skipping");
        }
        return None;
    };
    debug!(hostname, template = template.name, "neighbor template matched");

    let profile = DeviceProfile {
        vendor: template.vendor,
        version: template.version,
    };
    let records = template.parse(text);
    capture_from_records(
        hostname.to_string(),
        profile,
        &records,
        VendorFieldMap::for_template(template.vendor, template.version),
    )
}

fn capture_from_records(
    hostname: Hostname,
    profile: DeviceProfile,
    records: &[FieldRecord],
    map: &VendorFieldMap,
) -> Option<DeviceCapture> {
    let links: Vec<_> = records
        .iter()
        .filter_map(|record| NeighborRecord::extract(record, map).into_link(&hostname))
        .collect();
    if links.len() < records.len() {
        debug!(
            hostname = %hostname,
            dropped = records.len() - links.len(),
            "neighbor entries without a router-id were dropped"
        );
    }
    if links.is_empty() {
        debug!(hostname = %hostname, "capture yielded no links, skipping");
        return None;
    }
    Some(DeviceCapture {
        hostname,
        profile,
        links,
    })
}

/// Reads a JSON array of flat objects into field records. Non-string scalars are stringified,
/// nulls and nested values are ignored.
fn parse_records_json(text: &str) -> Result<Vec<FieldRecord>, String> {
    let rows: Vec<BTreeMap<String, serde_json::Value>> =
        serde_json::from_str(text).map_err(|e| e.to_string())?;
    Ok(rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .filter_map(|(key, value)| {
                    let value = match value {
                        serde_json::Value::String(s) => s,
                        serde_json::Value::Number(n) => n.to_string(),
                        serde_json::Value::Bool(b) => b.to_string(),
                        _ => return None,
                    };
                    Some((key, value))
                })
                .collect()
        })
        .collect())
}

/// Parses one overview capture into the device's own router-id.
pub fn parse_overview_file(path: &Path) -> Result<Option<RouterIdSeed>, CaptureError> {
    let Some(hostname) = hostname_from_path(path) else {
        return Ok(None);
    };
    let text = read_capture(path)?;
    Ok(parse_router_id(&text).map(|router_id| RouterIdSeed {
        hostname,
        router_id,
    }))
}

/// Regular, non-hidden files of a directory sorted by name.
fn list_capture_files(dir: &Path) -> TopologyResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        TopologyError::Acquisition(format!("cannot read directory {}: {e}", dir.display()))
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .map(|entry| entry.path())
        .collect();
    files.sort();
    Ok(files)
}

/// Neighbor captures in one directory, overview captures optionally in another.
#[derive(Debug, Clone)]
pub struct CaptureDirectory {
    neighbor_dir: PathBuf,
    overview_dir: Option<PathBuf>,
    protocol_override: Option<OspfVersion>,
}

impl CaptureDirectory {
    pub fn new(neighbor_dir: impl Into<PathBuf>) -> Self {
        CaptureDirectory {
            neighbor_dir: neighbor_dir.into(),
            overview_dir: None,
            protocol_override: None,
        }
    }

    pub fn with_overviews(mut self, overview_dir: impl Into<PathBuf>) -> Self {
        self.overview_dir = Some(overview_dir.into());
        self
    }

    /// Only accept neighbor captures of this OSPF version.
    pub fn with_protocol(mut self, version: OspfVersion) -> Self {
        self.protocol_override = Some(version);
        self
    }
}

impl CaptureSource for CaptureDirectory {
    fn fetch_captures(&mut self) -> TopologyResult<Vec<DeviceCapture>> {
        let files = list_capture_files(&self.neighbor_dir)?;
        let mut captures = Vec::new();
        for path in &files {
            match parse_neighbor_file(path, self.protocol_override) {
                Ok(Some(capture)) => {
                    debug!(
                        hostname = %capture.hostname,
                        links = capture.links.len(),
                        platform = capture.profile.platform(),
                        "parsed neighbor capture"
                    );
                    captures.push(capture);
                }
                Ok(None) => {}
                Err(e) => warn!("skipping neighbor capture: {e}"),
            }
        }
        info!(
            files = files.len(),
            devices = captures.len(),
            dir = %self.neighbor_dir.display(),
            "neighbor captures loaded"
        );
        Ok(captures)
    }

    fn fetch_seeds(&mut self) -> TopologyResult<Vec<RouterIdSeed>> {
        let Some(dir) = &self.overview_dir else {
            return Ok(Vec::new());
        };
        let files = list_capture_files(dir)?;
        let mut seeds = Vec::new();
        for path in &files {
            match parse_overview_file(path) {
                Ok(Some(seed)) => seeds.push(seed),
                Ok(None) => debug!(path = %path.display(), "no router-id in overview capture"),
                Err(e) => warn!("skipping overview capture: {e}"),
            }
        }
        info!(seeds = seeds.len(), dir = %dir.display(), "overview captures loaded");
        Ok(seeds)
    }
}
