/*
This module turns captured CLI output into link records.

--- capture directory ---
One text file per device, filename stem = hostname
|
| template: header detection + row regexes, TextFSM-style field records
v
--- fields ---
VendorFieldMap lookup + normalization into `Link`
|
v
--- topology module ---
Link store, correlation, assembly

Overview captures take a shorter path (overview) and only yield the device's own router-id.
*/

pub mod fields;
pub mod overview;
pub mod source;
pub mod template;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid pre-parsed records in {path}: {message}")]
    InvalidRecords { path: String, message: String },
}
