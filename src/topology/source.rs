/*!
Input-facing interface of the topology builder.

This module defines:
- `DeviceCapture` and `RouterIdSeed`: what a capture source hands to the builder.
- `CaptureSource`: a small trait that returns parsed captures without exposing how they were obtained.
- `TopologyError`: error type for the build and its outputs.

The builder does not care whether captures come from a directory of text files, a database
or a live collection run; adapters implement `CaptureSource`.
*/

use thiserror::Error;

use crate::{
    network::{
        link::Link,
        router::{Hostname, RouterId},
    },
    parsers::{DeviceProfile, ospf_parser::CaptureError},
};

/// Links extracted from one device's neighbor table.
#[derive(Debug, Clone)]
pub struct DeviceCapture {
    pub hostname: Hostname,
    pub profile: DeviceProfile,
    pub links: Vec<Link>,
}

/// Authoritative router-id of a device, taken from its own overview output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterIdSeed {
    pub hostname: Hostname,
    pub router_id: RouterId,
}

#[derive(Debug, Error)]
pub enum TopologyError {
    /// Input could not be acquired at all (missing directory, unreadable listing).
    #[error("acquisition error: {0}")]
    Acquisition(String),
    /// A rendered output could not be produced or written.
    #[error("output error: {0}")]
    Output(String),
}

impl From<CaptureError> for TopologyError {
    fn from(e: CaptureError) -> Self {
        TopologyError::Acquisition(e.to_string())
    }
}

/// Convenience result alias for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

pub trait CaptureSource {
    /// Neighbor-table captures, one per device that produced at least one link.
    fn fetch_captures(&mut self) -> TopologyResult<Vec<DeviceCapture>>;
    /// Self router-ids from overview captures. Sources without overviews return nothing.
    fn fetch_seeds(&mut self) -> TopologyResult<Vec<RouterIdSeed>>;
}
