/*!
Topology module

Builds the hostname-keyed peer topology from parsed neighbor captures.

Structure:
- `source`: The `CaptureSource` trait handing captures and router-id seeds to the builder,
            plus the `TopologyError` type.
- `store`: `LinkStore`, all collected links with the indexes correlation runs on.
- `correlation`: The multi-pass router-id to hostname correlation engine.
- `assembler`: Resolves remote interfaces and inserts symmetric peer entries.
- `builder`: `TopologyBuilder`, the single entry point tying the above together.

Re-exports:
- `TopologyBuilder`, `TopologyBuild`, `TopologyError`, and `TopologyResult`
  for easy consumption by callers.
*/

pub mod assembler;
pub mod builder;
pub mod correlation;
pub mod source;
pub mod store;

pub use builder::{TopologyBuild, TopologyBuilder};
pub use source::{TopologyError, TopologyResult};
