/// Platform-facing checks — currently the write-access probe.

pub mod permissions;

pub use permissions::{MarkerFileProbe, WriteAccessProbe};
