pub mod sidecar;

pub use sidecar::SidecarStore;
