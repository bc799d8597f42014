//! Workspace façade crate.
//!
//! Exposes the photo bridge through a single dependency: host applications
//! depend on `photo-bridge-workspace` and enable `desktop-shims` (on by
//! default) to get the service with the directory-backed desktop bridges
//! wired in.

#[cfg(feature = "desktop-shims")]
pub use core_service::*;
