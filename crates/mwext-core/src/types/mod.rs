//! Type definitions shared across mwext crates

mod release;
mod remote;

pub use release::Release;
pub use remote::RemoteExtension;
