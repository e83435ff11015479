//! Attaching the WebUI to its daemon.

mod connector;
mod launcher;

pub use connector::SessionConnector;
pub use launcher::DaemonLauncher;
