//! Wire types for the Deluge WebUI JSON-RPC API.
//!
//! This crate contains the serde-serializable types exchanged with the WebUI
//! `/json` endpoint and with the extension front end. These types represent
//! the "protocol layer" - the shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization and parsing
//! * 1:1 with protocol: Match the rows and envelopes Deluge actually sends
//! * Stable: Changes only when the wire protocol changes
//!
//! Session handling, retries and the status monitor live in `siphon-rs`.

pub mod host;
pub mod messages;
pub mod methods;
pub mod rpc;
pub mod version;

pub use host::*;
pub use messages::*;
pub use rpc::*;
pub use version::*;
