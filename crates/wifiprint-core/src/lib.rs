//! # wifiprint Core
//!
//! Error types and session states shared by the wifiprint crates.

pub mod error;
pub mod state;

pub use error::{ConnectionError, ControllerError, Error, ProtocolError, Result};
pub use state::SessionState;
