//! Shared test utilities for the ghl-mcp workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`transport`] - [`MockTransport`], a scripted stand-in for the CRM API

pub mod transport;

pub use transport::MockTransport;
