//! Core logic for the GoHighLevel CRM tool server
//!
//! This crate knows the CRM tool catalogue and how each tool maps onto the
//! GoHighLevel REST API. It has no knowledge of the protocol that carries
//! tool calls; `ghl-mcp` wraps it in a JSON-RPC server.
//!
//! # Architecture
//!
//! ```text
//! (name, arguments)
//!        |
//!        v
//! [ operation ] -- typed, validated arguments
//!        |
//!        v
//! [ dispatch ]  -- builds ApiRequest, tenant scoping
//!        |
//!        v
//! [ client::Transport ] -- HttpTransport in production
//!        |
//!        v
//! [ envelope ] -> [ report ] -> [ render ] -> text
//! ```
//!
//! # Modules
//!
//! - [`registry`] - the fixed tool catalogue with JSON input schemas
//! - [`operation`] - argument decoding and required-field checks
//! - [`dispatch`] - [`Dispatcher`], one handler per operation
//! - [`client`] - the [`Transport`] seam and its reqwest implementation
//! - [`config`] - credentials and base URL
//! - [`envelope`] - tolerant extraction from API response wrappers
//! - [`report`] / [`render`] - structured results and their text form

pub mod client;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod operation;
pub mod registry;
pub mod render;
pub mod report;

pub use client::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
pub use config::Config;
pub use dispatch::{Dispatcher, InvocationResult};
pub use error::{Error, Result};
pub use operation::Operation;
pub use registry::{OperationDescriptor, OperationKind};
pub use report::Report;
