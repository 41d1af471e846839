//! Core of the moderation console, shared by the browser frontend and the
//! `modctl` command line.
//!
//! Nothing in here touches the network or storage directly. The browser and
//! native crates plug in a [`client::Transport`] and an
//! [`persist::IdentityCache`]; everything above those seams (session gate,
//! report grouping, reconciliation, dashboard state) is plain Rust that
//! runs the same on `wasm32` and native targets.

pub mod aggregate;
pub mod api;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod mock;
pub mod models;
pub mod persist;
pub mod reconcile;
pub mod session;

pub use api::ModerationApi;
pub use client::{ClientConfig, RemoteClient, Transport};
pub use dashboard::DashboardController;
pub use error::{ActionError, ApiError};
pub use mock::MockModerationApi;
pub use session::{SessionPhase, SessionStore, Verification};
