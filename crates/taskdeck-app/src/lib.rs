//! Application layer logic for taskdeck.
//!
//! This crate provides the session that front-ends drive, settings loading,
//! and helpers for turning user input into filters.

pub mod config;
pub mod filter_util;
pub mod session;

// Re-exports for convenience
pub use config::{AppearanceConfig, DefaultView, NotificationConfig, Settings, TaskConfig};
pub use filter_util::{FilterBuildError, TaskFilterBuilder, describe_filter};
pub use session::{Session, SidebarCounts, SidebarView, UnknownView};
