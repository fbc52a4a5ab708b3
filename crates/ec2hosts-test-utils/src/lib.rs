//! Shared test utilities for the ec2hosts workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`hosts`] — [`TestHosts`](hosts::TestHosts), a hosts file in a temp directory
//! - [`inventory`] — record and inventory-document builders

pub mod hosts;
pub mod inventory;
