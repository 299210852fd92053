//! chkdigest: Content-Integrity Checklists
//!
//! Hashes a set of files in parallel, persists the path→digest mapping as a
//! plain-text checklist, and later reconciles a fresh digest run against it
//! to report modified, added, and removed files.

pub mod checklist;
pub mod cli;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod service;
pub mod types;
