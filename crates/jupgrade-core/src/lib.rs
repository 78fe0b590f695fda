//! Core infrastructure for jupgrade.
//!
//! This crate provides the language-agnostic plumbing around the converter:
//! - Error types and error codes
//! - JSON output types for CLI responses
//! - Candidate file discovery and atomic writes
//! - Content hashing
//! - Unified diff generation for dry runs

pub mod diff;
pub mod error;
pub mod files;
pub mod hash;
pub mod output;
