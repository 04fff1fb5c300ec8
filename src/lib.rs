//! gomodup - Go module update helper library
//!
//! This library provides the pieces an update bot needs to move a Go
//! module's dependencies forward:
//! - go.mod parsing and comment-preserving edits
//! - Version selection against a module proxy, including the next major path
//! - Import path rewriting across the module tree for major upgrades

pub mod cli;
pub mod domain;
pub mod error;
pub mod imports;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
pub mod update;
