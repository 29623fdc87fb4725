//! Remote template repositories
//!
//! This module provides:
//! - Semantic version filtering and ranking of tag names
//! - Resolution of a repository URL to a concrete checkout ref
//! - Shallow checkout into a plain file tree without git metadata

pub mod materializer;
pub mod resolver;
pub mod version;

pub use materializer::materialize;
pub use resolver::{resolve_ref, GitRef};
pub use version::{latest_tag, parse_tag};
