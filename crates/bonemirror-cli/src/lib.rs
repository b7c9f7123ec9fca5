//! Bone mirror CLI library.
//!
//! This crate provides the functionality behind the `bonemirror` binary:
//! loading skeleton, configuration and pose documents, the stderr logger, and
//! the `pairs`, `rules` and `mirror` commands.

pub mod commands;
pub mod input;
pub mod logger;
