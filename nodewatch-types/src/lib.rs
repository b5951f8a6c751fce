//! # nodewatch-types
//!
//! Core types for simulated node monitoring. This crate defines the universal
//! schema shared between the nodewatch engine and anything that consumes its
//! output - dashboards, exporters, notification frontends.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature for session handoff
//! - **Versioned schema**: Session snapshots include version info for forward compatibility
//! - **Presentation agnostic**: No rendering concerns; consumers decide how to display
//!
//! ## Features
//!
//! - `std` (default): Standard library support (wall-clock helpers)
//! - `serde`: JSON/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use nodewatch_types::{Node, NodeStatus, SessionSnapshot, UnixMillis};
//!
//! let created = UnixMillis::from_secs(1_700_000_000);
//! let node = Node::new("a1b2", "Google", "google.com", created);
//! assert_eq!(node.status, NodeStatus::Pending);
//!
//! let snapshot = SessionSnapshot::builder()
//!     .timestamp(created)
//!     .node(node)
//!     .build();
//! assert_eq!(snapshot.nodes.len(), 1);
//! ```
//!
//! ## Schema Version
//!
//! The current snapshot schema version is **1**. The version is included in
//! serialized snapshots so consumers can handle format evolution gracefully.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod activity;
mod millis;
mod node;
mod snapshot;

pub use activity::*;
pub use millis::*;
pub use node::*;
pub use snapshot::*;

/// Current session snapshot schema version.
///
/// Increment this when making breaking changes to the snapshot format.
/// Consumers should check this version and handle older formats appropriately.
pub const SNAPSHOT_VERSION: u32 = 1;
