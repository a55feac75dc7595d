//! Warden Level - segment graph geometry queries
//!
//! This crate provides the level-facing side of agent behavior: the
//! [`LevelQuery`] trait the AI consumes, plus an in-memory [`Level`] that
//! implements it for tests and headless runs.
//!
//! # Features
//!
//! - Eight-vertex convex segments with six quad sides
//! - Portal-walking raycasts through open sides
//! - Room grouping of segments
//! - Breadth-first path search with depth bounds
//!
//! # Example
//!
//! ```ignore
//! use warden_level::prelude::*;
//!
//! let mut builder = Level::builder();
//! let ids = builder.add_corridor(Vec3::ZERO, 4, 20.0);
//! let level = builder.build();
//!
//! let path = BreadthFirstSearch::default().find_path(&level, ids[0], ids[3]);
//! ```

pub mod error;
pub mod ids;
pub mod level;
pub mod query;
pub mod ray;
pub mod search;
pub mod segment;

pub mod prelude {
    pub use crate::error::{LevelError, Result};
    pub use crate::ids::{RoomId, SegId, SideId, Tag};
    pub use crate::level::{Level, LevelBuilder, Room};
    pub use crate::query::{LevelHit, LevelQuery};
    pub use crate::ray::{project_ray_onto_plane, Ray};
    pub use crate::search::{nearby_segments, BreadthFirstSearch, PathFinder};
    pub use crate::segment::{Face, Segment, Side};
    pub use glam::Vec3;
}

pub use prelude::*;
