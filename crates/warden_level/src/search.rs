//! Segment graph search
//!
//! Both searches use an explicit worklist and a visited bitmap sized to the
//! level, and stop expanding at a configurable depth.

use crate::ids::{RoomId, SegId, SideId};
use crate::query::LevelQuery;
use std::collections::VecDeque;

/// Computes segment paths for agents
pub trait PathFinder {
    /// Ordered segments from `from` to `to` inclusive; empty when unreachable
    fn find_path(&self, level: &dyn LevelQuery, from: SegId, to: SegId) -> Vec<SegId>;
}

/// Breadth-first search over open connections
///
/// Room-aware: searches inside the start and goal rooms first, and only
/// widens to the whole level if that fails.
#[derive(Debug, Clone, Copy)]
pub struct BreadthFirstSearch {
    /// Maximum number of connections in a path
    pub max_depth: usize,
}

impl Default for BreadthFirstSearch {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

impl BreadthFirstSearch {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    fn search(
        &self,
        level: &dyn LevelQuery,
        from: SegId,
        to: SegId,
        rooms: Option<&[RoomId]>,
    ) -> Vec<SegId> {
        let count = level.segment_count();
        if from.index() >= count || to.index() >= count {
            return Vec::new();
        }

        let allowed = |id: SegId| match rooms {
            Some(rooms) => level.room_of(id).is_some_and(|room| rooms.contains(&room)),
            None => true,
        };

        let mut visited = vec![false; count];
        let mut parent: Vec<Option<SegId>> = vec![None; count];
        let mut worklist = VecDeque::new();

        visited[from.index()] = true;
        worklist.push_back((from, 0usize));

        while let Some((current, depth)) = worklist.pop_front() {
            if current == to {
                let mut path = vec![to];
                let mut cursor = to;
                while let Some(prev) = parent[cursor.index()] {
                    path.push(prev);
                    cursor = prev;
                }
                path.reverse();
                return path;
            }

            if depth >= self.max_depth {
                continue;
            }

            for side in SideId::ALL {
                let Some(next) = level.connection(current, side) else {
                    continue;
                };
                if next.index() >= count || visited[next.index()] || !allowed(next) {
                    continue;
                }
                visited[next.index()] = true;
                parent[next.index()] = Some(current);
                worklist.push_back((next, depth + 1));
            }
        }

        Vec::new()
    }
}

impl PathFinder for BreadthFirstSearch {
    fn find_path(&self, level: &dyn LevelQuery, from: SegId, to: SegId) -> Vec<SegId> {
        if let (Some(a), Some(b)) = (level.room_of(from), level.room_of(to)) {
            let path = self.search(level, from, to, Some(&[a, b]));
            if !path.is_empty() {
                return path;
            }
        }

        let path = self.search(level, from, to, None);
        if path.is_empty() {
            log::debug!("No path from {from} to {to}");
        }
        path
    }
}

/// Segments reachable from `start` through open sides within `max_depth` steps
///
/// Includes `start`. Order is depth-first discovery order.
pub fn nearby_segments(level: &dyn LevelQuery, start: SegId, max_depth: usize) -> Vec<SegId> {
    let count = level.segment_count();
    if start.index() >= count {
        return Vec::new();
    }

    let mut visited = vec![false; count];
    let mut result = Vec::new();
    let mut stack = vec![(start, 0usize)];
    visited[start.index()] = true;

    while let Some((current, depth)) = stack.pop() {
        result.push(current);
        if depth >= max_depth {
            continue;
        }

        for side in SideId::ALL {
            if let Some(next) = level.connection(current, side) {
                if next.index() < count && !visited[next.index()] {
                    visited[next.index()] = true;
                    stack.push((next, depth + 1));
                }
            }
        }
    }

    result
}
