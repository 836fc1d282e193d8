//! Spatial partitioning data structures
//!
//! Provides the static broad-phase index used to cull level shapes that
//! cannot touch a body before the exact SAT test runs.

mod quad_tree;

pub use quad_tree::{QuadTree, QuadTreeConfig, QuadTreeEntry, QuadTreeNode, Quadrant};
