//! Quadtree spatial partitioning structure
//!
//! Built once from a fixed set of bounding boxes. Each node splits at the
//! centre of the union of its boxes (the pivot); boxes lying strictly inside
//! one quadrant move down to that child, the rest straddle the pivot and stay
//! at the node. The tree is therefore shaped by where the level geometry is,
//! not by a uniform grid. There is no insertion or removal: a changed shape
//! set means a rebuild.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;
use crate::geometry::{Aabb, ShapeId};

/// Configuration for quadtree construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadTreeConfig {
    /// Depth budget; a node with `max_level <= 1` is always a leaf
    pub max_level: u32,

    /// A node with fewer entries than this is a leaf
    pub max_shapes: usize,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_level: 5,
            max_shapes: 5,
        }
    }
}

/// Shape reference stored in the quadtree with its bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadTreeEntry {
    /// Shape this entry stands for
    pub id: ShapeId,
    /// Bounding box of the shape
    pub aabb: Aabb,
}

/// Child slot relative to a node's pivot (y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// `x < pivot.x`, `y < pivot.y`
    TopLeft = 0,
    /// `x > pivot.x`, `y < pivot.y`
    TopRight = 1,
    /// `x < pivot.x`, `y > pivot.y`
    BottomLeft = 2,
    /// `x > pivot.x`, `y > pivot.y`
    BottomRight = 3,
}

impl Quadrant {
    /// All quadrants in child-slot order
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Quadrant that wholly contains `aabb`, if any (strict on both axes)
    fn containing(aabb: &Aabb, pivot: &Vec2) -> Option<Self> {
        let left = aabb.right < pivot.x;
        let right = aabb.left > pivot.x;
        let above = aabb.bottom < pivot.y;
        let below = aabb.top > pivot.y;
        match (left, right, above, below) {
            (true, _, true, _) => Some(Quadrant::TopLeft),
            (_, true, true, _) => Some(Quadrant::TopRight),
            (true, _, _, true) => Some(Quadrant::BottomLeft),
            (_, true, _, true) => Some(Quadrant::BottomRight),
            _ => None,
        }
    }

    /// Whether a query box can reach this quadrant of `pivot`
    fn reaches(self, query: &Aabb, pivot: &Vec2) -> bool {
        match self {
            Quadrant::TopLeft => query.left <= pivot.x && query.top <= pivot.y,
            Quadrant::TopRight => query.right >= pivot.x && query.top <= pivot.y,
            Quadrant::BottomLeft => query.left <= pivot.x && query.bottom >= pivot.y,
            Quadrant::BottomRight => query.right >= pivot.x && query.bottom >= pivot.y,
        }
    }
}

/// Single node in the quadtree hierarchy
#[derive(Debug, Clone)]
pub struct QuadTreeNode {
    /// Entries held at this node: everything if leaf, the straddling entries otherwise
    pub entries: Vec<QuadTreeEntry>,

    /// Split point, `None` for a leaf
    pub pivot: Option<Vec2>,

    /// Child nodes indexed by [`Quadrant`]; empty quadrants have no node
    pub children: [Option<Box<QuadTreeNode>>; 4],
}

impl QuadTreeNode {
    /// Build a node (and its subtree) over `entries`
    pub fn build(entries: Vec<QuadTreeEntry>, max_level: u32, max_shapes: usize) -> Self {
        if entries.len() < max_shapes || max_level <= 1 {
            return Self::leaf(entries);
        }

        let pivot = Aabb::from_aabbs(entries.iter().map(|entry| &entry.aabb)).centre();

        let mut straddling = Vec::new();
        let mut quadrants: [Vec<QuadTreeEntry>; 4] = Default::default();
        for entry in entries {
            match Quadrant::containing(&entry.aabb, &pivot) {
                Some(quadrant) => quadrants[quadrant as usize].push(entry),
                None => straddling.push(entry),
            }
        }

        let children = quadrants.map(|quadrant_entries| {
            if quadrant_entries.is_empty() {
                None
            } else {
                Some(Box::new(Self::build(quadrant_entries, max_level - 1, max_shapes)))
            }
        });

        Self {
            entries: straddling,
            pivot: Some(pivot),
            children,
        }
    }

    fn leaf(entries: Vec<QuadTreeEntry>) -> Self {
        Self {
            entries,
            pivot: None,
            children: Default::default(),
        }
    }

    /// Check if this node is a leaf (has no pivot)
    pub fn is_leaf(&self) -> bool {
        self.pivot.is_none()
    }

    /// Child node for a quadrant, if it exists
    pub fn child(&self, quadrant: Quadrant) -> Option<&QuadTreeNode> {
        self.children[quadrant as usize].as_deref()
    }

    /// Collect ids of entries whose box may intersect `query`
    pub fn candidates(&self, query: &Aabb, results: &mut Vec<ShapeId>) {
        results.extend(
            self.entries
                .iter()
                .filter(|entry| entry.aabb.intersects(query))
                .map(|entry| entry.id),
        );

        let Some(pivot) = self.pivot else {
            return;
        };

        for quadrant in Quadrant::ALL {
            if let Some(child) = self.child(quadrant) {
                if quadrant.reaches(query, &pivot) {
                    child.candidates(query, results);
                }
            }
        }
    }

    /// Visit this node and all descendants depth-first
    pub fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a QuadTreeNode)) {
        visitor(self);
        for child in self.children.iter().flatten() {
            child.visit(visitor);
        }
    }

    /// Count total entries in this node and all children
    pub fn count_entries(&self) -> usize {
        self.entries.len()
            + self
                .children
                .iter()
                .flatten()
                .map(|child| child.count_entries())
                .sum::<usize>()
    }

    /// Depth of the subtree rooted here (a leaf has depth 1)
    pub fn depth(&self) -> u32 {
        1 + self
            .children
            .iter()
            .flatten()
            .map(|child| child.depth())
            .max()
            .unwrap_or(0)
    }
}

/// Static quadtree over shape bounding boxes
#[derive(Debug, Clone)]
pub struct QuadTree {
    /// Root node covering every entry
    pub root: QuadTreeNode,

    /// Configuration used to build the tree
    config: QuadTreeConfig,
}

impl QuadTree {
    /// Build a quadtree over the given entries
    pub fn new(entries: Vec<QuadTreeEntry>, config: QuadTreeConfig) -> Self {
        Self {
            root: QuadTreeNode::build(entries, config.max_level, config.max_shapes),
            config,
        }
    }

    /// Broad-phase query: ids of shapes whose bounding box may intersect `query`
    ///
    /// Straddling entries are filtered by exact box intersection; entries in
    /// child nodes are only reached through quadrants `query` overlaps.
    /// Callers still need a narrow-phase test on every result.
    pub fn candidate_shapes(&self, query: &Aabb) -> Vec<ShapeId> {
        let mut results = Vec::new();
        self.root.candidates(query, &mut results);
        results
    }

    /// Configuration the tree was built with
    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    /// Get total entry count
    pub fn entry_count(&self) -> usize {
        self.root.count_entries()
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.root.visit(&mut |_| count += 1);
        count
    }

    /// Depth of the tree (a single leaf has depth 1)
    pub fn depth(&self) -> u32 {
        self.root.depth()
    }
}
