//! Axis-aligned bounding box

use crate::foundation::math::Vec2;

/// Axis-aligned bounding box in level coordinates (y grows down)
///
/// Bounds are closed: boxes that share an edge intersect, and points on the
/// boundary are contained. The box is empty when `left > right` or
/// `top > bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum x
    pub left: f32,
    /// Minimum y
    pub top: f32,
    /// Maximum x
    pub right: f32,
    /// Maximum y
    pub bottom: f32,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec2> for Aabb {
    fn from(point: Vec2) -> Self {
        Self::from_point(point)
    }
}

impl Aabb {
    /// Create a box from its four bounds
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// The canonical empty box, identity element for unions
    pub const fn empty() -> Self {
        Self {
            left: f32::INFINITY,
            top: f32::INFINITY,
            right: f32::NEG_INFINITY,
            bottom: f32::NEG_INFINITY,
        }
    }

    /// Degenerate box covering a single point
    pub fn from_point(point: Vec2) -> Self {
        Self::new(point.x, point.y, point.x, point.y)
    }

    /// Tight bound of a set of points (empty if there are none)
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Vec2>,
    {
        points.into_iter().fold(Self::empty(), |aabb, point| aabb.union(&Self::from_point(*point)))
    }

    /// Union of a set of boxes (empty if there are none)
    pub fn from_aabbs<'a, I>(aabbs: I) -> Self
    where
        I: IntoIterator<Item = &'a Aabb>,
    {
        aabbs.into_iter().fold(Self::empty(), |aabb, other| aabb.union(other))
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Whether the box encloses no points
    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.top > self.bottom
    }

    /// Horizontal extent, `NaN` if negative
    pub fn width(&self) -> f32 {
        let width = self.right - self.left;
        if width >= 0.0 { width } else { f32::NAN }
    }

    /// Vertical extent, `NaN` if negative
    pub fn height(&self) -> f32 {
        let height = self.bottom - self.top;
        if height >= 0.0 { height } else { f32::NAN }
    }

    /// Centre point
    pub fn centre(&self) -> Vec2 {
        Vec2::new((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5)
    }

    /// Whether `point` lies inside or on the boundary
    pub fn contains_point(&self, point: &Vec2) -> bool {
        self.left <= point.x && point.x <= self.right && self.top <= point.y && point.y <= self.bottom
    }

    /// Whether every point lies inside or on the boundary
    pub fn contains_points<'a, I>(&self, points: I) -> bool
    where
        I: IntoIterator<Item = &'a Vec2>,
    {
        points.into_iter().all(|point| self.contains_point(point))
    }

    /// Whether the two boxes overlap (touching edges count)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left <= other.right
            && self.right >= other.left
            && self.top <= other.bottom
            && self.bottom >= other.top
    }

    /// Box shifted by `offset`
    pub fn translated(&self, offset: &Vec2) -> Aabb {
        Aabb::new(
            self.left + offset.x,
            self.top + offset.y,
            self.right + offset.x,
            self.bottom + offset.y,
        )
    }

    /// Box grown by `margin` on all four sides
    pub fn expanded(&self, margin: f32) -> Aabb {
        Aabb::new(
            self.left - margin,
            self.top - margin,
            self.right + margin,
            self.bottom + margin,
        )
    }
}
