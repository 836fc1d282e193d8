//! Typed custom properties of level objects
//!
//! Tiled stores custom properties either as a plain JSON object or, in newer
//! versions, as a list of `{ name, type, value }` records. Both are read into
//! [`ShapeProperties`], which names the keys the collision engine understands
//! and keeps everything else in [`ShapeProperties::extra`].

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::foundation::math::Vec2;

const BOUNCE: &str = "bounce";
const COLLIDE_ONLY: &str = "collideOnly";

/// Side of a one-way shape from which bodies are stopped
///
/// The side names the direction the body travels when it is stopped: a
/// `Down` platform stops bodies falling onto it and lets bodies jumping up
/// from below pass through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Stops bodies moving up (contact normal points down)
    Up,
    /// Stops bodies moving down (contact normal points up)
    Down,
    /// Stops bodies moving left (contact normal points right)
    Left,
    /// Stops bodies moving right (contact normal points left)
    Right,
}

impl Side {
    /// Parse the `collideOnly` property value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "up" => Some(Side::Up),
            "down" => Some(Side::Down),
            "left" => Some(Side::Left),
            "right" => Some(Side::Right),
            _ => None,
        }
    }

    /// Property value naming this side
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Up => "up",
            Side::Down => "down",
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Whether a body moving with `velocity` and touching with contact
    /// `normal` approaches from this side
    pub fn admits(self, velocity: &Vec2, normal: &Vec2) -> bool {
        match self {
            Side::Up => velocity.y <= 0.0 && normal.y > 0.0,
            Side::Down => velocity.y >= 0.0 && normal.y < 0.0,
            Side::Left => velocity.x <= 0.0 && normal.x > 0.0,
            Side::Right => velocity.x >= 0.0 && normal.x < 0.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Custom properties attached to a level object and the shapes built from it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawProperties")]
pub struct ShapeProperties {
    /// Restitution applied to the normal velocity component on contact
    pub bounce: Option<f32>,

    /// One-way collision side
    pub collide_only: Option<Side>,

    /// Properties not interpreted by the collision engine
    pub extra: HashMap<String, Value>,
}

impl ShapeProperties {
    /// Set the bounce factor
    pub fn with_bounce(mut self, bounce: f32) -> Self {
        self.bounce = Some(bounce);
        self
    }

    /// Set the one-way side
    pub fn with_collide_only(mut self, side: Side) -> Self {
        self.collide_only = Some(side);
        self
    }

    /// Bounce factor, 0 when unset
    pub fn bounce_or_default(&self) -> f32 {
        self.bounce.unwrap_or(0.0)
    }

    /// One-way filter: always true for shapes without `collideOnly`
    pub fn admits(&self, velocity: &Vec2, normal: &Vec2) -> bool {
        self.collide_only
            .map_or(true, |side| side.admits(velocity, normal))
    }

    /// Interpret a name/value map, keeping unknown or malformed entries in
    /// [`ShapeProperties::extra`]
    pub fn from_map(map: HashMap<String, Value>) -> Self {
        let mut properties = Self::default();
        for (name, value) in map {
            match name.as_str() {
                BOUNCE => match value.as_f64() {
                    Some(bounce) => properties.bounce = Some(bounce as f32),
                    None => {
                        log::warn!("ignoring non-numeric bounce property: {value}");
                        properties.extra.insert(name, value);
                    }
                },
                COLLIDE_ONLY => match value.as_str().and_then(Side::parse) {
                    Some(side) => properties.collide_only = Some(side),
                    None => {
                        log::warn!("ignoring unrecognised collideOnly value: {value}");
                        properties.extra.insert(name, value);
                    }
                },
                _ => {
                    properties.extra.insert(name, value);
                }
            }
        }
        properties
    }
}

#[derive(Deserialize)]
struct RawProperty {
    name: String,
    #[serde(default)]
    value: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProperties {
    List(Vec<RawProperty>),
    Map(HashMap<String, Value>),
}

impl From<RawProperties> for ShapeProperties {
    fn from(raw: RawProperties) -> Self {
        let map = match raw {
            RawProperties::List(list) => list.into_iter().map(|p| (p.name, p.value)).collect(),
            RawProperties::Map(map) => map,
        };
        Self::from_map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_map_recognised_keys() {
        let properties: ShapeProperties = serde_json::from_value(json!({
            "bounce": 0.25,
            "collideOnly": "left",
            "damage": 3
        }))
        .unwrap();
        assert_eq!(properties.bounce, Some(0.25));
        assert_eq!(properties.collide_only, Some(Side::Left));
        assert_eq!(properties.extra.get("damage"), Some(&json!(3)));
    }

    #[test]
    fn test_from_list_encoding() {
        let properties: ShapeProperties = serde_json::from_value(json!([
            { "name": "bounce", "type": "float", "value": 1.5 },
            { "name": "label", "type": "string", "value": "spring" }
        ]))
        .unwrap();
        assert_eq!(properties.bounce, Some(1.5));
        assert_eq!(properties.bounce_or_default(), 1.5);
        assert_eq!(properties.extra.get("label"), Some(&json!("spring")));
    }

    #[test]
    fn test_malformed_values_are_kept_as_extra() {
        let properties = ShapeProperties::from_map(HashMap::from([
            ("bounce".to_string(), json!("lots")),
            ("collideOnly".to_string(), json!("sideways")),
        ]));
        assert_eq!(properties.bounce, None);
        assert_eq!(properties.bounce_or_default(), 0.0);
        assert_eq!(properties.collide_only, None);
        assert_eq!(properties.extra.len(), 2);
    }

    #[test]
    fn test_one_way_sides() {
        let up = Vec2::new(0.0, -1.0);
        let down = Vec2::new(0.0, 1.0);
        let left = Vec2::new(-1.0, 0.0);
        let right = Vec2::new(1.0, 0.0);

        // falling onto the top face
        assert!(Side::Down.admits(&down, &up));
        // jumping into the underside
        assert!(!Side::Down.admits(&up, &down));
        assert!(Side::Up.admits(&up, &down));
        assert!(Side::Left.admits(&left, &right));
        assert!(!Side::Left.admits(&right, &left));
        assert!(Side::Right.admits(&right, &left));

        assert!(ShapeProperties::default().admits(&up, &down));
        for side in [Side::Up, Side::Down, Side::Left, Side::Right] {
            assert_eq!(Side::parse(side.as_str()), Some(side));
            assert_eq!(side.to_string(), side.as_str());
        }
    }
}
