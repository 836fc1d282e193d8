//! Tiled JSON map structures

use std::path::Path;

use serde::Deserialize;

use super::{LevelError, ShapeProperties};
use crate::foundation::math::Vec2;

/// A tile map: the ordered list of its layers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TileMap {
    /// Map layers in document order
    #[serde(default)]
    pub layers: Vec<MapLayer>,
}

impl TileMap {
    /// Parse a map from Tiled JSON text
    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a map from a Tiled JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, LevelError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// First object layer with the given name
    pub fn object_layer(&self, name: &str) -> Option<&MapLayer> {
        self.layers
            .iter()
            .find(|layer| layer.layer_type == LayerType::ObjectGroup && layer.name == name)
    }
}

/// Kind of a map layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    /// Layer of free-form objects
    ObjectGroup,
    /// Grid of tiles
    TileLayer,
    /// Single image
    ImageLayer,
    /// Layer grouping other layers
    Group,
    /// Any layer type this crate does not know about
    #[serde(other)]
    Other,
}

/// One layer of a map
#[derive(Debug, Clone, Deserialize)]
pub struct MapLayer {
    /// Layer name as shown in the editor
    #[serde(default)]
    pub name: String,

    /// Layer kind
    #[serde(rename = "type")]
    pub layer_type: LayerType,

    /// Objects of an object layer (empty for other kinds)
    #[serde(default)]
    pub objects: Vec<MapObject>,
}

impl MapLayer {
    /// Object layer with the given name and objects
    pub fn object_group(name: impl Into<String>, objects: Vec<MapObject>) -> Self {
        Self {
            name: name.into(),
            layer_type: LayerType::ObjectGroup,
            objects,
        }
    }
}

/// Polygon or polyline point, relative to its object's origin
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct MapPoint {
    /// Horizontal offset
    pub x: f32,
    /// Vertical offset
    pub y: f32,
}

impl From<MapPoint> for Vec2 {
    fn from(point: MapPoint) -> Self {
        Vec2::new(point.x, point.y)
    }
}

/// A placed object of an object layer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapObject {
    /// Unique object id within the map
    #[serde(default)]
    pub id: u32,

    /// Object name
    #[serde(default)]
    pub name: String,

    /// Origin x
    #[serde(default)]
    pub x: f32,

    /// Origin y
    #[serde(default)]
    pub y: f32,

    /// Rectangle width
    #[serde(default)]
    pub width: f32,

    /// Rectangle height
    #[serde(default)]
    pub height: f32,

    /// Clockwise rotation about the origin, in degrees
    #[serde(default)]
    pub rotation: f32,

    /// Polygon vertices relative to the origin
    #[serde(default)]
    pub polygon: Option<Vec<MapPoint>>,

    /// Polyline vertices relative to the origin
    #[serde(default)]
    pub polyline: Option<Vec<MapPoint>>,

    /// Marks an ellipse object
    #[serde(default)]
    pub ellipse: bool,

    /// Marks a point object
    #[serde(default)]
    pub point: bool,

    /// Tile reference of a tile object
    #[serde(default)]
    pub gid: Option<u32>,

    /// Text payload of a text object
    #[serde(default)]
    pub text: Option<serde_json::Value>,

    /// Custom properties
    #[serde(default)]
    pub properties: ShapeProperties,
}

/// Classification of a map object by the markers it carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectKind<'a> {
    /// Explicit polygon
    Polygon(&'a [MapPoint]),
    /// Rectangle (no other marker), possibly rotated
    Rectangle,
    /// Open polyline
    Polyline,
    /// Ellipse
    Ellipse,
    /// Point
    Point,
    /// Tile object
    Tile,
    /// Text box
    Text,
}

impl MapObject {
    /// Rectangle object at `(x, y)`
    pub fn rectangle(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Self::default()
        }
    }

    /// Polygon object with origin `(x, y)`
    pub fn polygon(x: f32, y: f32, points: &[(f32, f32)]) -> Self {
        Self {
            x,
            y,
            polygon: Some(points.iter().map(|&(x, y)| MapPoint { x, y }).collect()),
            ..Self::default()
        }
    }

    /// Replace the custom properties
    pub fn with_properties(mut self, properties: ShapeProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Set the rotation in degrees
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Classify the object
    pub fn kind(&self) -> ObjectKind<'_> {
        if let Some(points) = &self.polygon {
            ObjectKind::Polygon(points)
        } else if self.polyline.is_some() {
            ObjectKind::Polyline
        } else if self.ellipse {
            ObjectKind::Ellipse
        } else if self.point {
            ObjectKind::Point
        } else if self.gid.is_some() {
            ObjectKind::Tile
        } else if self.text.is_some() {
            ObjectKind::Text
        } else {
            ObjectKind::Rectangle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Side;

    const MAP: &str = r#"{
        "width": 10,
        "height": 10,
        "layers": [
            { "type": "tilelayer", "name": "ground", "data": [0, 1, 2] },
            {
                "type": "objectgroup",
                "name": "collision",
                "objects": [
                    { "id": 1, "x": 0, "y": 100, "width": 100, "height": 10, "rotation": 0,
                      "properties": { "bounce": 0.5 } },
                    { "id": 2, "x": 10, "y": 10, "width": 0, "height": 0, "rotation": 0,
                      "polygon": [ { "x": 0, "y": 0 }, { "x": 10, "y": 0 }, { "x": 0, "y": 10 } ],
                      "properties": [ { "name": "collideOnly", "type": "string", "value": "down" } ] },
                    { "id": 3, "x": 0, "y": 0, "polyline": [ { "x": 0, "y": 0 }, { "x": 5, "y": 5 } ] },
                    { "id": 4, "x": 0, "y": 0, "width": 8, "height": 8, "ellipse": true },
                    { "id": 5, "x": 0, "y": 0, "width": 16, "height": 16, "gid": 7 },
                    { "id": 6, "x": 0, "y": 0, "width": 40, "height": 12, "text": { "text": "hi" } },
                    { "id": 7, "x": 3, "y": 3, "point": true }
                ]
            },
            { "type": "imagelayer", "name": "sky" },
            { "type": "fancylayer", "name": "future" }
        ]
    }"#;

    #[test]
    fn test_parse_map() {
        let map = TileMap::from_json_str(MAP).unwrap();
        assert_eq!(map.layers.len(), 4);
        assert_eq!(map.layers[0].layer_type, LayerType::TileLayer);
        assert_eq!(map.layers[3].layer_type, LayerType::Other);

        let layer = map.object_layer("collision").unwrap();
        assert_eq!(layer.objects.len(), 7);
        assert!(map.object_layer("ground").is_none());
        assert!(map.object_layer("missing").is_none());
    }

    #[test]
    fn test_object_kinds() {
        let map = TileMap::from_json_str(MAP).unwrap();
        let objects = &map.object_layer("collision").unwrap().objects;
        assert_eq!(objects[0].kind(), ObjectKind::Rectangle);
        assert!(matches!(objects[1].kind(), ObjectKind::Polygon(points) if points.len() == 3));
        assert_eq!(objects[2].kind(), ObjectKind::Polyline);
        assert_eq!(objects[3].kind(), ObjectKind::Ellipse);
        assert_eq!(objects[4].kind(), ObjectKind::Tile);
        assert_eq!(objects[5].kind(), ObjectKind::Text);
        assert_eq!(objects[6].kind(), ObjectKind::Point);
    }

    #[test]
    fn test_properties_in_both_encodings() {
        let map = TileMap::from_json_str(MAP).unwrap();
        let objects = &map.object_layer("collision").unwrap().objects;
        assert_eq!(objects[0].properties.bounce, Some(0.5));
        assert_eq!(objects[0].properties.collide_only, None);
        assert_eq!(objects[1].properties.collide_only, Some(Side::Down));
        assert_eq!(objects[2].properties, ShapeProperties::default());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(TileMap::from_json_str("{ layers: "), Err(LevelError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = TileMap::from_json_file("/definitely/not/here/map.json");
        assert!(matches!(result, Err(LevelError::Io(_))));
    }
}
