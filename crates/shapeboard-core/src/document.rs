//! The persisted canvas document exchanged with the remote store.

use crate::camera::ViewState;
use crate::geometry::normalize_shape;
use crate::shapes::Shape;
use crate::storage::{StorageError, StorageResult};
use crate::store::ShapeStore;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// One saved canvas: the shape collection plus the view it was left at.
///
/// Field names match the remote schema (`offsetX`, `updatedAt`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub shapes: Vec<Shape>,
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
}

impl Default for PersistedSnapshot {
    fn default() -> Self {
        let view = ViewState::default();
        Self {
            shapes: Vec::new(),
            zoom: view.zoom,
            offset_x: view.offset.x,
            offset_y: view.offset.y,
            updated_at: None,
        }
    }
}

impl PersistedSnapshot {
    /// Capture the store's shapes (normalized) and view, stamped with the current time.
    pub fn capture(store: &ShapeStore) -> Self {
        let view = store.view();
        Self {
            shapes: store.shapes().iter().map(normalize_shape).collect(),
            zoom: view.zoom,
            offset_x: view.offset.x,
            offset_y: view.offset.y,
            updated_at: Some(now_millis()),
        }
    }

    /// Check that the view and every shape box hold usable numbers.
    ///
    /// Negative shape sizes are allowed; they are normalized on load.
    pub fn validate(&self) -> StorageResult<()> {
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(StorageError::Invalid(format!("zoom {}", self.zoom)));
        }
        if !self.offset_x.is_finite() || !self.offset_y.is_finite() {
            return Err(StorageError::Invalid(format!(
                "offset ({}, {})",
                self.offset_x, self.offset_y
            )));
        }
        let bad_shape = self.shapes.iter().find(|shape| {
            ![shape.x, shape.y, shape.width, shape.height]
                .iter()
                .all(|v| v.is_finite())
        });
        match bad_shape {
            Some(shape) => Err(StorageError::Invalid(format!("shape {} bounds", shape.id))),
            None => Ok(()),
        }
    }

    pub fn view(&self) -> ViewState {
        ViewState::new(self.zoom, Vec2::new(self.offset_x, self.offset_y))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;
    use kurbo::Point;

    #[test]
    fn test_remote_field_names() {
        let snapshot = PersistedSnapshot {
            shapes: vec![
                Shape::new(ShapeKind::Rectangle, Point::new(1.0, 2.0), 3.0, 4.0).with_id("r1"),
            ],
            zoom: 1.5,
            offset_x: 10.0,
            offset_y: -5.0,
            updated_at: Some(1_700_000_000_000),
        };
        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(json["offsetX"], 10.0);
        assert_eq!(json["offsetY"], -5.0);
        assert_eq!(json["updatedAt"], 1_700_000_000_000u64);
        assert_eq!(json["shapes"][0]["type"], "rectangle");
    }

    #[test]
    fn test_parses_without_timestamp() {
        let json = r##"{
            "shapes": [
                {
                    "id": "e", "type": "ellipse", "fill": "#fff",
                    "x": 0, "y": 0, "width": 5, "height": 6
                }
            ],
            "zoom": 2,
            "offsetX": 1,
            "offsetY": 2
        }"##;
        let snapshot = PersistedSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.updated_at, None);
        assert_eq!(snapshot.shapes[0].kind, ShapeKind::Ellipse);
        assert_eq!(snapshot.view(), ViewState::new(2.0, Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_capture_normalizes_shapes() {
        let mut store = ShapeStore::new();
        store.add_shape(Shape::new(ShapeKind::Rectangle, Point::new(50.0, 50.0), -20.0, 10.0));
        store.set_zoom(2.0);
        let snapshot = PersistedSnapshot::capture(&store);
        assert_eq!(snapshot.shapes[0].x, 30.0);
        assert_eq!(snapshot.shapes[0].width, 20.0);
        assert_eq!(snapshot.zoom, 2.0);
        assert!(snapshot.updated_at.is_some());
    }

    #[test]
    fn test_validate() {
        let flipped = Shape::new(ShapeKind::Rectangle, Point::new(0.0, 0.0), -10.0, 5.0);
        let ok = PersistedSnapshot {
            shapes: vec![flipped.clone()],
            ..PersistedSnapshot::default()
        };
        assert!(ok.validate().is_ok());

        let zero_zoom = PersistedSnapshot {
            zoom: 0.0,
            ..ok.clone()
        };
        assert!(matches!(zero_zoom.validate(), Err(StorageError::Invalid(_))));

        let bad_offset = PersistedSnapshot {
            offset_y: f64::INFINITY,
            ..ok.clone()
        };
        assert!(bad_offset.validate().is_err());

        let mut bad_shape = flipped;
        bad_shape.height = f64::NAN;
        let bad_shapes = PersistedSnapshot {
            shapes: vec![bad_shape],
            ..ok
        };
        assert!(bad_shapes.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(PersistedSnapshot::from_json("{\"shapes\": 3}").is_err());
    }
}
