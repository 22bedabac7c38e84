//! Map document format: the flat JSON file the diorama is loaded from and
//! saved back to.
//!
//! ```json
//! { "size": 12, "tiles": [ { "x": 0, "y": 0, "ground": "landscapeTiles_067.png" } ] }
//! ```
//!
//! Layer fields on a tile entry are optional; absence means that layer is
//! empty. Serialization omits empty layers rather than emitting nulls so
//! documents stay compact and stable across round-trips.

use serde::{Deserialize, Serialize};

use crate::grid::{CityGrid, LayerKind, DEFAULT_GROUND_SPRITE};

/// The persisted map document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    pub size: u32,
    #[serde(default)]
    pub tiles: Vec<TileRecord>,
}

/// One populated cell in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
}

impl CityGrid {
    /// Build a grid from a document.
    ///
    /// Every cell starts absent; each record populates its `(x, y)`. A
    /// record that omits `ground` gets [`DEFAULT_GROUND_SPRITE`]; older
    /// documents rely on that default and must keep rendering the same.
    /// Records outside `0 <= x, y < size` are dropped; the count of dropped
    /// records is returned so the caller can log it.
    pub fn from_document(doc: &MapDocument) -> (Self, usize) {
        let mut grid = CityGrid::new(doc.size);
        let mut dropped = 0;
        for record in &doc.tiles {
            if !grid.in_bounds(record.x, record.y) {
                dropped += 1;
                continue;
            }
            let ground = record
                .ground
                .clone()
                .unwrap_or_else(|| DEFAULT_GROUND_SPRITE.to_string());
            grid.set_layer(record.x, record.y, LayerKind::Ground, Some(ground));
            grid.set_layer(record.x, record.y, LayerKind::Road, record.road.clone());
            grid.set_layer(record.x, record.y, LayerKind::Building, record.building.clone());
            grid.set_layer(record.x, record.y, LayerKind::Prop, record.prop.clone());
            grid.set_layer(record.x, record.y, LayerKind::Vehicle, record.vehicle.clone());
        }
        (grid, dropped)
    }

    /// Serialize back to a document: populated cells only, in scan order,
    /// with empty layers omitted.
    pub fn to_document(&self) -> MapDocument {
        let tiles = self
            .populated()
            .map(|(x, y, tile)| TileRecord {
                x,
                y,
                ground: tile.ground.clone(),
                road: tile.road.clone(),
                building: tile.building.clone(),
                prop: tile.prop.clone(),
                vehicle: tile.vehicle.clone(),
            })
            .collect();
        MapDocument {
            size: self.size(),
            tiles,
        }
    }
}
