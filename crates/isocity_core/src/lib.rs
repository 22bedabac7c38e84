//! Core data structures for the isocity diorama
//!
//! This crate provides the engine-independent pieces of the city viewer
//! and editor:
//! - `CityGrid` / `Tile` / `LayerKind` - the sparse tile grid model
//! - `MapDocument` / `TileRecord` - the persisted JSON document shape
//! - `ViewTransform` - the isometric grid <-> screen mapping with pan/zoom
//! - `AtlasIndex` / `SpriteFrame` / `SheetManifest` - sprite name resolution

mod atlas;
mod document;
mod grid;
mod transform;

pub use atlas::{AtlasIndex, SheetManifest, SpriteFrame, SpriteRect};
pub use document::{MapDocument, TileRecord};
pub use grid::{CityGrid, LayerKind, Tile, DEFAULT_GRID_SIZE, DEFAULT_GROUND_SPRITE};
pub use transform::{
    DestRect, ViewTransform, MAX_ZOOM, MIN_ZOOM, TILE_HEIGHT, TILE_WIDTH, ZOOM_STEP_IN,
    ZOOM_STEP_OUT,
};
