//! Sprite sheet loading: manifest + image pairs registered into the atlas.
//!
//! Each sheet is an atomic unit: its JSON manifest is parsed up front and
//! its image goes through Bevy's `AssetServer`; the sheet's sprites only
//! become resolvable once both halves are in, so the viewport never sees a
//! half-loaded sheet. A failed sheet is logged and skipped without
//! disturbing the others.

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiTextureHandle};
use isocity_core::{LayerKind, SheetManifest};
use std::collections::HashMap;

use crate::{AssetsBasePath, SpriteAtlas};

/// Which palette category a sheet's sprites belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrushCategory {
    Ground,
    Road,
    Building,
    Prop,
    Vehicle,
}

impl BrushCategory {
    pub const ALL: [BrushCategory; 5] = [
        BrushCategory::Ground,
        BrushCategory::Road,
        BrushCategory::Building,
        BrushCategory::Prop,
        BrushCategory::Vehicle,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BrushCategory::Ground => "Ground",
            BrushCategory::Road => "Roads",
            BrushCategory::Building => "Buildings",
            BrushCategory::Prop => "Props",
            BrushCategory::Vehicle => "Vehicles",
        }
    }

    /// Grid layer this category paints. Road sprites replace the base
    /// ground tile rather than stacking on it, so both Ground and Road
    /// write the ground layer.
    pub fn layer(&self) -> LayerKind {
        match self {
            BrushCategory::Ground | BrushCategory::Road => LayerKind::Ground,
            BrushCategory::Building => LayerKind::Building,
            BrushCategory::Prop => LayerKind::Prop,
            BrushCategory::Vehicle => LayerKind::Vehicle,
        }
    }
}

/// A sheet the editor loads at startup: manifest + image, both by path.
#[derive(Debug, Clone, Copy)]
pub struct SheetDef {
    pub id: &'static str,
    /// Manifest path, relative to the assets directory.
    pub manifest_path: &'static str,
    /// Image path, relative to the assets directory.
    pub image_path: &'static str,
    pub category: BrushCategory,
}

/// The sheets of the diorama asset bundle.
pub const DEFAULT_SHEETS: [SheetDef; 5] = [
    SheetDef {
        id: "base",
        manifest_path: "tiles/landscapeTiles_sheet.json",
        image_path: "tiles/landscapeTiles_sheet.png",
        category: BrushCategory::Ground,
    },
    SheetDef {
        id: "city",
        manifest_path: "tiles/cityTiles_sheet.json",
        image_path: "tiles/cityTiles_sheet.png",
        category: BrushCategory::Road,
    },
    SheetDef {
        id: "buildings",
        manifest_path: "tiles/buildingTiles_sheet.json",
        image_path: "tiles/buildingTiles_sheet.png",
        category: BrushCategory::Building,
    },
    SheetDef {
        id: "details",
        manifest_path: "tiles/cityDetails_sheet.json",
        image_path: "tiles/cityDetails_sheet.png",
        category: BrushCategory::Prop,
    },
    SheetDef {
        id: "cars",
        manifest_path: "tiles/sheet_allCars.json",
        image_path: "tiles/sheet_allCars.png",
        category: BrushCategory::Vehicle,
    },
];

/// Sheets whose sprites belong to `category`.
pub fn sheets_for_category(category: BrushCategory) -> impl Iterator<Item = &'static SheetDef> {
    DEFAULT_SHEETS
        .iter()
        .filter(move |def| def.category == category)
}

/// Load state of one sheet (for UI feedback and the loading overlay).
#[derive(Debug, Clone, PartialEq)]
pub enum SheetLoadState {
    Loading,
    Loaded,
    Failed(String),
}

/// Resource tracking sheet textures registered with egui.
#[derive(Resource, Default)]
pub struct SheetTextureCache {
    /// Registered sheets: sheet id -> (handle, texture_id, width, height)
    pub loaded: HashMap<String, (Handle<Image>, egui::TextureId, f32, f32)>,
    /// Sheets whose manifest parsed but whose image is still decoding.
    pub pending: HashMap<String, (Handle<Image>, SheetManifest)>,
    /// Load state per sheet id.
    pub states: HashMap<String, SheetLoadState>,
}

impl SheetTextureCache {
    /// `(settled, total)` sheet counts for the loading overlay.
    pub fn progress(&self) -> (usize, usize) {
        let settled = self
            .states
            .values()
            .filter(|s| !matches!(s, SheetLoadState::Loading))
            .count();
        (settled, self.states.len())
    }

    pub fn all_settled(&self) -> bool {
        let (settled, total) = self.progress();
        settled == total
    }
}

/// Startup: parse every sheet manifest and queue its image load.
pub fn queue_sheet_loads(
    mut cache: ResMut<SheetTextureCache>,
    assets_base: Res<AssetsBasePath>,
    asset_server: Res<AssetServer>,
) {
    for def in &DEFAULT_SHEETS {
        let manifest_path = assets_base.0.join(def.manifest_path);
        let manifest: SheetManifest = match std::fs::read_to_string(&manifest_path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
        {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("Failed to load sheet '{}' manifest {:?}: {}", def.id, manifest_path, e);
                cache
                    .states
                    .insert(def.id.to_string(), SheetLoadState::Failed(e));
                continue;
            }
        };

        let handle: Handle<Image> = asset_server.load(def.image_path);
        cache
            .pending
            .insert(def.id.to_string(), (handle, manifest));
        cache
            .states
            .insert(def.id.to_string(), SheetLoadState::Loading);
    }
}

/// Poll pending sheet images; when one finishes decoding, register its
/// texture with egui and its manifest with the atlas in one step.
pub fn poll_sheet_images(
    mut cache: ResMut<SheetTextureCache>,
    mut atlas: ResMut<SpriteAtlas>,
    mut contexts: EguiContexts,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
) {
    if cache.pending.is_empty() {
        return;
    }

    let pending_ids: Vec<String> = cache.pending.keys().cloned().collect();
    for id in pending_ids {
        let Some((handle, _)) = cache.pending.get(&id) else {
            continue;
        };

        match asset_server.load_state(handle) {
            LoadState::Loaded => {
                let Some(image) = images.get(handle) else {
                    continue;
                };
                let width = image.width() as f32;
                let height = image.height() as f32;

                let Some((handle, manifest)) = cache.pending.remove(&id) else {
                    continue;
                };
                let texture_id = contexts.add_image(EguiTextureHandle::Strong(handle.clone()));
                let count = atlas.index.register_sheet(&id, &manifest);

                cache
                    .loaded
                    .insert(id.clone(), (handle, texture_id, width, height));
                cache.states.insert(id.clone(), SheetLoadState::Loaded);
                info!("Loaded sheet '{}' ({} sprites)", id, count);
            }
            LoadState::Failed(e) => {
                let message = format!("{}", e);
                warn!("Failed to load sheet '{}' image: {}", id, message);
                cache.pending.remove(&id);
                cache
                    .states
                    .insert(id.clone(), SheetLoadState::Failed(message));
            }
            LoadState::Loading | LoadState::NotLoaded => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_a_default_sheet() {
        for category in BrushCategory::ALL {
            assert!(
                DEFAULT_SHEETS.iter().any(|def| def.category == category),
                "no sheet for {:?}",
                category
            );
        }
    }

    #[test]
    fn road_category_paints_ground_layer() {
        assert_eq!(BrushCategory::Road.layer(), LayerKind::Ground);
        assert_eq!(BrushCategory::Ground.layer(), LayerKind::Ground);
        assert_eq!(BrushCategory::Building.layer(), LayerKind::Building);
        assert_eq!(BrushCategory::Prop.layer(), LayerKind::Prop);
        assert_eq!(BrushCategory::Vehicle.layer(), LayerKind::Vehicle);
    }

    #[test]
    fn progress_counts_settled_sheets() {
        let mut cache = SheetTextureCache::default();
        cache.states.insert("a".into(), SheetLoadState::Loading);
        cache.states.insert("b".into(), SheetLoadState::Loaded);
        cache
            .states
            .insert("c".into(), SheetLoadState::Failed("nope".into()));

        assert_eq!(cache.progress(), (2, 3));
        assert!(!cache.all_settled());

        cache.states.insert("a".into(), SheetLoadState::Loaded);
        assert!(cache.all_settled());
    }
}
