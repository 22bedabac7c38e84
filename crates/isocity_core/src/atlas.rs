//! Sprite atlas index: name -> source rectangle resolution.

use serde::Deserialize;
use std::collections::HashMap;

/// A named rectangle within a sheet, in source-image pixel coordinates.
/// One entry of a sheet manifest, as produced by the external asset
/// pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpriteRect {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The parsed manifest of one sheet.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SheetManifest {
    pub sprites: Vec<SpriteRect>,
}

/// A resolved sprite: its source rectangle plus the sheet that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFrame {
    pub sheet: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Global name -> frame mapping across all loaded sheets.
///
/// Sheets register as atomic units: a sheet's sprites only appear here once
/// both its image and its manifest are available, so a lookup never sees a
/// half-loaded sheet. Sprite names are assumed unique across sheets.
#[derive(Debug, Clone, Default)]
pub struct AtlasIndex {
    frames: HashMap<String, SpriteFrame>,
}

impl AtlasIndex {
    /// Register every rectangle of `manifest` under `sheet_id`. Returns the
    /// number of sprites registered.
    pub fn register_sheet(&mut self, sheet_id: &str, manifest: &SheetManifest) -> usize {
        for rect in &manifest.sprites {
            self.frames.insert(
                rect.name.clone(),
                SpriteFrame {
                    sheet: sheet_id.to_string(),
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                },
            );
        }
        manifest.sprites.len()
    }

    /// Look up a sprite by name. Absence is an expected state while sheets
    /// are still loading or content references sprites from a failed sheet.
    pub fn resolve(&self, name: &str) -> Option<&SpriteFrame> {
        self.frames.get(name)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// All registered sprite names belonging to `sheet_id`, sorted.
    pub fn names_for_sheet(&self, sheet_id: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .frames
            .iter()
            .filter(|(_, frame)| frame.sheet == sheet_id)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(entries: &[(&str, u32, u32, u32, u32)]) -> SheetManifest {
        SheetManifest {
            sprites: entries
                .iter()
                .map(|(name, x, y, w, h)| SpriteRect {
                    name: name.to_string(),
                    x: *x,
                    y: *y,
                    width: *w,
                    height: *h,
                })
                .collect(),
        }
    }

    #[test]
    fn register_and_resolve() {
        let mut atlas = AtlasIndex::default();
        let count = atlas.register_sheet(
            "base",
            &manifest(&[("landscapeTiles_067.png", 0, 0, 132, 99)]),
        );
        assert_eq!(count, 1);

        let frame = atlas.resolve("landscapeTiles_067.png").expect("registered");
        assert_eq!(frame.sheet, "base");
        assert_eq!((frame.x, frame.y, frame.width, frame.height), (0, 0, 132, 99));
    }

    #[test]
    fn unresolved_name_is_none() {
        let atlas = AtlasIndex::default();
        assert!(atlas.resolve("missing.png").is_none());
    }

    #[test]
    fn sheets_accumulate_into_one_index() {
        let mut atlas = AtlasIndex::default();
        atlas.register_sheet("base", &manifest(&[("a.png", 0, 0, 10, 10)]));
        atlas.register_sheet("cars", &manifest(&[("b.png", 5, 5, 20, 20)]));

        assert_eq!(atlas.len(), 2);
        assert_eq!(atlas.resolve("a.png").unwrap().sheet, "base");
        assert_eq!(atlas.resolve("b.png").unwrap().sheet, "cars");
    }

    #[test]
    fn names_for_sheet_is_sorted_and_filtered() {
        let mut atlas = AtlasIndex::default();
        atlas.register_sheet("base", &manifest(&[("b.png", 0, 0, 1, 1), ("a.png", 0, 0, 1, 1)]));
        atlas.register_sheet("cars", &manifest(&[("c.png", 0, 0, 1, 1)]));

        assert_eq!(atlas.names_for_sheet("base"), vec!["a.png", "b.png"]);
        assert_eq!(atlas.names_for_sheet("cars"), vec!["c.png"]);
    }

    #[test]
    fn manifest_parses_from_json() {
        let json = r#"{"sprites":[
            {"name":"cityTiles_010.png","x":132,"y":0,"width":132,"height":99}
        ]}"#;
        let parsed: SheetManifest = serde_json::from_str(json).expect("manifest parses");
        assert_eq!(parsed.sprites.len(), 1);
        assert_eq!(parsed.sprites[0].name, "cityTiles_010.png");
    }

    #[test]
    fn manifest_tolerates_unknown_fields() {
        let json = r#"{"sprites":[
            {"name":"x.png","x":0,"y":0,"width":1,"height":1,"pivot":0.5}
        ],"generator":"pack-tool 2.1"}"#;
        let parsed: SheetManifest = serde_json::from_str(json).expect("manifest parses");
        assert_eq!(parsed.sprites.len(), 1);
    }
}
