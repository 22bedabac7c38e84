//! Offline map generator
//!
//! One-shot collaborator that writes an initial city document: a crossroad
//! of two axis roads over a square of base ground, with a few props
//! scattered on the open cells.
//!
//! Run with: generate_map [path/to/city.json]

use isocity_core::{MapDocument, TileRecord, DEFAULT_GROUND_SPRITE};
use isocity_editor::{store, DEFAULT_MAP_PATH};
use std::path::PathBuf;
use std::process::ExitCode;

const MAP_SIZE: i32 = 12;

/// Road running along the x axis (upper-left to lower-right on screen).
const ROAD_ALONG_X: &str = "cityTiles_010.png";
/// Road running along the y axis (upper-right to lower-left on screen).
const ROAD_ALONG_Y: &str = "cityTiles_009.png";
const CROSSING: &str = "cityTiles_014.png";
const ROAD_AXIS: i32 = 5;
const ROAD_SPAN: std::ops::RangeInclusive<i32> = 2..=8;

const PROPS: [&str; 4] = [
    "cityDetails_021.png",
    "cityDetails_033.png",
    "cityDetails_045.png",
    "cityDetails_060.png",
];
const PROP_COUNT: usize = 10;

fn ground_for(x: i32, y: i32) -> &'static str {
    if x == ROAD_AXIS && y == ROAD_AXIS {
        CROSSING
    } else if y == ROAD_AXIS && ROAD_SPAN.contains(&x) {
        ROAD_ALONG_X
    } else if x == ROAD_AXIS && ROAD_SPAN.contains(&y) {
        ROAD_ALONG_Y
    } else {
        DEFAULT_GROUND_SPRITE
    }
}

fn build_document() -> MapDocument {
    let mut tiles = Vec::with_capacity((MAP_SIZE * MAP_SIZE) as usize);
    for x in 0..MAP_SIZE {
        for y in 0..MAP_SIZE {
            tiles.push(TileRecord {
                x,
                y,
                ground: Some(ground_for(x, y).to_string()),
                ..Default::default()
            });
        }
    }

    // Scatter props on plain ground, never on the roads.
    let mut placed = 0;
    let mut attempts = 0;
    while placed < PROP_COUNT && attempts < 1000 {
        attempts += 1;
        let x = fastrand::i32(0..MAP_SIZE);
        let y = fastrand::i32(0..MAP_SIZE);
        let tile = &mut tiles[(x * MAP_SIZE + y) as usize];
        if tile.ground.as_deref() != Some(DEFAULT_GROUND_SPRITE) || tile.prop.is_some() {
            continue;
        }
        tile.prop = Some(PROPS[fastrand::usize(..PROPS.len())].to_string());
        placed += 1;
    }

    MapDocument {
        size: MAP_SIZE as u32,
        tiles,
    }
}

fn main() -> ExitCode {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MAP_PATH));

    let document = build_document();
    match store::write_document(&path, &document) {
        Ok(()) => {
            println!(
                "Wrote {} tiles ({}x{} crossroad) to {}",
                document.tiles.len(),
                MAP_SIZE,
                MAP_SIZE,
                path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to write map: {}", e);
            ExitCode::FAILURE
        }
    }
}
