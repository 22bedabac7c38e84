//! Sparse city grid and tile layers

/// Sprite name painted onto any cell whose document entry omits `ground`.
pub const DEFAULT_GROUND_SPRITE: &str = "landscapeTiles_067.png";

/// Grid side used when no valid map document is available.
pub const DEFAULT_GRID_SIZE: u32 = 12;

/// One of the five visual layers a tile can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Ground,
    Road,
    Building,
    Prop,
    Vehicle,
}

impl LayerKind {
    /// Within-cell draw order. Buildings draw last so they occlude the
    /// props and vehicles standing on the same cell.
    pub const DRAW_ORDER: [LayerKind; 5] = [
        LayerKind::Ground,
        LayerKind::Road,
        LayerKind::Prop,
        LayerKind::Vehicle,
        LayerKind::Building,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LayerKind::Ground => "Ground",
            LayerKind::Road => "Road",
            LayerKind::Building => "Building",
            LayerKind::Prop => "Prop",
            LayerKind::Vehicle => "Vehicle",
        }
    }
}

/// A populated grid cell: up to five independent sprite layers.
///
/// Every layer is optional; sprite names are resolved through the atlas
/// index at draw time, so a name that no loaded sheet provides is not an
/// error here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tile {
    pub ground: Option<String>,
    pub road: Option<String>,
    pub building: Option<String>,
    pub prop: Option<String>,
    pub vehicle: Option<String>,
}

impl Tile {
    pub fn get(&self, kind: LayerKind) -> Option<&str> {
        match kind {
            LayerKind::Ground => self.ground.as_deref(),
            LayerKind::Road => self.road.as_deref(),
            LayerKind::Building => self.building.as_deref(),
            LayerKind::Prop => self.prop.as_deref(),
            LayerKind::Vehicle => self.vehicle.as_deref(),
        }
    }

    pub fn set(&mut self, kind: LayerKind, sprite: Option<String>) {
        match kind {
            LayerKind::Ground => self.ground = sprite,
            LayerKind::Road => self.road = sprite,
            LayerKind::Building => self.building = sprite,
            LayerKind::Prop => self.prop = sprite,
            LayerKind::Vehicle => self.vehicle = sprite,
        }
    }

    pub fn is_empty(&self) -> bool {
        LayerKind::DRAW_ORDER.iter().all(|k| self.get(*k).is_none())
    }
}

/// A square grid of side `size`, addressed by `(x, y)` with
/// `0 <= x, y < size`.
///
/// The grid is sparse: a cell is either absent (nothing drawn there) or a
/// populated [`Tile`]. Absence is distinct from a tile with all layers
/// empty. All mutation entry points are bounds-checked and silently ignore
/// coordinates outside the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CityGrid {
    size: u32,
    /// Cells in scan order: `x` outer, `y` inner (index `x * size + y`).
    cells: Vec<Option<Tile>>,
}

impl CityGrid {
    /// Create a grid with every cell absent.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            cells: vec![None; (size as usize) * (size as usize)],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.size && (y as u32) < self.size
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (x as u32 * self.size + y as u32) as usize
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.cells[self.index(x, y)].as_ref()
    }

    /// Set one layer of the cell at `(x, y)`.
    ///
    /// Setting a sprite on an absent cell creates the cell with all other
    /// layers empty. Clearing a layer (`None`) on an absent cell is a
    /// no-op, and a cell whose last layer is cleared stays populated (an
    /// empty tile still owns its cell; use [`clear_cell`](Self::clear_cell)
    /// to remove it). Out-of-bounds coordinates are ignored.
    pub fn set_layer(&mut self, x: i32, y: i32, kind: LayerKind, sprite: Option<String>) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        match (&mut self.cells[idx], sprite) {
            (Some(tile), sprite) => tile.set(kind, sprite),
            (slot @ None, Some(name)) => {
                let mut tile = Tile::default();
                tile.set(kind, Some(name));
                *slot = Some(tile);
            }
            (None, None) => {}
        }
    }

    /// Remove the cell at `(x, y)` entirely. Out-of-bounds coordinates and
    /// already-absent cells are ignored.
    pub fn clear_cell(&mut self, x: i32, y: i32) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        self.cells[idx] = None;
    }

    /// Populated cells in scan order (`x` outer, `y` inner).
    pub fn populated(&self) -> impl Iterator<Item = (i32, i32, &Tile)> {
        let size = self.size;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.as_ref()
                .map(|tile| ((i as u32 / size) as i32, (i as u32 % size) as i32, tile))
        })
    }

    pub fn populated_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Populated cells in painter order: ascending `(x + y)` so cells
    /// farther from the camera draw first. The sort is stable, so cells of
    /// equal depth keep their scan order.
    pub fn draw_order(&self) -> Vec<(i32, i32, &Tile)> {
        let mut cells: Vec<_> = self.populated().collect();
        cells.sort_by_key(|(x, y, _)| x + y);
        cells
    }
}

impl Default for CityGrid {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_layer_creates_cell_with_other_layers_absent() {
        let mut grid = CityGrid::new(4);
        assert!(grid.get(2, 1).is_none());

        grid.set_layer(2, 1, LayerKind::Building, Some("buildingTiles_001.png".into()));

        let tile = grid.get(2, 1).expect("cell should exist");
        assert_eq!(tile.building.as_deref(), Some("buildingTiles_001.png"));
        assert!(tile.ground.is_none());
        assert!(tile.road.is_none());
        assert!(tile.prop.is_none());
        assert!(tile.vehicle.is_none());
    }

    #[test]
    fn clear_on_absent_cell_does_not_create_it() {
        let mut grid = CityGrid::new(4);
        grid.set_layer(1, 1, LayerKind::Ground, None);
        assert!(grid.get(1, 1).is_none());
    }

    #[test]
    fn clear_cell_removes_entirely() {
        let mut grid = CityGrid::new(4);
        grid.set_layer(3, 0, LayerKind::Ground, Some("landscapeTiles_067.png".into()));
        grid.clear_cell(3, 0);
        assert!(grid.get(3, 0).is_none());
        assert_eq!(grid.populated_count(), 0);
    }

    #[test]
    fn out_of_bounds_is_silent() {
        let mut grid = CityGrid::new(4);
        grid.set_layer(-1, 0, LayerKind::Ground, Some("x".into()));
        grid.set_layer(0, 4, LayerKind::Ground, Some("x".into()));
        grid.clear_cell(99, 99);
        assert!(grid.get(-1, 0).is_none());
        assert!(grid.get(0, 4).is_none());
        assert_eq!(grid.populated_count(), 0);
    }

    #[test]
    fn draw_order_is_nondecreasing_in_depth() {
        let mut grid = CityGrid::new(5);
        for (x, y) in [(4, 4), (0, 0), (2, 3), (3, 2), (1, 0)] {
            grid.set_layer(x, y, LayerKind::Ground, Some("g".into()));
        }

        let order = grid.draw_order();
        let depths: Vec<i32> = order.iter().map(|(x, y, _)| x + y).collect();
        let mut sorted = depths.clone();
        sorted.sort();
        assert_eq!(depths, sorted);
    }

    #[test]
    fn draw_order_ties_keep_scan_order() {
        let mut grid = CityGrid::new(5);
        // All three have depth 4; scan order is x outer, y inner.
        grid.set_layer(3, 1, LayerKind::Ground, Some("a".into()));
        grid.set_layer(1, 3, LayerKind::Ground, Some("b".into()));
        grid.set_layer(2, 2, LayerKind::Ground, Some("c".into()));

        let order: Vec<(i32, i32)> = grid.draw_order().iter().map(|(x, y, _)| (*x, *y)).collect();
        assert_eq!(order, vec![(1, 3), (2, 2), (3, 1)]);
    }

    #[test]
    fn layer_draw_order_is_fixed() {
        assert_eq!(
            LayerKind::DRAW_ORDER,
            [
                LayerKind::Ground,
                LayerKind::Road,
                LayerKind::Prop,
                LayerKind::Vehicle,
                LayerKind::Building,
            ]
        );
    }

    #[test]
    fn empty_tile_is_distinct_from_absent_cell() {
        let mut grid = CityGrid::new(3);
        grid.set_layer(0, 0, LayerKind::Prop, Some("p".into()));
        grid.set_layer(0, 0, LayerKind::Prop, None);

        let tile = grid.get(0, 0).expect("cell should survive layer clear");
        assert!(tile.is_empty());
    }
}
