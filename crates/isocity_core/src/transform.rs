//! Isometric view transform: grid <-> screen mapping, pan, zoom.

/// Diamond tile footprint in sheet pixels, before zoom.
pub const TILE_WIDTH: f32 = 132.0;
pub const TILE_HEIGHT: f32 = 66.0;

pub const MIN_ZOOM: f32 = 0.3;
pub const MAX_ZOOM: f32 = 2.0;

/// Multiplicative zoom step per wheel tick.
pub const ZOOM_STEP_IN: f32 = 1.1;
pub const ZOOM_STEP_OUT: f32 = 0.9;

const DEFAULT_ZOOM: f32 = 0.8;

/// Axis-aligned destination rectangle for one sprite draw, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Screen-space view state: pan offset plus uniform zoom.
///
/// Pan is intentionally unbounded; zoom is clamped to
/// `[MIN_ZOOM, MAX_ZOOM]` by every mutation path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub pan_x: f32,
    pub pan_y: f32,
    pub zoom: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl ViewTransform {
    /// Forward mapping: grid cell -> screen position of the tile's diamond
    /// center.
    pub fn grid_to_screen(&self, gx: i32, gy: i32) -> (f32, f32) {
        let x = (gx - gy) as f32 * (TILE_WIDTH / 2.0) * self.zoom + self.pan_x;
        let y = (gx + gy) as f32 * (TILE_HEIGHT / 2.0) * self.zoom + self.pan_y;
        (x, y)
    }

    /// Inverse mapping: screen point -> nearest grid cell.
    ///
    /// Exact algebraic inverse of [`grid_to_screen`](Self::grid_to_screen),
    /// so a point at a cell's forward-mapped center always resolves back to
    /// that cell.
    pub fn screen_to_grid(&self, sx: f32, sy: f32) -> (i32, i32) {
        let sx = sx - self.pan_x;
        let sy = sy - self.pan_y;
        let half_w = (TILE_WIDTH / 2.0) * self.zoom;
        let half_h = (TILE_HEIGHT / 2.0) * self.zoom;
        let gx = ((sx / half_w + sy / half_h) / 2.0).round();
        let gy = ((sy / half_h - sx / half_w) / 2.0).round();
        (gx as i32, gy as i32)
    }

    /// Destination rectangle for a sprite of `frame_width` x `frame_height`
    /// source pixels drawn at cell `(gx, gy)`.
    ///
    /// The sprite's center-bottom pixel lands on the tile's diamond center;
    /// `z_offset` lifts the sprite vertically (in unscaled pixels) for
    /// elevated layers.
    pub fn sprite_rect(
        &self,
        gx: i32,
        gy: i32,
        frame_width: u32,
        frame_height: u32,
        z_offset: f32,
    ) -> DestRect {
        let (cx, cy) = self.grid_to_screen(gx, gy);
        let w = frame_width as f32 * self.zoom;
        let h = frame_height as f32 * self.zoom;
        DestRect {
            x: cx - w / 2.0,
            y: cy - h + (TILE_HEIGHT * self.zoom / 2.0) - z_offset * self.zoom,
            width: w,
            height: h,
        }
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Multiply zoom by `factor`, clamped to the configured range. The
    /// anchor is a fixed screen point (the pan origin), not the pointer.
    pub fn zoom_by(&mut self, factor: f32) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Diorama framing: unit zoom, grid origin centered horizontally and a
    /// third of the way down the viewport.
    pub fn reset(&mut self, viewport_width: f32, viewport_height: f32) {
        self.zoom = 1.0;
        self.pan_x = viewport_width / 2.0;
        self.pan_y = viewport_height / 3.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_inverse_round_trip() {
        let transforms = [
            ViewTransform::default(),
            ViewTransform { pan_x: 512.0, pan_y: -130.5, zoom: 1.0 },
            ViewTransform { pan_x: -77.0, pan_y: 900.0, zoom: 0.3 },
            ViewTransform { pan_x: 3.25, pan_y: 0.0, zoom: 2.0 },
        ];
        for view in transforms {
            for gx in -4..12 {
                for gy in -4..12 {
                    let (sx, sy) = view.grid_to_screen(gx, gy);
                    assert_eq!(
                        view.screen_to_grid(sx, sy),
                        (gx, gy),
                        "round trip failed for ({gx},{gy}) at zoom {}",
                        view.zoom
                    );
                }
            }
        }
    }

    #[test]
    fn click_at_forward_center_resolves_to_cell() {
        let view = ViewTransform { pan_x: 640.0, pan_y: 240.0, zoom: 0.8 };
        let (sx, sy) = view.grid_to_screen(3, 4);
        assert_eq!(view.screen_to_grid(sx, sy), (3, 4));
    }

    #[test]
    fn zoom_stays_clamped_after_any_tick_sequence() {
        let mut view = ViewTransform::default();
        for _ in 0..50 {
            view.zoom_by(ZOOM_STEP_IN);
            assert!(view.zoom <= MAX_ZOOM);
        }
        assert_eq!(view.zoom, MAX_ZOOM);
        for _ in 0..200 {
            view.zoom_by(ZOOM_STEP_OUT);
            assert!(view.zoom >= MIN_ZOOM);
        }
        assert_eq!(view.zoom, MIN_ZOOM);
    }

    #[test]
    fn sprite_rect_centers_bottom_on_tile_center() {
        let view = ViewTransform { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 };
        let rect = view.sprite_rect(0, 0, 132, 200, 0.0);
        let (cx, cy) = view.grid_to_screen(0, 0);

        // Horizontally centered on the anchor.
        assert_eq!(rect.x + rect.width / 2.0, cx);
        // Bottom edge sits half a tile below the anchor, where the diamond's
        // lower point is.
        assert_eq!(rect.y + rect.height, cy + TILE_HEIGHT / 2.0);
    }

    #[test]
    fn z_offset_lifts_sprite() {
        let view = ViewTransform { pan_x: 0.0, pan_y: 0.0, zoom: 0.5 };
        let flat = view.sprite_rect(2, 2, 64, 64, 0.0);
        let raised = view.sprite_rect(2, 2, 64, 64, 10.0);
        assert_eq!(raised.y, flat.y - 10.0 * 0.5);
        assert_eq!(raised.height, flat.height);
    }

    #[test]
    fn pan_is_unbounded() {
        let mut view = ViewTransform::default();
        view.pan_by(1.0e7, -1.0e7);
        view.pan_by(1.0e7, -1.0e7);
        assert_eq!(view.pan_x, 2.0e7);
        assert_eq!(view.pan_y, -2.0e7);
    }

    #[test]
    fn reset_frames_diorama() {
        let mut view = ViewTransform { pan_x: 5.0, pan_y: 5.0, zoom: 0.4 };
        view.reset(1920.0, 1080.0);
        assert_eq!(view.zoom, 1.0);
        assert_eq!(view.pan_x, 960.0);
        assert_eq!(view.pan_y, 360.0);
    }
}
