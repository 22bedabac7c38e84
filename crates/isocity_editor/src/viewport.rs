//! The diorama viewport: per-frame isometric rendering plus pointer
//! interaction (pan, zoom, paint).

use bevy_egui::egui;
use isocity_core::{LayerKind, TILE_HEIGHT, TILE_WIDTH, ZOOM_STEP_IN, ZOOM_STEP_OUT};

use crate::sheets::SheetTextureCache;
use crate::ui::Brush;
use crate::{CityMap, EditorMode, EditorState, SpriteAtlas};

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(24, 26, 36);
const HOVER_STROKE: egui::Color32 = egui::Color32::from_rgb(255, 220, 120);

/// Pointer interaction state. Panning and Painting are mutually exclusive
/// by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerState {
    #[default]
    Idle,
    Panning,
    Painting,
}

/// Render the viewport canvas and handle its input for this frame.
pub fn show(
    ui: &mut egui::Ui,
    editor_state: &mut EditorState,
    map: &mut CityMap,
    atlas: &SpriteAtlas,
    cache: &SheetTextureCache,
) {
    let rect = ui.available_rect_before_wrap();
    let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

    if !editor_state.view_initialized && rect.width() > 0.0 {
        editor_state.view.reset(rect.width(), rect.height());
        editor_state.view_initialized = true;
    }
    if editor_state.pending_reset_view {
        editor_state.view.reset(rect.width(), rect.height());
        editor_state.pending_reset_view = false;
    }

    handle_pointer(editor_state, map, rect, &response);

    // Wheel zoom, clamped, anchored at the fixed pan origin.
    if response.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            let factor = if scroll > 0.0 { ZOOM_STEP_IN } else { ZOOM_STEP_OUT };
            editor_state.view.zoom_by(factor);
        }
    }

    editor_state.hovered_cell = None;
    if editor_state.mode == EditorMode::Edit {
        if let Some(pos) = response.hover_pos() {
            let (gx, gy) = editor_state
                .view
                .screen_to_grid(pos.x - rect.min.x, pos.y - rect.min.y);
            if map.grid.in_bounds(gx, gy) {
                editor_state.hovered_cell = Some((gx, gy));
            }
        }
    }

    draw_city(ui, editor_state, map, atlas, cache, rect);
}

fn handle_pointer(
    editor_state: &mut EditorState,
    map: &mut CityMap,
    rect: egui::Rect,
    response: &egui::Response,
) {
    match editor_state.pointer {
        PointerState::Idle => {
            if response.drag_started_by(egui::PointerButton::Middle)
                || response.drag_started_by(egui::PointerButton::Secondary)
            {
                editor_state.pointer = PointerState::Panning;
            } else if response.drag_started_by(egui::PointerButton::Primary) {
                if editor_state.mode == EditorMode::Edit {
                    editor_state.pointer = PointerState::Painting;
                    if let Some(pos) = response.interact_pointer_pos() {
                        paint_at(editor_state, map, rect, pos);
                    }
                } else {
                    // View mode: all primary input drags the view.
                    editor_state.pointer = PointerState::Panning;
                }
            }
        }
        PointerState::Panning => {
            let delta = response.drag_delta();
            editor_state.view.pan_by(delta.x, delta.y);
            if response.drag_stopped() {
                editor_state.pointer = PointerState::Idle;
            }
        }
        PointerState::Painting => {
            if let Some(pos) = response.interact_pointer_pos() {
                paint_at(editor_state, map, rect, pos);
            }
            if response.drag_stopped() {
                editor_state.pointer = PointerState::Idle;
                editor_state.last_painted = None;
            }
        }
    }

    // A plain click never crosses the drag threshold, so it arrives here
    // instead of through the Painting state.
    if response.clicked() && editor_state.mode == EditorMode::Edit {
        if let Some(pos) = response.interact_pointer_pos() {
            paint_at(editor_state, map, rect, pos);
        }
        editor_state.last_painted = None;
    }
}

/// Apply the active brush at a viewport position. No brush means no-op;
/// out-of-bounds cells are ignored; repeated invocations on the same cell
/// within one stroke are deduplicated.
fn paint_at(editor_state: &mut EditorState, map: &mut CityMap, rect: egui::Rect, pos: egui::Pos2) {
    let Some(brush) = editor_state.active_brush.clone() else {
        return;
    };
    let (gx, gy) = editor_state
        .view
        .screen_to_grid(pos.x - rect.min.x, pos.y - rect.min.y);
    if !map.grid.in_bounds(gx, gy) {
        return;
    }
    if editor_state.last_painted == Some((gx, gy)) {
        return;
    }
    editor_state.last_painted = Some((gx, gy));

    match brush {
        Brush::Eraser => map.grid.clear_cell(gx, gy),
        Brush::Sprite { name, category } => {
            map.grid.set_layer(gx, gy, category.layer(), Some(name));
        }
    }
}

/// Paint the whole diorama: clear, depth-sort, draw layers in order,
/// culling anything outside the viewport.
fn draw_city(
    ui: &mut egui::Ui,
    editor_state: &EditorState,
    map: &CityMap,
    atlas: &SpriteAtlas,
    cache: &SheetTextureCache,
    rect: egui::Rect,
) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let view = editor_state.view;
    for (x, y, tile) in map.grid.draw_order() {
        for kind in LayerKind::DRAW_ORDER {
            let Some(name) = tile.get(kind) else {
                continue;
            };
            // Unresolved sprites are expected while sheets load (or after a
            // sheet failed) and are skipped silently.
            let Some(frame) = atlas.index.resolve(name) else {
                continue;
            };
            let Some((_, texture_id, sheet_w, sheet_h)) = cache.loaded.get(&frame.sheet) else {
                continue;
            };

            let dest = view.sprite_rect(x, y, frame.width, frame.height, 0.0);
            let dest_rect = egui::Rect::from_min_size(
                rect.min + egui::vec2(dest.x, dest.y),
                egui::vec2(dest.width, dest.height),
            );
            if !dest_rect.intersects(rect) {
                continue;
            }

            let uv = egui::Rect::from_min_max(
                egui::pos2(frame.x as f32 / sheet_w, frame.y as f32 / sheet_h),
                egui::pos2(
                    (frame.x + frame.width) as f32 / sheet_w,
                    (frame.y + frame.height) as f32 / sheet_h,
                ),
            );
            painter.image(*texture_id, dest_rect, uv, egui::Color32::WHITE);
        }
    }

    if let Some((gx, gy)) = editor_state.hovered_cell {
        draw_cell_outline(&painter, editor_state, rect, gx, gy);
    }
}

/// Diamond outline around the hovered cell.
fn draw_cell_outline(
    painter: &egui::Painter,
    editor_state: &EditorState,
    rect: egui::Rect,
    gx: i32,
    gy: i32,
) {
    let view = editor_state.view;
    let (cx, cy) = view.grid_to_screen(gx, gy);
    let center = rect.min + egui::vec2(cx, cy);
    let half_w = (TILE_WIDTH / 2.0) * view.zoom;
    let half_h = (TILE_HEIGHT / 2.0) * view.zoom;

    let points = vec![
        center + egui::vec2(0.0, -half_h),
        center + egui::vec2(half_w, 0.0),
        center + egui::vec2(0.0, half_h),
        center + egui::vec2(-half_w, 0.0),
    ];
    painter.add(egui::Shape::closed_line(
        points,
        egui::Stroke::new(1.5, HOVER_STROKE),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::BrushCategory;
    use isocity_core::{CityGrid, LayerKind};

    fn edit_state(brush: Option<Brush>) -> EditorState {
        let mut state = EditorState::default();
        state.set_mode(EditorMode::Edit);
        state.active_brush = brush;
        state.view.pan_x = 640.0;
        state.view.pan_y = 200.0;
        state
    }

    fn viewport_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(1280.0, 720.0))
    }

    fn road_brush() -> Brush {
        Brush::Sprite {
            name: "cityTiles_010.png".to_string(),
            category: BrushCategory::Road,
        }
    }

    #[test]
    fn click_at_forward_mapped_center_paints_that_cell() {
        let mut state = edit_state(Some(road_brush()));
        let mut map = CityMap {
            grid: CityGrid::new(12),
        };

        let (sx, sy) = state.view.grid_to_screen(3, 4);
        paint_at(&mut state, &mut map, viewport_rect(), egui::pos2(sx, sy));

        let tile = map.grid.get(3, 4).expect("cell painted");
        assert_eq!(tile.ground.as_deref(), Some("cityTiles_010.png"));
        assert_eq!(state.last_painted, Some((3, 4)));
    }

    #[test]
    fn eraser_removes_the_whole_cell() {
        let mut state = edit_state(Some(Brush::Eraser));
        let mut map = CityMap {
            grid: CityGrid::new(12),
        };
        map.grid
            .set_layer(2, 2, LayerKind::Building, Some("buildingTiles_001.png".into()));

        let (sx, sy) = state.view.grid_to_screen(2, 2);
        paint_at(&mut state, &mut map, viewport_rect(), egui::pos2(sx, sy));

        assert!(map.grid.get(2, 2).is_none());
    }

    #[test]
    fn no_active_brush_is_a_no_op() {
        let mut state = edit_state(None);
        let mut map = CityMap {
            grid: CityGrid::new(12),
        };
        map.grid.set_layer(1, 1, LayerKind::Ground, Some("g".into()));

        let (sx, sy) = state.view.grid_to_screen(1, 1);
        paint_at(&mut state, &mut map, viewport_rect(), egui::pos2(sx, sy));

        assert!(map.grid.get(1, 1).is_some());
        assert_eq!(state.last_painted, None);
    }

    #[test]
    fn painting_outside_the_grid_is_silent() {
        let mut state = edit_state(Some(road_brush()));
        let mut map = CityMap {
            grid: CityGrid::new(4),
        };

        let (sx, sy) = state.view.grid_to_screen(20, 20);
        paint_at(&mut state, &mut map, viewport_rect(), egui::pos2(sx, sy));

        assert_eq!(map.grid.populated_count(), 0);
        assert_eq!(state.last_painted, None);
    }

    #[test]
    fn building_brush_leaves_ground_untouched() {
        let mut state = edit_state(Some(Brush::Sprite {
            name: "buildingTiles_008.png".to_string(),
            category: BrushCategory::Building,
        }));
        let mut map = CityMap {
            grid: CityGrid::new(12),
        };
        map.grid
            .set_layer(5, 5, LayerKind::Ground, Some("landscapeTiles_067.png".into()));

        let (sx, sy) = state.view.grid_to_screen(5, 5);
        paint_at(&mut state, &mut map, viewport_rect(), egui::pos2(sx, sy));

        let tile = map.grid.get(5, 5).expect("cell present");
        assert_eq!(tile.ground.as_deref(), Some("landscapeTiles_067.png"));
        assert_eq!(tile.building.as_deref(), Some("buildingTiles_008.png"));
    }
}
