//! Brush palette: category tabs, eraser, and sprite thumbnails.

use bevy_egui::egui;

use crate::sheets::{sheets_for_category, BrushCategory, SheetTextureCache};
use crate::{EditorState, SpriteAtlas};

const SELECTED_STROKE: egui::Color32 = egui::Color32::from_rgb(100, 150, 255);
const THUMBNAIL_WIDTH: f32 = 40.0;

/// The active paint brush: a sprite + its category, or the eraser.
#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    Sprite { name: String, category: BrushCategory },
    Eraser,
}

pub fn render_palette(
    ctx: &egui::Context,
    editor_state: &mut EditorState,
    atlas: &SpriteAtlas,
    cache: &SheetTextureCache,
) {
    egui::SidePanel::left("brush_palette")
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("Brushes");

            ui.horizontal_wrapped(|ui| {
                for category in BrushCategory::ALL {
                    if ui
                        .selectable_label(
                            editor_state.palette_category == category,
                            category.label(),
                        )
                        .clicked()
                    {
                        editor_state.palette_category = category;
                    }
                }
            });
            ui.separator();

            let erasing = matches!(editor_state.active_brush, Some(Brush::Eraser));
            if ui.selectable_label(erasing, "Eraser").clicked() {
                editor_state.active_brush = if erasing { None } else { Some(Brush::Eraser) };
            }
            ui.separator();

            let category = editor_state.palette_category;
            let names: Vec<String> = sheets_for_category(category)
                .flat_map(|def| atlas.index.names_for_sheet(def.id))
                .map(str::to_string)
                .collect();
            egui::ScrollArea::vertical().show(ui, |ui| {
                if names.is_empty() {
                    ui.label("No sheet loaded for this category.");
                    return;
                }
                for name in &names {
                    render_brush_row(ui, editor_state, atlas, cache, category, name);
                }
            });
        });
}

fn render_brush_row(
    ui: &mut egui::Ui,
    editor_state: &mut EditorState,
    atlas: &SpriteAtlas,
    cache: &SheetTextureCache,
    category: BrushCategory,
    name: &str,
) {
    let selected = matches!(
        &editor_state.active_brush,
        Some(Brush::Sprite { name: active, .. }) if active == name
    );
    let mut clicked = false;

    ui.horizontal(|ui| {
        if let Some(frame) = atlas.index.resolve(name) {
            if let Some((_, texture_id, sheet_w, sheet_h)) = cache.loaded.get(&frame.sheet) {
                let uv = egui::Rect::from_min_max(
                    egui::pos2(frame.x as f32 / sheet_w, frame.y as f32 / sheet_h),
                    egui::pos2(
                        (frame.x + frame.width) as f32 / sheet_w,
                        (frame.y + frame.height) as f32 / sheet_h,
                    ),
                );
                let scale = THUMBNAIL_WIDTH / frame.width.max(1) as f32;
                let display_size =
                    egui::vec2(frame.width as f32 * scale, frame.height as f32 * scale);

                #[allow(deprecated)]
                let response = ui.add(
                    egui::ImageButton::new(egui::load::SizedTexture::new(
                        *texture_id,
                        display_size,
                    ))
                    .uv(uv)
                    .frame(false)
                    .rounding(0.0),
                );
                if response.clicked() {
                    clicked = true;
                }
                if selected {
                    ui.painter().rect_stroke(
                        response.rect,
                        0.0,
                        egui::Stroke::new(2.0, SELECTED_STROKE),
                        egui::StrokeKind::Inside,
                    );
                }
            }
        }
        if ui.selectable_label(selected, name).clicked() {
            clicked = true;
        }
    });

    if clicked {
        editor_state.active_brush = Some(Brush::Sprite {
            name: name.to_string(),
            category,
        });
    }
}
