use crossbeam_channel::TryRecvError;
use eframe::egui::{self, Align2, Color32, CursorIcon, FontId, Sense, Stroke};

use diskmap_core::human::human_bytes;
use diskmap_core::{build_tree, treemap, LoadMsg};

use crate::state::AppState;
use crate::view::{GroupPlan, PxRect, Tile, TileKind, TreemapView, HEADER_HEIGHT};

const FILL_HEADER: Color32 = Color32::WHITE;
const FILL_DIR: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);
const FILL_FILE: Color32 = Color32::from_rgb(0xdd, 0xdd, 0xdd);
const LABEL_FONT: f32 = 14.0;

pub fn draw(app: &mut AppState, ctx: &egui::Context) {
    poll_load(app, ctx);

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(Color32::WHITE))
        .show(ctx, |ui| match app.view.as_mut() {
            Some(view) => treemap_view(ui, view),
            None => loading_screen(ui),
        });
}

fn loading_screen(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(120.0);
        ui.heading("Loading disk map…");
        ui.add_space(8.0);
        ui.spinner();
    });
}

fn poll_load(app: &mut AppState, ctx: &egui::Context) {
    // Take ownership of the receiver to avoid borrowing while we might assign to it.
    let Some(rx) = app.load_rx.take() else { return };
    match rx.try_recv() {
        Ok(LoadMsg::Done { raw, info }) => {
            let tree = build_tree(&raw);
            let screen = ctx.screen_rect();
            let layout = treemap::compute(
                &tree,
                (screen.width() as f64).max(1.0),
                ((screen.height() - HEADER_HEIGHT) as f64).max(1.0),
            );
            app.view = Some(TreemapView::new(tree, layout, info));
            ctx.request_repaint();
        }
        Ok(LoadMsg::Error(_)) => {
            // The loader already logged the failure; stay on the loading screen.
        }
        Err(TryRecvError::Empty) => {
            // Put the receiver back to keep polling next frame.
            app.load_rx = Some(rx);
            ctx.request_repaint();
        }
        Err(TryRecvError::Disconnected) => {
            tracing::warn!("loader hung up without a terminal message");
        }
    }
}

fn treemap_view(ui: &mut egui::Ui, view: &mut TreemapView) {
    let (canvas, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
    let px = PxRect::new(canvas.min.x, canvas.min.y, canvas.max.x, canvas.max.y);
    let now = ui.input(|i| i.time);
    let plan = view.plan(now, px);

    let mut clicked = None;
    for group in &plan.groups {
        if let Some(tile) = draw_group(ui, view, group, canvas) {
            clicked = Some(tile);
        }
    }

    if plan.animating {
        ui.ctx().request_repaint();
    } else if let Some(tile) = clicked {
        match tile.kind {
            TileKind::Header => view.zoom_out(now),
            TileKind::Cell => view.zoom_in(tile.id, now),
        }
        ui.ctx().request_repaint();
    }
}

fn draw_group(
    ui: &mut egui::Ui,
    view: &TreemapView,
    group: &GroupPlan,
    canvas: egui::Rect,
) -> Option<Tile> {
    let painter = ui.painter_at(canvas);
    let mut clicked = None;

    for tile in &group.tiles {
        let rect = egui::Rect::from_min_max(
            egui::pos2(tile.rect.x0, tile.rect.y0),
            egui::pos2(tile.rect.x1, tile.rect.y1),
        );
        let node = view.tree().node(tile.id);
        let fill = match tile.kind {
            TileKind::Header => FILL_HEADER,
            TileKind::Cell if !node.children.is_empty() => FILL_DIR,
            TileKind::Cell => FILL_FILE,
        };
        painter.rect(
            rect,
            0.0,
            fade(fill, group.alpha),
            Stroke::new(1.0, fade(Color32::WHITE, group.alpha)),
        );

        // Name on the first line, size below it, both clipped to the tile.
        let labels = painter.with_clip_rect(rect.intersect(painter.clip_rect()));
        let name = match tile.kind {
            TileKind::Header => view.path_of(tile.id),
            TileKind::Cell => node.name.clone(),
        };
        let first = labels.text(
            egui::pos2(rect.min.x + 3.0, rect.min.y + 2.0),
            Align2::LEFT_TOP,
            name,
            FontId::proportional(LABEL_FONT),
            fade(Color32::BLACK, group.alpha),
        );
        labels.text(
            egui::pos2(rect.min.x + 3.0, first.max.y),
            Align2::LEFT_TOP,
            human_bytes(node.size),
            FontId::proportional(LABEL_FONT),
            fade(Color32::BLACK, group.alpha * 0.7),
        );

        if group.interactive {
            let sense = if tile.clickable {
                Sense::click()
            } else {
                Sense::hover()
            };
            let mut resp = ui
                .interact(rect, ui.id().with(tile.id.0), sense)
                .on_hover_text(format!(
                    "{}\n{}",
                    view.path_of(tile.id),
                    human_bytes(node.size)
                ));
            if tile.clickable {
                resp = resp.on_hover_cursor(CursorIcon::PointingHand);
            }
            if resp.clicked() {
                clicked = Some(*tile);
            }
        }
    }

    clicked
}

fn fade(color: Color32, alpha: f32) -> Color32 {
    if alpha >= 1.0 {
        color
    } else {
        color.gamma_multiply(alpha)
    }
}
