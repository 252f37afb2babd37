// layout.rs
// Screen-space placement of the tab strip, info card and GPS warning banner.
use glam::Vec2;
use crate::{color, config, panels::{AboutToggle, Overlay, PanelBoard}, world::Mesh};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn grow(&self, by: f32) -> Self {
        Self::new(self.min - Vec2::splat(by), self.max + Vec2::splat(by))
    }
}

#[derive(Debug, Clone)]
pub struct UiLayout {
    pub tabs: Vec<Rect>,
    pub card: Rect,
    pub banner: Rect,
}

impl UiLayout {
    pub fn new(width: f32, height: f32, tab_count: usize) -> Self {
        let m = config::UI_MARGIN;
        let step = config::TAB_WIDTH + config::TAB_GAP;
        let per_row = (((width - 2.0 * m + config::TAB_GAP) / step).floor() as usize).max(1);
        let rows = tab_count.div_ceil(per_row);

        let mut tabs = Vec::with_capacity(tab_count);
        for i in 0..tab_count {
            let row = i / per_row;
            let col = i % per_row;
            // Last row sits on the bottom margin
            let y_max = height - m - (rows - 1 - row) as f32 * (config::TAB_HEIGHT + config::TAB_GAP);
            let x_min = m + col as f32 * step;
            tabs.push(Rect::new(
                Vec2::new(x_min, y_max - config::TAB_HEIGHT),
                Vec2::new(x_min + config::TAB_WIDTH, y_max),
            ));
        }

        let banner = Rect::new(Vec2::ZERO, Vec2::new(width, config::BANNER_HEIGHT));
        let card_top = config::BANNER_HEIGHT + m;
        let card = Rect::new(
            Vec2::new(width - m - config::CARD_WIDTH, card_top),
            Vec2::new(width - m, card_top + config::CARD_HEIGHT),
        );
        Self { tabs, card, banner }
    }

    pub fn hit_tab(&self, p: Vec2) -> Option<usize> {
        self.tabs.iter().position(|r| r.contains(p))
    }
}

/// Banner, tabs and the open card in pixel coordinates.
pub fn build_ui_mesh(layout: &UiLayout, board: &PanelBoard, about: &AboutToggle, overlay: &Overlay) -> Mesh {
    let mut mesh = Mesh::new();

    if overlay.warning_visible {
        mesh.push_rect(layout.banner.min, layout.banner.max, config::WARNING_COLOR);
    }

    if about.about_visible {
        mesh.push_rect(layout.card.min, layout.card.max, config::ABOUT_COLOR);
    }

    if about.trail_info_visible {
        for (i, (panel, rect)) in board.panels().iter().zip(&layout.tabs).enumerate() {
            if board.active() == Some(i) {
                let outline = rect.grow(config::ACTIVE_OUTLINE);
                mesh.push_rect(outline.min, outline.max, config::ACTIVE_COLOR);
            }
            mesh.push_rect(rect.min, rect.max, color::css_to_linear(&panel.trail.color));
        }

        if let Some(panel) = board.visible() {
            let card = layout.card;
            let trail_color = color::css_to_linear(&panel.trail.color);
            mesh.push_rect(card.min, card.max, config::CARD_COLOR);
            mesh.push_rect(card.min, Vec2::new(card.max.x, card.min.y + 36.0), trail_color);

            // Walking-time bar, full width at one hour
            if let Some(mins) = panel.trail.minutes() {
                let inner = card.max.x - card.min.x - 2.0 * config::UI_MARGIN;
                let len = inner * (mins as f32 / 60.0).min(1.0);
                let y = card.min.y + 60.0;
                let start = Vec2::new(card.min.x + config::UI_MARGIN, y);
                mesh.push_rect(start, start + Vec2::new(len, 12.0), trail_color);
            }
        }
    }
    mesh
}
