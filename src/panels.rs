// panels.rs
// Visibility state for the info panels, tab buttons and overlay. Painting happens elsewhere.
use crate::proximity::Visibility;
use crate::trail::{slugify, Trail, TrailTables};

#[derive(Debug, Clone)]
pub struct Panel {
    pub slug: String,
    pub trail: Trail,
    pub visible: bool,
}

impl Panel {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.trail.name.clone()];
        if let Some(km) = self.trail.distance_km {
            lines.push(format!("Distance: {:.1} km", km));
        }
        if let Some(t) = self.trail.time_text() {
            lines.push(t);
        }
        lines
    }
}

/// Request to bring a panel into view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollTarget {
    pub index: usize,
    pub slug: String,
}

/// Trail info panels with one selector tab each. At most one panel is shown.
#[derive(Debug, Clone)]
pub struct PanelBoard {
    panels: Vec<Panel>,
    active: Option<usize>,
}

impl PanelBoard {
    pub fn new(tables: &TrailTables) -> Self {
        let panels = tables
            .trails()
            .map(|trail| Panel { slug: trail.slug(), trail, visible: false })
            .collect();
        Self { panels, active: None }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn visible(&self) -> Option<&Panel> {
        self.panels.iter().find(|p| p.visible)
    }

    pub fn index_of(&self, slug: &str) -> Option<usize> {
        self.panels.iter().position(|p| p.slug == slug)
    }

    fn hide_all(&mut self) {
        for p in &mut self.panels {
            p.visible = false;
        }
        self.active = None;
    }

    fn show(&mut self, idx: usize) {
        self.panels[idx].visible = true;
        self.active = Some(idx);
    }

    /// A trail on the map was clicked. Unknown trails only clear the board.
    pub fn select_trail(&mut self, name: &str) -> Option<ScrollTarget> {
        self.hide_all();
        let slug = slugify(name);
        let idx = self.index_of(&slug)?;
        self.show(idx);
        Some(ScrollTarget { index: idx, slug })
    }

    /// A selector tab was clicked: close its panel if open, otherwise make it the only one open.
    pub fn toggle_tab(&mut self, slug: &str) {
        let Some(idx) = self.index_of(slug) else {
            log::warn!("No panel for tab {:?}", slug);
            return;
        };
        let was_visible = self.panels[idx].visible;
        self.hide_all();
        if !was_visible {
            self.show(idx);
        }
    }
}

/// The about section and the trail info section swap places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AboutToggle {
    pub about_visible: bool,
    pub trail_info_visible: bool,
}

impl Default for AboutToggle {
    fn default() -> Self {
        Self { about_visible: false, trail_info_visible: true }
    }
}

impl AboutToggle {
    pub fn toggle(&mut self) {
        let was_visible = self.about_visible;
        self.about_visible = !was_visible;
        self.trail_info_visible = was_visible;
    }
}

/// Trail lines and the GPS warning, both driven by the proximity gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub trail_lines_visible: bool,
    pub warning_visible: bool,
}

impl Default for Overlay {
    fn default() -> Self {
        Self { trail_lines_visible: true, warning_visible: false }
    }
}

impl Overlay {
    pub fn apply(&mut self, visibility: Visibility) {
        let shown = visibility == Visibility::Shown;
        self.trail_lines_visible = shown;
        self.warning_visible = !shown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> PanelBoard {
        PanelBoard::new(&TrailTables::campus())
    }

    #[test]
    fn starts_closed() {
        let b = board();
        assert_eq!(b.panels().len(), 7);
        assert!(b.visible().is_none());
        assert_eq!(b.active(), None);
    }

    #[test]
    fn map_click_opens_matching_panel() {
        let mut b = board();
        let target = b.select_trail("Fair Weather Route").unwrap();
        assert_eq!(target.slug, "fairweatherroute");
        assert_eq!(b.visible().unwrap().slug, "fairweatherroute");
        assert_eq!(b.active(), Some(target.index));

        b.select_trail("Green Trail");
        assert_eq!(b.visible().unwrap().slug, "greentrail");
        assert_eq!(b.panels().iter().filter(|p| p.visible).count(), 1);
    }

    #[test]
    fn map_click_on_unknown_trail_only_hides() {
        let mut b = board();
        b.select_trail("Blue Trail");
        assert_eq!(b.select_trail("Unnamed Trail"), None);
        assert!(b.visible().is_none());
        assert_eq!(b.active(), None);
    }

    #[test]
    fn repeat_map_click_keeps_panel_open() {
        let mut b = board();
        b.select_trail("Pink Trail");
        b.select_trail("Pink Trail");
        assert_eq!(b.visible().unwrap().slug, "pinktrail");
    }

    #[test]
    fn tab_toggles_exclusively() {
        let mut b = board();
        b.toggle_tab("orangetrail");
        assert_eq!(b.visible().unwrap().slug, "orangetrail");
        let orange = b.index_of("orangetrail");
        assert_eq!(b.active(), orange);

        b.toggle_tab("graytrail");
        assert_eq!(b.visible().unwrap().slug, "graytrail");
        assert_eq!(b.panels().iter().filter(|p| p.visible).count(), 1);

        b.toggle_tab("graytrail");
        assert!(b.visible().is_none());
        assert_eq!(b.active(), None);
    }

    #[test]
    fn unknown_tab_is_ignored() {
        let mut b = board();
        b.toggle_tab("bluetrail");
        b.toggle_tab("nosuchtrail");
        assert_eq!(b.visible().unwrap().slug, "bluetrail");
    }

    #[test]
    fn panel_lines_include_time() {
        let mut b = board();
        b.select_trail("Green Trail");
        let lines = b.visible().unwrap().lines();
        assert_eq!(lines, vec!["Green Trail", "Distance: 1.7 km", "Estimated time: ~20 mins"]);
    }

    #[test]
    fn about_swaps_with_trail_info() {
        let mut t = AboutToggle::default();
        t.toggle();
        assert_eq!(t, AboutToggle { about_visible: true, trail_info_visible: false });
        t.toggle();
        assert_eq!(t, AboutToggle::default());
    }

    #[test]
    fn overlay_follows_visibility() {
        let mut o = Overlay::default();
        o.apply(Visibility::Hidden);
        assert!(!o.trail_lines_visible && o.warning_visible);
        o.apply(Visibility::Shown);
        assert!(o.trail_lines_visible && !o.warning_visible);
    }
}
