// camera.rs
use glam::{DVec2, Mat4};
use crate::{config, proximity::Position};

const METERS_PER_DEGREE_LAT: f64 = 111132.0;

/// Flat local projection around a fixed origin: x east, y north, in metres.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    origin: Position,
    meters_per_degree_lon: f64,
}

impl Projection {
    pub fn new(origin: Position) -> Self {
        let meters_per_degree_lon = 111319.5 * origin.latitude.to_radians().cos();
        Self { origin, meters_per_degree_lon }
    }

    #[inline(always)]
    pub fn to_local(&self, pos: Position) -> DVec2 {
        DVec2::new(
            (pos.longitude - self.origin.longitude) * self.meters_per_degree_lon,
            (pos.latitude - self.origin.latitude) * METERS_PER_DEGREE_LAT,
        )
    }

    pub fn to_geo(&self, local: DVec2) -> Position {
        Position::new(
            self.origin.latitude + local.y / METERS_PER_DEGREE_LAT,
            self.origin.longitude + local.x / self.meters_per_degree_lon,
        )
    }
}

/// 2D map camera. Screen pixels have y pointing down.
#[derive(Debug, Clone)]
pub struct MapView {
    pub projection: Projection,
    pub center: DVec2,
    pub meters_per_pixel: f64,
    pub width: f64,
    pub height: f64,
}

impl MapView {
    pub fn new(width: u32, height: u32) -> Self {
        let origin = Position::new(config::MAP_CENTER_LAT, config::MAP_CENTER_LON);
        Self {
            projection: Projection::new(origin),
            center: DVec2::ZERO,
            meters_per_pixel: config::INITIAL_METERS_PER_PIXEL,
            width: width.max(1) as f64,
            height: height.max(1) as f64,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as f64;
        self.height = height.max(1) as f64;
    }

    pub fn screen_to_local(&self, px: DVec2) -> DVec2 {
        let dx = px.x - self.width * 0.5;
        let dy = px.y - self.height * 0.5;
        self.center + DVec2::new(dx, -dy) * self.meters_per_pixel
    }

    pub fn local_to_screen(&self, local: DVec2) -> DVec2 {
        let d = (local - self.center) / self.meters_per_pixel;
        DVec2::new(self.width * 0.5 + d.x, self.height * 0.5 - d.y)
    }

    /// Drag the map by a pixel delta.
    pub fn pan_pixels(&mut self, delta: DVec2) {
        self.center -= DVec2::new(delta.x, -delta.y) * self.meters_per_pixel;
    }

    /// Zoom keeping the local point under `anchor_px` fixed. `steps > 0` zooms in.
    pub fn zoom_at(&mut self, anchor_px: DVec2, steps: f64) {
        let before = self.screen_to_local(anchor_px);
        self.meters_per_pixel = (self.meters_per_pixel / config::ZOOM_STEP.powf(steps))
            .clamp(config::MIN_METERS_PER_PIXEL, config::MAX_METERS_PER_PIXEL);
        let after = self.screen_to_local(anchor_px);
        self.center += before - after;
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let half_w = (self.width * 0.5 * self.meters_per_pixel) as f32;
        let half_h = (self.height * 0.5 * self.meters_per_pixel) as f32;
        let (cx, cy) = (self.center.x as f32, self.center.y as f32);
        Mat4::orthographic_rh(cx - half_w, cx + half_w, cy - half_h, cy + half_h, -1.0, 1.0)
    }

    /// Pixel space, origin top-left.
    pub fn build_screen_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(0.0, self.width as f32, self.height as f32, 0.0, -1.0, 1.0)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_mat4(m: Mat4) -> Self {
        Self { view_proj: m.to_cols_array_2d() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: DVec2, b: DVec2) -> bool {
        a.distance(b) < 1e-6
    }

    #[test]
    fn projection_round_trips_origin_area() {
        let p = Projection::new(Position::new(52.6225, 1.2414));
        assert!(close(p.to_local(Position::new(52.6225, 1.2414)), DVec2::ZERO));
        let q = Position::new(52.63, 1.25);
        let back = p.to_geo(p.to_local(q));
        assert!((back.latitude - q.latitude).abs() < 1e-9);
        assert!((back.longitude - q.longitude).abs() < 1e-9);
    }

    #[test]
    fn screen_centre_is_view_centre() {
        let view = MapView::new(800, 600);
        assert!(close(view.screen_to_local(DVec2::new(400.0, 300.0)), view.center));
        let px = DVec2::new(123.0, 456.0);
        assert!(close(view.local_to_screen(view.screen_to_local(px)), px));
    }

    #[test]
    fn screen_y_points_south() {
        let view = MapView::new(800, 600);
        let above = view.screen_to_local(DVec2::new(400.0, 100.0));
        assert!(above.y > view.center.y);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut view = MapView::new(800, 600);
        let anchor = DVec2::new(200.0, 150.0);
        let before = view.screen_to_local(anchor);
        view.zoom_at(anchor, 2.0);
        assert!(view.meters_per_pixel < config::INITIAL_METERS_PER_PIXEL);
        assert!(close(view.screen_to_local(anchor), before));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = MapView::new(800, 600);
        view.zoom_at(DVec2::ZERO, 500.0);
        assert_eq!(view.meters_per_pixel, config::MIN_METERS_PER_PIXEL);
        view.zoom_at(DVec2::ZERO, -500.0);
        assert_eq!(view.meters_per_pixel, config::MAX_METERS_PER_PIXEL);
    }

    #[test]
    fn pan_follows_the_cursor() {
        let mut view = MapView::new(800, 600);
        let grabbed = view.screen_to_local(DVec2::new(400.0, 300.0));
        view.pan_pixels(DVec2::new(50.0, -20.0));
        assert!(close(view.screen_to_local(DVec2::new(450.0, 280.0)), grabbed));
    }
}
