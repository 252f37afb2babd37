// app.rs
// Event wiring: background answers arrive as user events, clicks become panel state changes.
use std::sync::Arc;
use glam::DVec2;
use winit::{
    event::*,
    event_loop::{EventLoopBuilder, EventLoopProxy, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowBuilder},
};
use crate::{
    camera::MapView,
    cli::Args,
    config,
    gate::{GateOutcome, ProximityGate},
    layout::{build_ui_mesh, UiLayout},
    location::{LocationProvider, LocationResult},
    map_loader::{spawn_loader, LoaderMessage},
    marker::{LiveMarker, MarkerChange},
    panels::{AboutToggle, Overlay, PanelBoard, ScrollTarget},
    proximity::Position,
    state::{GpuContext, RenderState},
    trail::TrailTables,
    world::{build_map_mesh, TrailLayer},
};

pub enum AppEvent {
    Trails(LoaderMessage),
    Gate(GateOutcome),
    Watch(LocationResult),
}

/// Everything the page would keep in the DOM, minus the GPU.
pub struct MapModel {
    pub tables: TrailTables,
    pub view: MapView,
    pub layer: TrailLayer,
    pub board: PanelBoard,
    pub about: AboutToggle,
    pub overlay: Overlay,
    pub marker: LiveMarker,
}

impl MapModel {
    pub fn new(tables: TrailTables, width: u32, height: u32) -> Self {
        let board = PanelBoard::new(&tables);
        Self {
            tables,
            view: MapView::new(width, height),
            layer: TrailLayer::default(),
            board,
            about: AboutToggle::default(),
            overlay: Overlay::default(),
            marker: LiveMarker::new(),
        }
    }

    pub fn layout(&self) -> UiLayout {
        UiLayout::new(self.view.width as f32, self.view.height as f32, self.board.panels().len())
    }

    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Trails(LoaderMessage::Loaded(features)) => {
                self.layer = TrailLayer::build(&features, &self.tables, &self.view);
            }
            AppEvent::Trails(LoaderMessage::Failed(e)) => {
                log::error!("Could not load trails: {}", e);
            }
            AppEvent::Gate(outcome) => self.overlay.apply(outcome.visibility),
            AppEvent::Watch(fix) => match self.marker.update(fix) {
                MarkerChange::Placed(p) => {
                    log::info!("Marker placed at {:.5}, {:.5}", p.latitude, p.longitude)
                }
                MarkerChange::Moved(p) => {
                    log::debug!("Marker moved to {:.5}, {:.5}", p.latitude, p.longitude)
                }
                MarkerChange::Unchanged => {}
            },
        }
    }

    /// Left click at a pixel: tab strip first, then trails on the map.
    pub fn click(&mut self, px: DVec2) -> Option<ScrollTarget> {
        if self.about.trail_info_visible {
            if let Some(i) = self.layout().hit_tab(px.as_vec2()) {
                let slug = self.board.panels()[i].slug.clone();
                self.board.toggle_tab(&slug);
                return None;
            }
        }

        // Hidden lines are not clickable
        if !self.overlay.trail_lines_visible {
            return None;
        }
        let point = self.view.screen_to_local(px);
        let tolerance = config::PICK_TOLERANCE_PX * self.view.meters_per_pixel;
        let name = self.layer.pick(point, tolerance)?.trail.name.clone();
        let at = self.view.projection.to_geo(point);
        log::debug!("Clicked {:?} at {:.5}, {:.5}", name, at.latitude, at.longitude);
        self.board.select_trail(&name)
    }

    /// Window title: the open panel's text, or the bare title when none is open.
    pub fn title(&self) -> String {
        match self.board.visible() {
            Some(panel) if self.about.trail_info_visible => {
                format!("{} | {}", config::WINDOW_TITLE, panel.lines().join(" | "))
            }
            _ => config::WINDOW_TITLE.to_string(),
        }
    }

    /// Number keys toggle the Nth tab.
    pub fn toggle_tab_index(&mut self, index: usize) {
        if let Some(slug) = self.board.panels().get(index).map(|p| p.slug.clone()) {
            self.board.toggle_tab(&slug);
        }
    }

    pub fn marker_position(&self) -> Option<Position> {
        self.marker.position()
    }
}

struct Drag {
    start: DVec2,
    last: DVec2,
    moved: bool,
}

// Presses that travel less than this still count as clicks
const CLICK_SLOP_PX: f64 = 3.0;

struct App {
    window: Arc<Window>,
    render: RenderState,
    model: MapModel,
    cursor: DVec2,
    drag: Option<Drag>,
    title: String,
}

impl App {
    fn redraw(&mut self) {
        let title = self.model.title();
        if title != self.title {
            self.window.set_title(&title);
            self.title = title;
        }

        let map = build_map_mesh(
            &self.model.layer,
            &self.model.overlay,
            self.model.marker_position(),
            &self.model.view,
        );
        let ui = build_ui_mesh(
            &self.model.layout(),
            &self.model.board,
            &self.model.about,
            &self.model.overlay,
        );
        self.render.upload(&self.model.view, &map, &ui);
        match self.render.render() {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.render.resize(self.render.ctx.size)
            }
            Err(e) => log::error!("Render error: {:?}", e),
        }
    }

    fn scroll_into_view(&self, target: ScrollTarget) {
        if let Some(panel) = self.model.board.panels().get(target.index) {
            log::info!("{}", panel.lines().join(" | "));
        }
    }

    fn key(&mut self, code: KeyCode, elwt: &EventLoopWindowTarget<AppEvent>) {
        let digit = match code {
            KeyCode::Digit1 => Some(0),
            KeyCode::Digit2 => Some(1),
            KeyCode::Digit3 => Some(2),
            KeyCode::Digit4 => Some(3),
            KeyCode::Digit5 => Some(4),
            KeyCode::Digit6 => Some(5),
            KeyCode::Digit7 => Some(6),
            KeyCode::Digit8 => Some(7),
            KeyCode::Digit9 => Some(8),
            _ => None,
        };
        match (code, digit) {
            (_, Some(i)) if self.model.about.trail_info_visible => self.model.toggle_tab_index(i),
            (KeyCode::KeyA, _) => self.model.about.toggle(),
            (KeyCode::Escape, _) => elwt.exit(),
            _ => return,
        }
        self.window.request_redraw();
    }

    fn window_event(&mut self, event: WindowEvent, elwt: &EventLoopWindowTarget<AppEvent>) {
        match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => {
                self.render.resize(size);
                self.model.view.resize(size.width, size.height);
                self.window.request_redraw();
            }
            WindowEvent::RedrawRequested => self.redraw(),
            WindowEvent::CursorMoved { position, .. } => {
                let p = DVec2::new(position.x, position.y);
                if let Some(drag) = self.drag.as_mut() {
                    drag.moved |= p.distance(drag.start) > CLICK_SLOP_PX;
                    let delta = p - drag.last;
                    if drag.moved && delta.length_squared() > 0.0 {
                        drag.last = p;
                        self.model.view.pan_pixels(delta);
                        self.window.request_redraw();
                    }
                }
                self.cursor = p;
            }
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => match state {
                ElementState::Pressed => {
                    self.drag = Some(Drag {
                        start: self.cursor,
                        last: self.cursor,
                        moved: false,
                    })
                }
                ElementState::Released => {
                    // A press without movement is a click
                    if let Some(Drag { moved: false, .. }) = self.drag.take() {
                        if let Some(target) = self.model.click(self.cursor) {
                            self.scroll_into_view(target);
                        }
                        self.window.request_redraw();
                    }
                }
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y as f64,
                    MouseScrollDelta::PixelDelta(p) => p.y / 50.0,
                };
                self.model.view.zoom_at(self.cursor, steps);
                self.window.request_redraw();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.key(code, elwt);
            }
            _ => {}
        }
    }
}

fn start_background_work(args: &Args, proxy: &EventLoopProxy<AppEvent>) {
    let loader_proxy = proxy.clone();
    spawn_loader(args.source(), move |msg| {
        let _ = loader_proxy.send_event(AppEvent::Trails(msg));
    });

    let device = args.location();

    // One reading decides visibility for the session
    let gate = ProximityGate::new(Position::reference(), args.haversine_mode());
    let gate_proxy = proxy.clone();
    gate.check(&device, move |outcome| {
        let _ = gate_proxy.send_event(AppEvent::Gate(outcome));
    });

    let watch_proxy = proxy.clone();
    device.watch(move |fix| {
        let _ = watch_proxy.send_event(AppEvent::Watch(fix));
    });
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let event_loop = EventLoopBuilder::<AppEvent>::with_user_event().build()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config::WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config::WINDOW_WIDTH,
                config::WINDOW_HEIGHT,
            ))
            .build(&event_loop)?,
    );

    let ctx = pollster::block_on(GpuContext::new(window.clone()))?;
    let size = ctx.size;
    let mut app = App {
        window: window.clone(),
        render: RenderState::new(ctx),
        model: MapModel::new(TrailTables::campus(), size.width, size.height),
        cursor: DVec2::ZERO,
        drag: None,
        title: config::WINDOW_TITLE.to_string(),
    };

    start_background_work(&args, &event_loop.create_proxy());

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, window_id } if window_id == app.window.id() => {
            app.window_event(event, elwt)
        }
        Event::UserEvent(ev) => {
            app.model.handle(ev);
            app.window.request_redraw();
        }
        _ => {}
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationError;
    use crate::map_loader::TrailFeature;
    use crate::proximity::Visibility;

    fn model() -> MapModel {
        let mut m = MapModel::new(TrailTables::campus(), 1280, 800);
        let o = config::MAP_CENTER_LAT;
        let features = vec![TrailFeature {
            name: "Green Trail".into(),
            lines: vec![vec![Position::new(o, 1.2400), Position::new(o, 1.2430)]],
        }];
        m.handle(AppEvent::Trails(LoaderMessage::Loaded(features)));
        m
    }

    fn on_green(m: &MapModel) -> DVec2 {
        m.view.local_to_screen(m.view.projection.to_local(Position::new(config::MAP_CENTER_LAT, 1.2415)))
    }

    #[test]
    fn clicking_a_trail_opens_its_panel() {
        let mut m = model();
        let px = on_green(&m);
        let target = m.click(px).unwrap();
        assert_eq!(target.slug, "greentrail");
        assert_eq!(m.board.visible().unwrap().slug, "greentrail");
    }

    #[test]
    fn clicking_empty_map_does_nothing() {
        let mut m = model();
        assert!(m.click(DVec2::new(640.0, 100.0)).is_none());
        assert!(m.board.visible().is_none());
    }

    #[test]
    fn tab_click_toggles() {
        let mut m = model();
        let tab = m.layout().tabs[2];
        let centre = ((tab.min + tab.max) * 0.5).as_dvec2();
        assert!(m.click(centre).is_none());
        assert_eq!(m.board.active(), Some(2));
        m.click(centre);
        assert_eq!(m.board.active(), None);
    }

    #[test]
    fn tabs_ignored_while_about_is_open() {
        let mut m = model();
        m.about.toggle();
        let tab = m.layout().tabs[0];
        m.click(((tab.min + tab.max) * 0.5).as_dvec2());
        assert_eq!(m.board.active(), None);
    }

    #[test]
    fn gate_hides_lines_and_blocks_clicks() {
        let mut m = model();
        m.handle(AppEvent::Gate(GateOutcome { distance_m: Some(2000.0), zone: None, visibility: Visibility::Hidden }));
        assert!(m.overlay.warning_visible);
        let px = on_green(&m);
        assert!(m.click(px).is_none());
    }

    #[test]
    fn gps_failure_shows_everything() {
        let mut m = model();
        m.overlay.apply(Visibility::Hidden);
        let outcome = ProximityGate::default().evaluate(Err(LocationError::PermissionDenied));
        m.handle(AppEvent::Gate(outcome));
        assert!(m.overlay.trail_lines_visible);
        assert!(!m.overlay.warning_visible);
    }

    #[test]
    fn watch_moves_marker_without_touching_overlay() {
        let mut m = model();
        let before = m.overlay;
        m.handle(AppEvent::Watch(Ok(Position::new(52.0, 1.0))));
        m.handle(AppEvent::Watch(Ok(Position::new(52.1, 1.0))));
        assert_eq!(m.marker_position(), Some(Position::new(52.1, 1.0)));
        assert_eq!(m.overlay, before);
    }

    #[test]
    fn failed_load_keeps_empty_layer() {
        let mut m = MapModel::new(TrailTables::campus(), 800, 600);
        let err = crate::map_loader::parse_features("not json").unwrap_err();
        m.handle(AppEvent::Trails(LoaderMessage::Failed(err)));
        assert!(m.layer.trails.is_empty());
    }

    #[test]
    fn title_follows_open_panel() {
        let mut m = model();
        assert_eq!(m.title(), config::WINDOW_TITLE);

        // Map click opens Green
        let px = on_green(&m);
        m.click(px);
        assert_eq!(
            m.title(),
            "UEA Broad Trails | Green Trail | Distance: 1.7 km | Estimated time: ~20 mins"
        );

        // Its tab closes it again
        let tab = m.layout().tabs[0];
        m.click(((tab.min + tab.max) * 0.5).as_dvec2());
        assert_eq!(m.title(), config::WINDOW_TITLE);

        // Opening by tab or number key shows that trail
        let orange = m.layout().tabs[1];
        m.click(((orange.min + orange.max) * 0.5).as_dvec2());
        assert!(m.title().contains("Orange Trail"));
        m.toggle_tab_index(6);
        assert!(m.title().contains("Fair Weather Route"));
        assert!(!m.title().contains("Orange Trail"));

        // A trail with no panel clears it
        m.board.select_trail("Service Road");
        assert_eq!(m.title(), config::WINDOW_TITLE);
    }

    #[test]
    fn title_hidden_behind_about() {
        let mut m = model();
        m.toggle_tab_index(0);
        m.about.toggle();
        assert_eq!(m.title(), config::WINDOW_TITLE);
        m.about.toggle();
        assert!(m.title().contains("Green Trail"));
    }

    #[test]
    fn number_keys_map_to_tabs() {
        let mut m = model();
        m.toggle_tab_index(6);
        assert_eq!(m.board.visible().unwrap().slug, "fairweatherroute");
        m.toggle_tab_index(42);
        assert_eq!(m.board.visible().unwrap().slug, "fairweatherroute");
    }
}
