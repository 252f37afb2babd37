// config.rs

pub const WINDOW_TITLE: &str = "UEA Broad Trails";
pub const WINDOW_WIDTH: f64 = 1280.0;
pub const WINDOW_HEIGHT: f64 = 800.0;

// --- Data ---
pub const MAP_FILE_PATH: &str = "uea-trails.geojson";
pub const UNNAMED_TRAIL: &str = "Unnamed Trail";

// --- Map View ---
// Initial centre, roughly the middle of campus
pub const MAP_CENTER_LAT: f64 = 52.6225;
pub const MAP_CENTER_LON: f64 = 1.2414;
// Zoom 15 on a web map is ~3.2 m/px at this latitude
pub const INITIAL_METERS_PER_PIXEL: f64 = 3.2;
pub const MIN_METERS_PER_PIXEL: f64 = 0.25;
pub const MAX_METERS_PER_PIXEL: f64 = 60.0;
pub const ZOOM_STEP: f64 = 1.15;

// --- Trails ---
pub const DEFAULT_TRAIL_COLOR: &str = "black";
pub const WALKING_SPEED_KMH: f64 = 5.0;
pub const TRAIL_WEIGHT_PX: f32 = 4.0;
pub const PICK_TOLERANCE_PX: f64 = 8.0;

// --- Proximity Gate ---
pub const REFERENCE_LAT: f64 = 52.6221;
pub const REFERENCE_LON: f64 = 1.2411;
pub const NEAR_LIMIT: f64 = 1600.0; // 1 mile
pub const MID_LIMIT: f64 = 3200.0; // 2 miles
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// --- Live Marker ---
pub const MARKER_RADIUS_PX: f32 = 12.5; // 25x25 icon anchored at its centre
pub const MARKER_SEGMENTS: u32 = 24;
pub const WALK_INTERVAL_MS: u64 = 1000;
pub const WALK_STEP_DEG: f64 = 0.00005;

// --- UI Layout (pixels) ---
pub const TAB_WIDTH: f32 = 56.0;
pub const TAB_HEIGHT: f32 = 28.0;
pub const TAB_GAP: f32 = 6.0;
pub const UI_MARGIN: f32 = 12.0;
pub const CARD_WIDTH: f32 = 300.0;
pub const CARD_HEIGHT: f32 = 180.0;
pub const BANNER_HEIGHT: f32 = 36.0;
pub const ACTIVE_OUTLINE: f32 = 3.0;

// --- Colours (linear RGB) ---
pub const BACKGROUND: [f32; 3] = [0.78, 0.86, 0.74];
pub const WARNING_COLOR: [f32; 3] = [0.80, 0.10, 0.08];
pub const CARD_COLOR: [f32; 3] = [0.97, 0.97, 0.95];
pub const ABOUT_COLOR: [f32; 3] = [0.16, 0.22, 0.30];
pub const ACTIVE_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const MARKER_COLOR: [f32; 3] = [0.85, 0.12, 0.12];
pub const MARKER_RIM: [f32; 3] = [1.0, 1.0, 1.0];
