// map_loader.rs
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::thread;
use serde::Deserialize;
use thiserror::Error;
use crate::{config, proximity::Position};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not open {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("fetch failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub enum LoaderMessage {
    Loaded(Vec<TrailFeature>),
    Failed(LoadError),
}

/// Where the trail collection comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrailSource {
    File(PathBuf),
    Url(String),
}

impl TrailSource {
    pub fn from_arg(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            TrailSource::Url(arg.to_string())
        } else {
            TrailSource::File(PathBuf::from(arg))
        }
    }
}

impl Default for TrailSource {
    fn default() -> Self {
        TrailSource::File(PathBuf::from(config::MAP_FILE_PATH))
    }
}

/// One named feature with its polylines in lat/lon.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailFeature {
    pub name: String,
    pub lines: Vec<Vec<Position>>,
}

#[derive(Deserialize, Debug)]
struct FeatureCollection {
    #[serde(default)] features: Vec<Feature>,
}

#[derive(Deserialize, Debug)]
struct Feature {
    #[serde(default)] properties: Option<Properties>,
    #[serde(default)] geometry: Option<Geometry>,
}

#[derive(Deserialize, Debug)]
struct Properties {
    #[serde(default)] name: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type")]
enum Geometry {
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
    #[serde(other)]
    Unsupported,
}

// GeoJSON orders positions lon, lat[, alt]
fn to_line(coords: Vec<Vec<f64>>) -> Vec<Position> {
    coords.into_iter()
        .filter(|c| c.len() >= 2)
        .map(|c| Position::new(c[1], c[0]))
        .collect()
}

pub fn parse_features(json: &str) -> Result<Vec<TrailFeature>, LoadError> {
    let collection: FeatureCollection = serde_json::from_str(json)?;
    Ok(collect_features(collection))
}

fn collect_features(collection: FeatureCollection) -> Vec<TrailFeature> {
    let mut out = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let name = feature.properties
            .and_then(|p| p.name)
            .unwrap_or_else(|| config::UNNAMED_TRAIL.to_string());

        let lines = match feature.geometry {
            Some(Geometry::LineString { coordinates }) => vec![to_line(coordinates)],
            Some(Geometry::MultiLineString { coordinates }) => coordinates.into_iter().map(to_line).collect(),
            Some(Geometry::Unsupported) | None => {
                log::debug!("Skipping {:?}: not a line geometry", name);
                continue;
            }
        };
        let lines: Vec<_> = lines.into_iter().filter(|l| l.len() >= 2).collect();
        if lines.is_empty() {
            log::debug!("Skipping {:?}: no drawable segments", name);
            continue;
        }
        out.push(TrailFeature { name, lines });
    }
    out
}

pub fn load_features(source: &TrailSource) -> Result<Vec<TrailFeature>, LoadError> {
    let collection: FeatureCollection = match source {
        TrailSource::File(path) => {
            let file = File::open(path).map_err(|source| LoadError::Io { path: path.clone(), source })?;
            serde_json::from_reader(BufReader::new(file))?
        }
        TrailSource::Url(url) => reqwest::blocking::get(url)?.error_for_status()?.json()?,
    };
    let features = collect_features(collection);
    log::info!("Loaded {} trail features from {:?}", features.len(), source);
    Ok(features)
}

/// Loads on a worker thread and reports once through `on_done`.
pub fn spawn_loader<F>(source: TrailSource, on_done: F)
where F: FnOnce(LoaderMessage) + Send + 'static
{
    let spawned = thread::Builder::new().name("trail-loader".into()).spawn(move || {
        let msg = match load_features(&source) {
            Ok(features) => LoaderMessage::Loaded(features),
            Err(e) => LoaderMessage::Failed(e),
        };
        on_done(msg);
    });
    if let Err(e) = spawned {
        log::error!("Could not start trail loader: {}", e);
    }
}
