// trail.rs
use std::collections::HashMap;
use crate::config;

/// A named walking path with its resolved display colour and length.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    pub name: String,
    pub color: String,
    pub distance_km: Option<f64>,
}

impl Trail {
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// A zero or NaN distance counts as missing.
    pub fn minutes(&self) -> Option<u32> {
        self.distance_km
            .filter(|km| *km != 0.0 && !km.is_nan())
            .map(estimate_minutes)
    }

    /// Panel line for the walking time. `None` when the trail has no distance entry.
    pub fn time_text(&self) -> Option<String> {
        self.minutes().map(|m| format!("Estimated time: ~{} mins", m))
    }
}

/// Fixed lookup tables keyed by exact trail name. Built once and shared by reference.
#[derive(Debug, Clone, Default)]
pub struct TrailTables {
    colors: HashMap<String, String>,
    distances: HashMap<String, f64>,
    // Table order, used to lay out the info panels
    order: Vec<String>,
}

impl TrailTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trail(mut self, name: &str, color: &str, distance_km: f64) -> Self {
        if !self.colors.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.colors.insert(name.to_string(), color.to_string());
        self.distances.insert(name.to_string(), distance_km);
        self
    }

    /// The trails around the UEA Broad.
    pub fn campus() -> Self {
        Self::new()
            .with_trail("Green Trail", "green", 1.7)
            .with_trail("Orange Trail", "orange", 1.5)
            .with_trail("Pink Trail", "hotpink", 2.3)
            .with_trail("Purple Trail", "purple", 2.3)
            .with_trail("Gray Trail", "gray", 2.5)
            .with_trail("Blue Trail", "blue", 2.0)
            .with_trail("Fair Weather Route", "dodgerblue", 1.8)
    }

    pub fn color_of(&self, name: &str) -> &str {
        self.colors.get(name).map(String::as_str).unwrap_or(config::DEFAULT_TRAIL_COLOR)
    }

    pub fn distance_of(&self, name: &str) -> Option<f64> {
        self.distances.get(name).copied()
    }

    pub fn resolve(&self, name: &str) -> Trail {
        let trail = Trail {
            name: name.to_string(),
            color: self.color_of(name).to_string(),
            distance_km: self.distance_of(name),
        };
        if trail.distance_km.is_none() {
            log::debug!("No table entry for trail {:?}, using default styling", name);
        }
        trail
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn trails(&self) -> impl Iterator<Item = Trail> + '_ {
        self.names().map(|n| self.resolve(n))
    }
}

/// Rounded walking time in minutes at the assumed walking speed.
pub fn estimate_minutes(distance_km: f64) -> u32 {
    (distance_km / config::WALKING_SPEED_KMH * 60.0).round() as u32
}

/// Panel identifier for a trail name: lower-cased, whitespace and punctuation dropped.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}
