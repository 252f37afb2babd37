//! Walking-trail map for the UEA Broad.
//!
//! The pure pieces (`trail`, `proximity`, `gate`, `marker`, `panels`) carry all of the
//! decisions; `app` and `state` only wire them to a winit window and a wgpu surface.

pub mod app;
pub mod camera;
pub mod cli;
pub mod color;
pub mod config;
pub mod gate;
pub mod layout;
pub mod location;
pub mod map_loader;
pub mod marker;
pub mod panels;
pub mod proximity;
pub mod shader;
pub mod state;
pub mod trail;
pub mod vertex;
pub mod world;
