//! Software-rasterized bay scene.
//!
//! The crate is split into the rasterizer host (`core`, `pipeline`), the
//! procedural geometry builders (`procgen`), the scene graph and the objects
//! that populate it (`scene`), procedural ambient audio (`audio`) and the
//! TOML/PNG/WAV edges (`io`).

pub mod app;
pub mod audio;
pub mod core;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod procgen;
pub mod scene;

pub use error::SceneError;
