//! Procedural geometry: primitives, the radial terrain builder, suspension
//! cables and the helpers that place things at random.

pub mod cable;
pub mod normals;
pub mod primitives;
pub mod scatter;
pub mod terrain;
pub mod tube;

pub use cable::{SagCurve, build_sag_curve, build_sag_curve_at, hanger_anchors, twin_cables};
pub use normals::{compute_vertex_normals, flat_shaded};
pub use terrain::{RadialMeshParams, build_radial_mesh};
pub use tube::build_tube;
