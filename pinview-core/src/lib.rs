/// Pinview Core Library - projection geometry and scene state
///
/// This library provides the stateless core of the visualization: the
/// pinhole-projection engine, the scene holding movable objects, and the
/// drag-gesture state. It performs no I/O and no drawing; the terminal and
/// web frontends consume the per-frame geometry it derives.

pub mod geometry;
pub mod input;
pub mod projection;
pub mod scene;

// Re-export commonly used types
pub use geometry::{clamp, sign, Color};
pub use input::{hit_test, DragSession};
pub use projection::{Camera, ConeGeometry, Projection, ProjectionError, Screen, ScreenImage};
pub use scene::{Bounds, ObjectId, ObjectView, Scene, SceneError, TrackedObject};
