/// Pinhole projection of circular objects onto a 1D screen line
use nalgebra::{Point2, Vector2};
use thiserror::Error;

use crate::geometry::{clamp, sign};
use crate::scene::TrackedObject;

/// The fixed viewpoint that all projection rays pass through.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Point2<f64>,
    /// Radius of the camera's drawn glyph; not part of the projection math.
    pub radius: f64,
}

impl Camera {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            position: Point2::new(x, y),
            radius,
        }
    }
}

/// The horizontal line segment that silhouettes are projected onto.
#[derive(Debug, Clone, Copy)]
pub struct Screen {
    pub center: Point2<f64>,
    pub width: f64,
}

impl Screen {
    pub fn new(x: f64, y: f64, width: f64) -> Self {
        Self {
            center: Point2::new(x, y),
            width,
        }
    }

    pub fn y(&self) -> f64 {
        self.center.y
    }

    pub fn left(&self) -> f64 {
        self.center.x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center.x + self.width / 2.0
    }
}

/// The triangular viewing cone of one object: the camera position plus the
/// two points where its boundary rays touch the object's circle.
#[derive(Debug, Clone, Copy)]
pub struct ConeGeometry {
    pub apex: Point2<f64>,
    pub tangent1: Point2<f64>,
    pub tangent2: Point2<f64>,
}

/// The interval an object's cone sweeps out on the screen line.
///
/// `x1 <= x2` always holds, and both ends lie within the screen's extent.
#[derive(Debug, Clone, Copy)]
pub struct ScreenImage {
    pub x1: f64,
    pub x2: f64,
    pub visible: bool,
}

/// Derived geometry for one object: the viewing cone and its 1D image.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub cone: ConeGeometry,
    pub image: ScreenImage,
}

/// Precondition violations of the projection engine.
///
/// Both are reported up front; the engine never lets NaN or an unbounded
/// coordinate escape through the derived geometry.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum ProjectionError {
    /// The camera sits exactly on the object's center, so the viewing
    /// direction is undefined.
    #[error("camera coincides with the object center")]
    DegenerateCamera,
    /// The camera lies inside or on the object's circle; no tangent rays
    /// exist.
    #[error("camera inside object: distance {distance} <= radius {radius}")]
    InvalidGeometry { distance: f64, radius: f64 },
}

/// Compute the viewing cone of `object` as seen from `camera`, and the image
/// interval the cone sweeps out on `screen`.
///
/// The tangent points are built in a frame aligned with the camera-object
/// axis: at distance `dist` the circle subtends a half-angle `theta` with
/// `cos(theta) = radius / dist`, which places the tangent point at
/// `(r*sin(theta), r*cos(theta))` relative to the object center, with the
/// local y axis pointing back toward the camera. Rotating that offset into
/// world coordinates gives the two cone endpoints.
pub fn project(
    camera: &Camera,
    screen: &Screen,
    object: &TrackedObject,
) -> Result<Projection, ProjectionError> {
    let d = object.position - camera.position;
    let dist = d.norm();

    if dist == 0.0 {
        return Err(ProjectionError::DegenerateCamera);
    }
    if object.radius >= dist {
        return Err(ProjectionError::InvalidGeometry {
            distance: dist,
            radius: object.radius,
        });
    }

    // Tangent-point offset in the aligned frame; radius < dist keeps
    // cos_theta inside (0, 1), so the square root is well defined.
    let cos_theta = object.radius / dist;
    let rx = (1.0 - cos_theta * cos_theta).sqrt() * object.radius;
    let ry = cos_theta * object.radius;

    // Orthonormal basis with ey pointing from the object toward the camera.
    let ex = Vector2::new(d.y, -d.x) / dist;
    let ey = -d / dist;

    let tangent1 = object.position + ex * rx + ey * ry;
    let tangent2 = object.position - ex * rx + ey * ry;

    let ix1 = project_to_screen(camera, screen, &tangent1);
    let ix2 = project_to_screen(camera, screen, &tangent2);
    let (x1, x2) = if ix1 <= ix2 { (ix1, ix2) } else { (ix2, ix1) };

    // Hidden once the near edge of the circle crosses below the camera
    // line; exact contact stays visible.
    let visible = object.position.y - object.radius <= camera.position.y;

    Ok(Projection {
        cone: ConeGeometry {
            apex: camera.position,
            tangent1,
            tangent2,
        },
        image: ScreenImage { x1, x2, visible },
    })
}

/// Intersect the ray from the camera through `p` with the screen's line and
/// clamp the hit to the screen's extent.
///
/// A tangent point at or below the camera can never reach the screen through
/// the pinhole; it maps to an infinite sentinel on its own side, which the
/// clamp collapses to the nearest screen edge.
fn project_to_screen(camera: &Camera, screen: &Screen, p: &Point2<f64>) -> f64 {
    let ix = if p.y >= camera.position.y {
        sign(p.x - camera.position.x) * f64::INFINITY
    } else {
        (p.x - camera.position.x) / (p.y - camera.position.y) * (screen.y() - camera.position.y)
            + camera.position.x
    };
    clamp(ix, screen.left(), screen.right())
}
