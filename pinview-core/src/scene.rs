/// Scene state: the camera, the screen, and the set of movable objects
use std::collections::BTreeMap;

use nalgebra::Point2;
use thiserror::Error;

use crate::geometry::{clamp, Color};
use crate::projection::{self, Camera, ConeGeometry, ProjectionError, Screen, ScreenImage};

/// Identifier of a tracked object.
///
/// Ids are handed out in insertion order, which is also draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u32);

/// A movable circular object.
#[derive(Debug, Clone, Copy)]
pub struct TrackedObject {
    pub position: Point2<f64>,
    pub radius: f64,
    pub color: Color,
}

impl TrackedObject {
    pub fn new(x: f64, y: f64, radius: f64, color: Color) -> Self {
        Self {
            position: Point2::new(x, y),
            radius,
            color,
        }
    }
}

/// Usable canvas area; object positions are clamped into it on every move.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum SceneError {
    #[error("unknown object id {0:?}")]
    UnknownObject(ObjectId),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

/// Everything a render binding needs to draw one object for one frame: the
/// circle itself, its viewing cone, and its 1D screen image.
///
/// Always a fresh snapshot derived from the current scene; never stored.
#[derive(Debug, Clone, Copy)]
pub struct ObjectView {
    pub id: ObjectId,
    pub object: TrackedObject,
    pub cone: ConeGeometry,
    pub image: ScreenImage,
}

/// The scene owns all state the frontends read: the camera, the screen, the
/// canvas bounds, and every tracked object.
pub struct Scene {
    camera: Camera,
    screen: Screen,
    bounds: Bounds,
    objects: BTreeMap<ObjectId, TrackedObject>,
    next_id: u32,
}

impl Scene {
    pub fn new(camera: Camera, screen: Screen, bounds: Bounds) -> Self {
        Self {
            camera,
            screen,
            bounds,
            objects: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// The fixed startup scene: a 400x400 canvas with the camera below a
    /// half-width screen line and three colored balls above it.
    pub fn demo() -> Self {
        let mut scene = Scene::new(
            Camera::new(200.0, 240.0, 5.0),
            Screen::new(200.0, 200.0, 200.0),
            Bounds::new(400.0, 400.0),
        );
        scene.add_object(TrackedObject::new(130.0, 174.0, 20.0, Color::RED));
        scene.add_object(TrackedObject::new(206.0, 152.0, 20.0, Color::GREEN));
        scene.add_object(TrackedObject::new(308.0, 164.0, 20.0, Color::BLUE));
        scene
    }

    pub fn add_object(&mut self, object: TrackedObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, object);
        id
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn object(&self, id: ObjectId) -> Option<&TrackedObject> {
        self.objects.get(&id)
    }

    /// All objects in draw order.
    pub fn objects(&self) -> impl DoubleEndedIterator<Item = (ObjectId, &TrackedObject)> + '_ {
        self.objects.iter().map(|(&id, object)| (id, object))
    }

    /// Move an object, clamping the new position into the canvas bounds, and
    /// recompute its derived geometry in the same call.
    ///
    /// Out-of-range coordinates are corrected, never rejected; the position
    /// is stored even when the resulting configuration cannot be projected,
    /// so the object can be dragged back out of it.
    pub fn set_position(&mut self, id: ObjectId, x: f64, y: f64) -> Result<ObjectView, SceneError> {
        let bounds = self.bounds;
        let object = self
            .objects
            .get_mut(&id)
            .ok_or(SceneError::UnknownObject(id))?;
        object.position.x = clamp(x, 0.0, bounds.width);
        object.position.y = clamp(y, 0.0, bounds.height);
        self.view(id)
    }

    /// Current derived geometry for one object.
    pub fn view(&self, id: ObjectId) -> Result<ObjectView, SceneError> {
        let object = self.objects.get(&id).ok_or(SceneError::UnknownObject(id))?;
        let projection = projection::project(&self.camera, &self.screen, object)?;
        Ok(ObjectView {
            id,
            object: *object,
            cone: projection.cone,
            image: projection.image,
        })
    }

    /// Derived geometry for every object, in draw order.
    ///
    /// An object whose projection fails is skipped for this frame; the error
    /// is logged and the session carries on.
    pub fn frame(&self) -> Vec<ObjectView> {
        self.objects
            .keys()
            .filter_map(|&id| match self.view(id) {
                Ok(view) => Some(view),
                Err(err) => {
                    log::warn!("skipping object {:?} this frame: {}", id, err);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scene_layout() {
        let scene = Scene::demo();
        assert_eq!(scene.objects().count(), 3);

        let frame = scene.frame();
        assert_eq!(frame.len(), 3);
        assert!(frame.iter().all(|view| view.image.visible));
    }

    #[test]
    fn test_set_position_clamps_to_bounds() {
        let mut scene = Scene::demo();
        let id = scene.objects().next().unwrap().0;

        let view = scene.set_position(id, -50.0, 500.0).unwrap();
        assert_eq!(view.object.position, Point2::new(0.0, 400.0));
        assert_eq!(scene.object(id).unwrap().position, Point2::new(0.0, 400.0));
    }

    #[test]
    fn test_set_position_unknown_object() {
        let mut scene = Scene::new(
            Camera::new(200.0, 240.0, 5.0),
            Screen::new(200.0, 200.0, 200.0),
            Bounds::new(400.0, 400.0),
        );
        let mut other = Scene::demo();
        let foreign = other.add_object(TrackedObject::new(10.0, 10.0, 5.0, Color::BLACK));

        let err = scene.set_position(foreign, 10.0, 10.0).unwrap_err();
        assert_eq!(err, SceneError::UnknownObject(foreign));
    }

    #[test]
    fn test_set_position_onto_camera_reports_but_stores() {
        let mut scene = Scene::demo();
        let id = scene.objects().next().unwrap().0;
        let camera = *scene.camera();

        let err = scene
            .set_position(id, camera.position.x, camera.position.y)
            .unwrap_err();
        assert_eq!(err, SceneError::Projection(ProjectionError::DegenerateCamera));

        // The move itself is kept so the object can be dragged back out.
        assert_eq!(scene.object(id).unwrap().position, camera.position);
    }

    #[test]
    fn test_frame_skips_unprojectable_object() {
        let mut scene = Scene::demo();
        let id = scene.objects().next().unwrap().0;
        let camera = *scene.camera();

        let _ = scene.set_position(id, camera.position.x, camera.position.y);
        let frame = scene.frame();
        assert_eq!(frame.len(), 2);
        assert!(frame.iter().all(|view| view.id != id));
    }

    #[test]
    fn test_ids_in_insertion_order() {
        let mut scene = Scene::new(
            Camera::new(200.0, 240.0, 5.0),
            Screen::new(200.0, 200.0, 200.0),
            Bounds::new(400.0, 400.0),
        );
        let first = scene.add_object(TrackedObject::new(50.0, 50.0, 10.0, Color::RED));
        let second = scene.add_object(TrackedObject::new(90.0, 50.0, 10.0, Color::GREEN));

        assert!(first < second);
        let ids: Vec<ObjectId> = scene.objects().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![first, second]);
    }
}
