/// Pointer input: hit testing and explicit drag-session state
use nalgebra::{Point2, Vector2};

use crate::scene::{ObjectId, ObjectView, Scene, SceneError};

/// The topmost object whose circle contains `point`.
///
/// Later-created objects draw on top of earlier ones, so the scan runs in
/// reverse draw order.
pub fn hit_test(scene: &Scene, point: Point2<f64>) -> Option<ObjectId> {
    scene
        .objects()
        .rev()
        .find(|(_, object)| (object.position - point).norm() <= object.radius)
        .map(|(id, _)| id)
}

/// State of one drag gesture, created at pointer-down and carried through
/// every move until pointer-up.
///
/// Holding the grab offset keeps the object from snapping its center to the
/// pointer; holding the start position allows a cancelled gesture to put the
/// object back.
#[derive(Debug, Clone, Copy)]
pub struct DragSession {
    object_id: ObjectId,
    start_position: Point2<f64>,
    grab_offset: Vector2<f64>,
}

impl DragSession {
    /// Begin dragging the object under `pointer`, if there is one.
    pub fn begin(scene: &Scene, pointer: Point2<f64>) -> Option<DragSession> {
        let object_id = hit_test(scene, pointer)?;
        let start_position = scene.object(object_id)?.position;
        Some(DragSession {
            object_id,
            start_position,
            grab_offset: pointer - start_position,
        })
    }

    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    pub fn start_position(&self) -> Point2<f64> {
        self.start_position
    }

    /// Forward a pointer move into the scene, preserving the grab point.
    pub fn apply(&self, scene: &mut Scene, pointer: Point2<f64>) -> Result<ObjectView, SceneError> {
        let target = pointer - self.grab_offset;
        scene.set_position(self.object_id, target.x, target.y)
    }

    /// Put the object back where the gesture started.
    pub fn revert(&self, scene: &mut Scene) -> Result<ObjectView, SceneError> {
        scene.set_position(self.object_id, self.start_position.x, self.start_position.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Color;
    use crate::projection::{Camera, Screen};
    use crate::scene::{Bounds, TrackedObject};

    fn test_scene() -> Scene {
        Scene::new(
            Camera::new(200.0, 240.0, 5.0),
            Screen::new(200.0, 200.0, 200.0),
            Bounds::new(400.0, 400.0),
        )
    }

    #[test]
    fn test_hit_inside_and_outside() {
        let mut scene = test_scene();
        let id = scene.add_object(TrackedObject::new(100.0, 100.0, 20.0, Color::RED));

        assert_eq!(hit_test(&scene, Point2::new(105.0, 95.0)), Some(id));
        // Exactly on the rim still counts.
        assert_eq!(hit_test(&scene, Point2::new(120.0, 100.0)), Some(id));
        assert_eq!(hit_test(&scene, Point2::new(121.0, 100.0)), None);
    }

    #[test]
    fn test_hit_prefers_topmost() {
        let mut scene = test_scene();
        let below = scene.add_object(TrackedObject::new(100.0, 100.0, 20.0, Color::RED));
        let above = scene.add_object(TrackedObject::new(110.0, 100.0, 20.0, Color::GREEN));

        // Overlap region belongs to the later (topmost) object.
        assert_eq!(hit_test(&scene, Point2::new(105.0, 100.0)), Some(above));
        // Left of the overlap only the first object remains.
        assert_eq!(hit_test(&scene, Point2::new(85.0, 100.0)), Some(below));
    }

    #[test]
    fn test_begin_on_empty_space() {
        let scene = Scene::demo();
        assert!(DragSession::begin(&scene, Point2::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_drag_preserves_grab_offset() {
        let mut scene = test_scene();
        let id = scene.add_object(TrackedObject::new(100.0, 100.0, 20.0, Color::RED));

        // Grab 5 units right of the center, move the pointer 30 right and 10
        // up; the center must follow by the same delta.
        let drag = DragSession::begin(&scene, Point2::new(105.0, 100.0)).unwrap();
        assert_eq!(drag.object_id(), id);

        let view = drag.apply(&mut scene, Point2::new(135.0, 90.0)).unwrap();
        assert_eq!(view.object.position, Point2::new(130.0, 90.0));
    }

    #[test]
    fn test_drag_revert_restores_start() {
        let mut scene = test_scene();
        let _ = scene.add_object(TrackedObject::new(100.0, 100.0, 20.0, Color::RED));

        let drag = DragSession::begin(&scene, Point2::new(100.0, 100.0)).unwrap();
        drag.apply(&mut scene, Point2::new(300.0, 150.0)).unwrap();
        drag.revert(&mut scene).unwrap();

        let id = drag.object_id();
        assert_eq!(scene.object(id).unwrap().position, Point2::new(100.0, 100.0));
    }

    #[test]
    fn test_drag_out_of_bounds_clamps() {
        let mut scene = test_scene();
        let _ = scene.add_object(TrackedObject::new(100.0, 100.0, 20.0, Color::RED));

        let drag = DragSession::begin(&scene, Point2::new(100.0, 100.0)).unwrap();
        let view = drag.apply(&mut scene, Point2::new(-50.0, 500.0)).unwrap();
        assert_eq!(view.object.position, Point2::new(0.0, 400.0));
    }
}
