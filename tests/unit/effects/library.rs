use super::*;
use crate::foundation::core::{BezPath, Line};
use crate::model::observable::Model;
use crate::render::backend::RecordingBackend;
use crate::render::delegates::SegmentDelegate;
use crate::render::visual::Style;

fn bar(x1: f64) -> Visual {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((x1, 0.0));
    Visual::new(path, Style::default())
}

fn scene() -> (Scene, RecordingBackend) {
    let backend = RecordingBackend::new();
    (Scene::new(backend.clone()).unwrap(), backend)
}

#[test]
fn transform_reverses_to_captured_visual() {
    let (scene, backend) = scene();
    let id = scene.add(&bar(1.0)).unwrap();
    let e = transform_to(&scene, id, bar(4.0)).run_time(0.2);
    e.play().unwrap();
    assert_eq!(backend.drawable(id).unwrap().visual, bar(4.0));
    e.remove_effect().unwrap();
    assert_eq!(backend.drawable(id).unwrap().visual, bar(1.0));
}

#[test]
fn unbuilt_transform_clears_to_wait() {
    let (scene, _) = scene();
    let id = scene.add(&bar(1.0)).unwrap();
    let e = transform_to(&scene, id, bar(4.0));
    assert!(matches!(e.clear().unwrap(), Transition::Wait));
}

#[test]
fn move_camera_restores_prior_framing() {
    let (scene, _) = scene();
    let original = scene.camera();
    let zoomed = Rect::new(-1.0, -1.0, 1.0, 1.0);
    let e = move_camera(&scene, zoomed).run_time(0.2);
    e.play().unwrap();
    assert_eq!(scene.camera(), zoomed);
    e.remove_effect().unwrap();
    assert_eq!(scene.camera(), original);
}

#[test]
fn copy_subpart_allocates_on_build_and_removes_on_clear() {
    let (scene, backend) = scene();
    let line = Model::new(Line::new((0.0, 0.0), (2.0, 0.0)));
    let source = Rc::new(SegmentDelegate::new(&line, scene.theme()));
    let target = scene.add(&bar(5.0)).unwrap();

    let e = copy_subpart_onto(&scene, source, 0.0, 1.0, target).run_time(0.2);
    assert_eq!(scene.drawable_count(), 1);
    e.play().unwrap();
    assert_eq!(scene.drawable_count(), 2);
    let copy = *backend.drawable_ids().iter().max().unwrap();
    assert_ne!(copy, target);
    assert_eq!(
        backend.drawable(copy).unwrap().visual.path,
        backend.drawable(target).unwrap().visual.path
    );

    e.remove_effect().unwrap();
    assert_eq!(scene.drawable_count(), 1);
    assert!(backend.drawable(copy).is_none());
}

#[test]
fn clear_removes_every_copy_from_repeated_plays() {
    let (scene, backend) = scene();
    let line = Model::new(Line::new((0.0, 0.0), (2.0, 0.0)));
    let source = Rc::new(SegmentDelegate::new(&line, scene.theme()));
    let target = scene.add(&bar(5.0)).unwrap();

    let e = copy_subpart_onto(&scene, source, 0.0, 0.5, target).run_time(0.2);
    e.play().unwrap();
    e.play().unwrap();
    e.play().unwrap();
    assert_eq!(scene.drawable_count(), 4);

    e.remove_effect().unwrap();
    assert_eq!(scene.drawable_count(), 1);
    assert_eq!(backend.drawable_ids(), vec![target]);
    assert!(matches!(e.clear().unwrap(), Transition::Wait));
}

#[test]
fn fade_out_with_removal_cannot_be_undone() {
    let (scene, backend) = scene();
    let id = scene.add(&bar(1.0)).unwrap();
    let e = fade_out(&scene, id, true).run_time(0.1);
    e.play().unwrap();
    assert!(backend.drawable(id).is_none());
    assert!(matches!(e.clear().unwrap(), Transition::Wait));
}

#[test]
fn write_then_clear_hides_outline() {
    let (scene, backend) = scene();
    let id = scene.add(&bar(1.0)).unwrap();
    let e = write(&scene, id).run_time(0.1);
    e.play().unwrap();
    assert_eq!(backend.drawable(id).unwrap().reveal, 1.0);
    e.remove_effect().unwrap();
    assert_eq!(backend.drawable(id).unwrap().reveal, 0.0);
}
