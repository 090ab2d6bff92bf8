use super::*;
use crate::foundation::core::BezPath;
use crate::render::backend::RecordingBackend;
use crate::render::visual::Style;
use std::cell::RefCell;

fn square(size: f64) -> Visual {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((size, 0.0));
    path.line_to((size, size));
    path.close_path();
    Visual::new(path, Style::default())
}

fn scene() -> (Scene, RecordingBackend) {
    let backend = RecordingBackend::new();
    (Scene::new(backend.clone()).unwrap(), backend)
}

#[test]
fn windows_follow_lag_ratio() {
    let group = |lag| Transition::Group {
        members: vec![Transition::Wait, Transition::Wait, Transition::Wait],
        lag_ratio: lag,
    };
    let seq = group(1.0).member_windows();
    for (i, (s, e)) in seq.iter().enumerate() {
        assert!((s - i as f64 / 3.0).abs() < 1e-12);
        assert!((e - (i + 1) as f64 / 3.0).abs() < 1e-12);
    }
    assert!(group(0.0).member_windows().iter().all(|w| *w == (0.0, 1.0)));

    let half = group(0.5).member_windows();
    assert!((half[1].0 - 0.25).abs() < 1e-12);
    assert!((half[2].1 - 1.0).abs() < 1e-12);
}

#[test]
fn fade_in_ends_opaque_and_fade_out_removes() {
    let (scene, backend) = scene();
    let id = scene.add(&square(1.0)).unwrap();
    scene
        .play(&Transition::FadeIn { target: id }, 0.5)
        .unwrap();
    assert_eq!(backend.drawable(id).unwrap().opacity, 1.0);

    scene
        .play(
            &Transition::FadeOut {
                target: id,
                from: 1.0,
                remove: true,
            },
            0.5,
        )
        .unwrap();
    assert!(backend.drawable(id).is_none());
    assert!(!scene.contains(id));
}

#[test]
fn morph_lands_on_target_visual() {
    let (scene, backend) = scene();
    let id = scene.add(&square(1.0)).unwrap();
    let to = square(3.0);
    scene
        .play(
            &Transition::Morph {
                target: id,
                from: square(1.0),
                to: to.clone(),
            },
            1.0,
        )
        .unwrap();
    assert_eq!(backend.drawable(id).unwrap().visual, to);
    assert_eq!(backend.morph_count(), 31);
}

#[test]
fn indicate_restores_base() {
    let (scene, backend) = scene();
    let base = square(1.0);
    let id = scene.add(&base).unwrap();
    scene
        .play(
            &Transition::Indicate {
                target: id,
                base: base.clone(),
                scale: 1.2,
                color: Color::rgb(1.0, 0.0, 0.0),
            },
            0.4,
        )
        .unwrap();
    assert_eq!(backend.drawable(id).unwrap().visual, base);
}

#[test]
fn staggered_tweens_do_not_clobber_each_other() {
    let (scene, _backend) = scene();
    let log = Rc::new(RefCell::new(Vec::new()));
    let tween = |name: &'static str| {
        let log = Rc::clone(&log);
        Transition::Tween {
            label: name.into(),
            ease: Ease::Linear,
            driver: Rc::new(move |t: f64| {
                log.borrow_mut().push((name, t));
                Ok(())
            }),
        }
    };
    let group = Transition::Group {
        members: vec![tween("a"), tween("b")],
        lag_ratio: 1.0,
    };
    scene.play(&group, 1.0).unwrap();

    let log = log.borrow();
    let last_a = log.iter().rposition(|(n, _)| *n == "a").unwrap();
    let first_b = log.iter().position(|(n, _)| *n == "b").unwrap();
    assert!(last_a < first_b);
    assert_eq!(log[last_a].1, 1.0);
    assert_eq!(log.last().unwrap(), &("b", 1.0));
}

#[test]
fn camera_transition_moves_frame() {
    let (scene, backend) = scene();
    let to = Rect::new(0.0, 0.0, 4.0, 2.0);
    scene
        .play(
            &Transition::Camera {
                from: scene.camera(),
                to,
            },
            0.5,
        )
        .unwrap();
    assert_eq!(scene.camera(), to);
    assert_eq!(backend.camera(), Some(to));
}
