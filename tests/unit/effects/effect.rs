use super::*;
use crate::render::backend::RecordingBackend;

fn scene() -> (Scene, RecordingBackend) {
    let backend = RecordingBackend::new();
    (Scene::new(backend.clone()).unwrap(), backend)
}

fn wait(scene: &Scene, secs: Seconds) -> Effect {
    Effect::new(scene, "wait", |_| Ok(Transition::Wait)).run_time(secs)
}

#[test]
fn play_uses_requested_run_time_without_narrator() {
    let (scene, backend) = scene();
    let e = wait(&scene, 2.0).narrated("ignored without a narrator");
    e.play().unwrap();
    let plays = backend.plays();
    assert_eq!(plays.len(), 1);
    assert_eq!(plays[0].run_time, 2.0);
    assert_eq!(plays[0].frames, 60);
    assert_eq!(scene.time(), 2.0);
    assert_eq!(e.state(), EffectState::Completed);
}

#[test]
fn clear_defaults_to_wait_and_remove_effect_marks_cleared() {
    let (scene, backend) = scene();
    let e = wait(&scene, 0.5);
    assert!(matches!(e.clear().unwrap(), Transition::Wait));
    e.remove_effect().unwrap();
    assert_eq!(e.state(), EffectState::Cleared);
    assert_eq!(backend.plays()[0].run_time, 0.5);
}

#[test]
fn builder_failure_propagates() {
    let (scene, backend) = scene();
    let e = Effect::new(&scene, "broken", |_| {
        Err(GeomotionError::lookup_miss("nothing to animate"))
    });
    assert!(matches!(e.play(), Err(GeomotionError::LookupMiss(_))));
    assert!(backend.plays().is_empty());
    assert_eq!(e.state(), EffectState::Created);
}

#[test]
fn compose_stretches_run_time_by_stagger() {
    let (scene, _) = scene();
    let members = [wait(&scene, 1.0), wait(&scene, 2.0), wait(&scene, 1.0)];
    assert_eq!(compose(&members, 0.0).unwrap().requested_run_time(), 2.0);
    assert_eq!(compose(&members, 1.0).unwrap().requested_run_time(), 6.0);
}

#[test]
fn compose_reverses_in_parallel() {
    let (scene, _) = scene();
    let members = [wait(&scene, 1.0), wait(&scene, 1.0)];
    let composed = compose(&members, 1.0).unwrap();
    match composed.build().unwrap() {
        Transition::Group { members, lag_ratio } => {
            assert_eq!(members.len(), 2);
            assert_eq!(lag_ratio, 1.0);
        }
        other => panic!("expected group, got {other:?}"),
    }
    match composed.clear().unwrap() {
        Transition::Group { lag_ratio, .. } => assert_eq!(lag_ratio, 0.0),
        other => panic!("expected group, got {other:?}"),
    }
}

#[test]
fn compose_joins_narration_and_rejects_bad_input() {
    let (scene, _) = scene();
    let composed = compose(
        &[
            wait(&scene, 1.0).narrated("first"),
            wait(&scene, 1.0),
            wait(&scene, 1.0).narrated("second"),
        ],
        0.0,
    )
    .unwrap();
    assert_eq!(composed.narration(), Some("first second"));

    assert!(matches!(
        compose(&[], 0.0),
        Err(GeomotionError::InvalidInput(_))
    ));
    assert!(matches!(
        compose(&[wait(&scene, 1.0)], -1.0),
        Err(GeomotionError::InvalidInput(_))
    ));
}
