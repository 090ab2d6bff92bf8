use super::*;
use crate::foundation::error::GeomotionResult;
use crate::narration::speech::{SpeechClip, SpeechSynthesizer};
use crate::render::backend::RecordingBackend;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Returns one fixed clip and records the text it was asked to speak.
struct FixedClip {
    duration: f64,
    marks: Vec<(&'static str, f64)>,
    heard: Rc<RefCell<Vec<String>>>,
}

impl SpeechSynthesizer for FixedClip {
    fn synthesize(&self, text: &str) -> GeomotionResult<SpeechClip> {
        self.heard.borrow_mut().push(text.to_owned());
        Ok(SpeechClip {
            text: text.to_owned(),
            duration: self.duration,
            bookmarks: self
                .marks
                .iter()
                .map(|(m, t)| (m.to_string(), *t))
                .collect::<BTreeMap<_, _>>(),
        })
    }
}

fn plain_scene() -> (Scene, RecordingBackend) {
    let backend = RecordingBackend::new();
    (Scene::new(backend.clone()).unwrap(), backend)
}

fn narrated_scene(
    duration: f64,
    marks: Vec<(&'static str, f64)>,
) -> (Scene, RecordingBackend, Rc<RefCell<Vec<String>>>) {
    let backend = RecordingBackend::new();
    let heard = Rc::new(RefCell::new(Vec::new()));
    let scene = Scene::builder(backend.clone())
        .narrator(FixedClip {
            duration,
            marks,
            heard: Rc::clone(&heard),
        })
        .build()
        .unwrap();
    (scene, backend, heard)
}

fn effect(scene: &Scene, secs: f64) -> Effect {
    Effect::new(scene, "tick", |_| Ok(Transition::Wait)).run_time(secs)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn parallel_shares_the_longest_duration() {
    let (scene, backend) = plain_scene();
    let s = Scheduler::new(&scene);
    s.play_parallel(
        &[effect(&scene, 1.0), effect(&scene, 3.0)],
        &PlayOpts::default(),
    )
    .unwrap();
    let plays = backend.plays();
    assert_eq!(plays.len(), 1);
    assert_eq!(plays[0].run_time, 3.0);
    assert_eq!(plays[0].windows.len(), 2);
    assert!(plays[0].windows[0].overlaps(&plays[0].windows[1]));
}

#[test]
fn speed_divides_duration() {
    let (scene, backend) = plain_scene();
    let opts = PlayOpts {
        run_time: Some(3.0),
        speed: 2.0,
        ..PlayOpts::default()
    };
    Scheduler::new(&scene)
        .play_parallel(&[effect(&scene, 1.0)], &opts)
        .unwrap();
    assert_eq!(backend.plays()[0].run_time, 1.5);

    let bad = PlayOpts {
        speed: 0.0,
        ..PlayOpts::default()
    };
    assert!(Scheduler::new(&scene)
        .play_parallel(&[effect(&scene, 1.0)], &bad)
        .is_err());
}

#[test]
fn group_staggers_within_one_budget() {
    let (scene, backend) = plain_scene();
    let opts = PlayOpts {
        run_time: Some(3.0),
        ..PlayOpts::default()
    };
    let effects: Vec<_> = (0..3).map(|_| effect(&scene, 1.0)).collect();
    Scheduler::new(&scene).play_group(&effects, &opts).unwrap();
    let plays = backend.plays();
    assert_eq!(plays.len(), 1);
    let w = &plays[0].windows;
    assert!(approx(w[0].end, 1.0) && approx(w[1].start, 1.0));
    assert!(approx(w[2].end, 3.0));
    assert!(!w[0].overlaps(&w[1]) && !w[1].overlaps(&w[2]));
}

#[test]
fn parallel_narration_clamps_and_clears_afterwards() {
    let (scene, backend, _) = narrated_scene(1.2, vec![]);
    let e = effect(&scene, 5.0).auto_remove(true);
    Scheduler::new(&scene)
        .play_parallel(&[e.clone()], &PlayOpts::narrated("say it"))
        .unwrap();
    let plays = backend.plays();
    assert!(approx(plays[0].run_time, 1.2));
    assert_eq!(plays.len(), 2, "forward then auto-remove clear");
    assert_eq!(plays[1].run_time, 5.0);
    assert_eq!(e.state(), crate::effects::effect::EffectState::Cleared);
}

#[test]
fn sequence_clears_each_member_before_the_next() {
    let (scene, backend) = plain_scene();
    let a = fade_pair(&scene, 0.5).auto_remove(true);
    let b = effect(&scene, 0.25);
    Scheduler::new(&scene).play_sequence(&[a, b]).unwrap();
    let labels: Vec<_> = backend.plays().into_iter().map(|p| p.label).collect();
    assert_eq!(labels, vec!["fade_in", "fade_out", "wait"]);
}

fn fade_pair(scene: &Scene, secs: f64) -> Effect {
    let id = scene
        .add(&crate::render::visual::Visual::new(
            crate::foundation::core::BezPath::new(),
            Default::default(),
        ))
        .unwrap();
    crate::effects::library::fade_in(scene, id).run_time(secs)
}

#[test]
fn fragments_follow_bookmarks() {
    let (scene, backend, heard) =
        narrated_scene(6.0, vec![("A", 0.0), ("B", 2.0), ("C", 3.5)]);
    let effects = [
        effect(&scene, 9.0).narrated("first part"),
        effect(&scene, 9.0).narrated("second part"),
        effect(&scene, 9.0).narrated("third part"),
    ];
    Scheduler::new(&scene)
        .play_with_narration_fragments(&effects)
        .unwrap();

    assert_eq!(
        heard.borrow()[0],
        "<bookmark mark='A'/>first part <bookmark mark='B'/>second part \
         <bookmark mark='C'/>third part"
    );
    let plays = backend.plays();
    let runs: Vec<f64> = plays.iter().map(|p| p.run_time).collect();
    assert!(approx(runs[0], 2.0));
    assert!(approx(runs[1], 1.5));
    assert!(approx(runs[2], 6.0 - 3.5 - scene.config().narration_buffer));
    // trailing buffer is waited out so speech is not cut
    assert!(approx(scene.time(), 6.0));
}

#[test]
fn fragments_without_narrator_play_in_order() {
    let (scene, backend) = plain_scene();
    let effects = [effect(&scene, 1.0), effect(&scene, 2.0)];
    Scheduler::new(&scene)
        .play_with_narration_fragments(&effects)
        .unwrap();
    let runs: Vec<f64> = backend.plays().iter().map(|p| p.run_time).collect();
    assert_eq!(runs, vec![1.0, 2.0]);
}

#[test]
fn failure_aborts_remaining_members() {
    let (scene, backend) = plain_scene();
    let broken = Effect::new(&scene, "broken", |_| {
        Err(crate::foundation::error::GeomotionError::arithmetic("boom"))
    });
    let err = Scheduler::new(&scene)
        .play_sequence(&[effect(&scene, 1.0), broken, effect(&scene, 1.0)])
        .unwrap_err();
    assert!(matches!(
        err,
        crate::foundation::error::GeomotionError::Arithmetic(_)
    ));
    assert_eq!(backend.plays().len(), 1);
}
