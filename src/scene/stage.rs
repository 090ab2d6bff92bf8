//! Scene clock, drawable bookkeeping and blocking transition playback.

use crate::effects::transition::Transition;
use crate::foundation::core::{Rect, Seconds};
use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::narration::speech::{NarrationTrack, SpeechSynthesizer};
use crate::render::backend::{DrawableId, PlayRequest, RenderBackend, Window};
use crate::render::visual::Visual;
use crate::scene::config::{SceneConfig, Theme};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug)]
struct DrawableState {
    visual: Visual,
    opacity: f64,
}

struct SceneInner {
    config: SceneConfig,
    backend: RefCell<Box<dyn RenderBackend>>,
    narrator: Option<Box<dyn SpeechSynthesizer>>,
    clock: Cell<Seconds>,
    next_drawable: Cell<u64>,
    camera: Cell<Rect>,
    z_floor: Cell<i32>,
    drawables: RefCell<BTreeMap<DrawableId, DrawableState>>,
}

/// Handle to a scene. Clones share the same clock, backend and drawables.
///
/// Everything runs on the calling thread. [`Scene::play`] is one blocking call that steps the
/// transition frame by frame and advances the clock by the full run time.
#[derive(Clone)]
pub struct Scene {
    inner: Rc<SceneInner>,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("time", &self.inner.clock.get())
            .field("drawables", &self.inner.drawables.borrow().len())
            .field("narrator", &self.inner.narrator.is_some())
            .finish()
    }
}

/// Builder for [`Scene`].
pub struct SceneBuilder {
    config: SceneConfig,
    backend: Box<dyn RenderBackend>,
    narrator: Option<Box<dyn SpeechSynthesizer>>,
}

impl SceneBuilder {
    /// Start from the default configuration.
    pub fn new(backend: impl RenderBackend + 'static) -> Self {
        Self {
            config: SceneConfig::default(),
            backend: Box::new(backend),
            narrator: None,
        }
    }

    /// Replace the configuration.
    pub fn config(mut self, config: SceneConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable narration-aware timing.
    pub fn narrator(mut self, narrator: impl SpeechSynthesizer + 'static) -> Self {
        self.narrator = Some(Box::new(narrator));
        self
    }

    /// Validate the configuration and hand the initial camera to the backend.
    pub fn build(self) -> GeomotionResult<Scene> {
        self.config.validate()?;
        let mut backend = self.backend;
        backend.set_camera(self.config.camera)?;
        Ok(Scene {
            inner: Rc::new(SceneInner {
                camera: Cell::new(self.config.camera),
                config: self.config,
                backend: RefCell::new(backend),
                narrator: self.narrator,
                clock: Cell::new(0.0),
                next_drawable: Cell::new(1),
                z_floor: Cell::new(0),
                drawables: RefCell::new(BTreeMap::new()),
            }),
        })
    }
}

impl Scene {
    /// Scene with the default configuration and no narrator.
    pub fn new(backend: impl RenderBackend + 'static) -> GeomotionResult<Self> {
        SceneBuilder::new(backend).build()
    }

    /// See [`SceneBuilder`].
    pub fn builder(backend: impl RenderBackend + 'static) -> SceneBuilder {
        SceneBuilder::new(backend)
    }

    /// Active configuration.
    pub fn config(&self) -> &SceneConfig {
        &self.inner.config
    }

    /// Delegate styling.
    pub fn theme(&self) -> &Theme {
        &self.inner.config.theme
    }

    /// Frames per second.
    pub fn fps(&self) -> f64 {
        self.inner.config.fps
    }

    /// Length of one frame.
    pub fn frame_duration(&self) -> Seconds {
        1.0 / self.inner.config.fps
    }

    /// Current scene time.
    pub fn time(&self) -> Seconds {
        self.inner.clock.get()
    }

    /// `true` when a speech synthesizer is configured.
    pub fn has_narrator(&self) -> bool {
        self.inner.narrator.is_some()
    }

    /// Current camera frame.
    pub fn camera(&self) -> Rect {
        self.inner.camera.get()
    }

    /// Move the camera immediately.
    pub fn set_camera(&self, frame: Rect) -> GeomotionResult<()> {
        self.inner.backend.borrow_mut().set_camera(frame)?;
        self.inner.camera.set(frame);
        Ok(())
    }

    /// Add a drawable on top of everything else.
    pub fn add(&self, visual: &Visual) -> GeomotionResult<DrawableId> {
        let id = DrawableId(self.inner.next_drawable.get());
        self.inner.backend.borrow_mut().add_to_scene(id, visual)?;
        self.inner.next_drawable.set(id.0 + 1);
        self.inner.drawables.borrow_mut().insert(
            id,
            DrawableState {
                visual: visual.clone(),
                opacity: 1.0,
            },
        );
        Ok(id)
    }

    /// Add a drawable beneath every existing one.
    pub fn add_to_back(&self, visual: &Visual) -> GeomotionResult<DrawableId> {
        let id = self.add(visual)?;
        let z = self.inner.z_floor.get() - 1;
        self.inner.backend.borrow_mut().set_z_order(id, z)?;
        self.inner.z_floor.set(z);
        Ok(id)
    }

    /// `true` while `id` is in the scene.
    pub fn contains(&self, id: DrawableId) -> bool {
        self.inner.drawables.borrow().contains_key(&id)
    }

    /// Number of drawables in the scene.
    pub fn drawable_count(&self) -> usize {
        self.inner.drawables.borrow().len()
    }

    /// Last visual handed to the backend for `id`.
    pub fn visual(&self, id: DrawableId) -> GeomotionResult<Visual> {
        self.with_state(id, |s| s.visual.clone())
    }

    /// Current opacity of `id`.
    pub fn opacity(&self, id: DrawableId) -> GeomotionResult<f64> {
        self.with_state(id, |s| s.opacity)
    }

    /// Morph `id` into `visual`.
    pub fn morph(&self, id: DrawableId, visual: &Visual) -> GeomotionResult<()> {
        self.with_state(id, |_| ())?;
        self.inner.backend.borrow_mut().morph_to(id, visual)?;
        self.with_state_mut(id, |s| s.visual = visual.clone())
    }

    /// Set the opacity of `id`.
    pub fn set_opacity(&self, id: DrawableId, opacity: f64) -> GeomotionResult<()> {
        let opacity = opacity.clamp(0.0, 1.0);
        self.with_state(id, |_| ())?;
        self.inner.backend.borrow_mut().set_opacity(id, opacity)?;
        self.with_state_mut(id, |s| s.opacity = opacity)
    }

    /// Reveal the leading `fraction` of the outline of `id`.
    pub fn set_reveal(&self, id: DrawableId, fraction: f64) -> GeomotionResult<()> {
        self.with_state(id, |_| ())?;
        self.inner
            .backend
            .borrow_mut()
            .set_reveal(id, fraction.clamp(0.0, 1.0))
    }

    /// Take `id` out of the scene.
    pub fn remove(&self, id: DrawableId) -> GeomotionResult<()> {
        self.with_state(id, |_| ())?;
        self.inner.backend.borrow_mut().remove_from_scene(id)?;
        self.inner.drawables.borrow_mut().remove(&id);
        Ok(())
    }

    /// Play `transition` for `run_time` seconds.
    ///
    /// Presents `ceil(run_time * fps)` frames (at least one) and advances the clock by exactly
    /// `run_time`. The backend sees `end_play` even when a frame fails.
    #[tracing::instrument(skip(self, transition), fields(label = %transition.label()))]
    pub fn play(&self, transition: &Transition, run_time: Seconds) -> GeomotionResult<()> {
        if !run_time.is_finite() || run_time <= 0.0 {
            return Err(GeomotionError::playback(format!(
                "run time must be finite and > 0, got {run_time}"
            )));
        }
        let start = self.time();
        let frames = ((run_time * self.fps() - 1e-9).ceil() as u64).max(1);
        let request = PlayRequest {
            label: transition.label().to_owned(),
            start,
            run_time,
            windows: transition
                .member_windows()
                .into_iter()
                .map(|(s, e)| Window {
                    start: start + s * run_time,
                    end: start + e * run_time,
                })
                .collect(),
            frames,
        };
        self.inner.backend.borrow_mut().begin_play(&request)?;

        let stepped = (|| {
            transition.begin(self)?;
            let mut prev = 0.0;
            for i in 1..=frames {
                let alpha = i as f64 / frames as f64;
                transition.step(self, prev, alpha)?;
                prev = alpha;
                self.inner
                    .backend
                    .borrow_mut()
                    .present_frame(start + alpha * run_time)?;
            }
            transition.finish(self)
        })();
        let ended = self.inner.backend.borrow_mut().end_play();
        self.inner.clock.set(start + run_time);
        stepped?;
        ended
    }

    /// Hold the current frame for `secs`. Non-positive durations are a no-op.
    pub fn wait(&self, secs: Seconds) -> GeomotionResult<()> {
        if !secs.is_finite() {
            return Err(GeomotionError::playback(format!(
                "wait must be finite, got {secs}"
            )));
        }
        if secs <= 1e-9 {
            return Ok(());
        }
        self.play(&Transition::Wait, secs)
    }

    /// Start speaking `text` at the current time.
    ///
    /// Returns `None` when no narrator is configured.
    pub fn narrate(&self, text: &str) -> GeomotionResult<Option<NarrationTrack>> {
        let Some(narrator) = self.inner.narrator.as_ref() else {
            return Ok(None);
        };
        let clip = narrator.synthesize(text)?;
        let at = self.time();
        self.inner
            .backend
            .borrow_mut()
            .start_narration(&clip.text, at, clip.duration)?;
        tracing::debug!(at, duration = clip.duration, "narration started");
        Ok(Some(NarrationTrack::new(clip, at, self.clone())))
    }

    /// Play `transition` with the narration clamp applied.
    ///
    /// With narration and a narrator, the run time is `min(requested, clip duration)` and the
    /// scene then waits out the rest of the speech. Otherwise `requested` is used unchanged.
    pub fn play_narrated(
        &self,
        transition: &Transition,
        requested: Seconds,
        narration: Option<&str>,
    ) -> GeomotionResult<()> {
        let track = match narration {
            Some(text) => self.narrate(text)?,
            None => None,
        };
        let Some(track) = track else {
            return self.play(transition, requested);
        };
        let run_time = requested.min(track.duration());
        let run_time = if run_time > 0.0 {
            run_time
        } else {
            self.frame_duration()
        };
        tracing::debug!(requested, narration = track.duration(), run_time, "narration clamp");
        self.play(transition, run_time)?;
        track.finish()
    }

    fn with_state<R>(
        &self,
        id: DrawableId,
        f: impl FnOnce(&DrawableState) -> R,
    ) -> GeomotionResult<R> {
        self.inner
            .drawables
            .borrow()
            .get(&id)
            .map(f)
            .ok_or_else(|| GeomotionError::lookup_miss(format!("drawable {} not in scene", id.0)))
    }

    fn with_state_mut(
        &self,
        id: DrawableId,
        f: impl FnOnce(&mut DrawableState),
    ) -> GeomotionResult<()> {
        self.inner
            .drawables
            .borrow_mut()
            .get_mut(&id)
            .map(f)
            .ok_or_else(|| GeomotionError::lookup_miss(format!("drawable {} not in scene", id.0)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/stage.rs"]
mod tests;
