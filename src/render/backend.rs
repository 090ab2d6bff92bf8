use crate::foundation::core::{Rect, Seconds};
use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::render::visual::Visual;
use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Identifier of a drawable owned by the render backend.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct DrawableId(pub u64);

/// Absolute time window `[start, end]` of one member of a played transition.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Window {
    /// Start time in seconds.
    pub start: Seconds,
    /// End time in seconds.
    pub end: Seconds,
}

impl Window {
    /// `true` if the two windows share more than an endpoint.
    pub fn overlaps(&self, other: &Window) -> bool {
        const EPS: f64 = 1e-9;
        self.start < other.end - EPS && other.start < self.end - EPS
    }
}

/// Description of one blocking playback call, handed to [`RenderBackend::begin_play`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlayRequest {
    /// Transition label (`"fade_in"`, `"group"`, ...).
    pub label: String,
    /// Scene time at which playback starts.
    pub start: Seconds,
    /// Resolved duration.
    pub run_time: Seconds,
    /// Per-member windows; a single window for non-group transitions.
    pub windows: Vec<Window>,
    /// Number of frames that will be presented.
    pub frames: u64,
}

/// Drawing capability consumed by the scene.
///
/// Ordering contract: during playback the scene calls `begin_play`, then any number of
/// drawable mutations interleaved with `present_frame` in increasing time order, then
/// `end_play`. The backend never inspects models; it only receives visuals.
pub trait RenderBackend {
    /// Add a new drawable with the given visual on top of the draw order.
    fn add_to_scene(&mut self, id: DrawableId, visual: &Visual) -> GeomotionResult<()>;
    /// Replace a drawable's visual (continuous transform, not a re-creation).
    fn morph_to(&mut self, id: DrawableId, visual: &Visual) -> GeomotionResult<()>;
    /// Set a drawable's opacity multiplier.
    fn set_opacity(&mut self, id: DrawableId, opacity: f64) -> GeomotionResult<()>;
    /// Set a drawable's z order (higher draws later).
    fn set_z_order(&mut self, id: DrawableId, z: i32) -> GeomotionResult<()>;
    /// Draw only the leading `fraction` of a drawable's outline (write-in effects).
    fn set_reveal(&mut self, id: DrawableId, fraction: f64) -> GeomotionResult<()>;
    /// Remove a drawable.
    fn remove_from_scene(&mut self, id: DrawableId) -> GeomotionResult<()>;
    /// Set the visible region of the scene.
    fn set_camera(&mut self, frame: Rect) -> GeomotionResult<()>;
    /// Start a blocking playback call.
    fn begin_play(&mut self, request: &PlayRequest) -> GeomotionResult<()>;
    /// Present the scene state at `time`.
    fn present_frame(&mut self, time: Seconds) -> GeomotionResult<()>;
    /// Finish the playback call started by `begin_play`.
    fn end_play(&mut self) -> GeomotionResult<()>;
    /// Schedule narration audio. Backends without audio ignore it.
    fn start_narration(
        &mut self,
        _text: &str,
        _at: Seconds,
        _duration: Seconds,
    ) -> GeomotionResult<()> {
        Ok(())
    }
}

/// Last known state of a drawable inside a [`RecordingBackend`].
#[derive(Clone, Debug, PartialEq)]
pub struct DrawableRecord {
    /// Current visual.
    pub visual: Visual,
    /// Opacity multiplier.
    pub opacity: f64,
    /// Z order.
    pub z: i32,
    /// Revealed outline fraction.
    pub reveal: f64,
}

/// Narration scheduled on a [`RecordingBackend`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NarrationRecord {
    /// Plain narration text.
    pub text: String,
    /// Scene time at which speech starts.
    pub at: Seconds,
    /// Clip duration.
    pub duration: Seconds,
}

#[derive(Debug, Default)]
struct Recording {
    drawables: BTreeMap<DrawableId, DrawableRecord>,
    plays: Vec<PlayRequest>,
    presented: u64,
    morphs: u64,
    narrations: Vec<NarrationRecord>,
    camera: Option<Rect>,
    playing: bool,
}

impl Recording {
    fn drawable_mut(&mut self, id: DrawableId) -> GeomotionResult<&mut DrawableRecord> {
        self.drawables
            .get_mut(&id)
            .ok_or_else(|| GeomotionError::playback(format!("unknown drawable {}", id.0)))
    }
}

/// In-memory backend for tests and debugging.
///
/// Clones share one recording, so a test can keep a handle while the scene owns another.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingBackend {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every playback call so far, in order.
    pub fn plays(&self) -> Vec<PlayRequest> {
        self.inner.borrow().plays.clone()
    }

    /// Playback calls excluding pure waits.
    pub fn transitions(&self) -> Vec<PlayRequest> {
        self.inner
            .borrow()
            .plays
            .iter()
            .filter(|p| p.label != "wait")
            .cloned()
            .collect()
    }

    /// State of one drawable, if it is in the scene.
    pub fn drawable(&self, id: DrawableId) -> Option<DrawableRecord> {
        self.inner.borrow().drawables.get(&id).cloned()
    }

    /// Drawables currently in the scene.
    pub fn drawable_ids(&self) -> Vec<DrawableId> {
        self.inner.borrow().drawables.keys().copied().collect()
    }

    /// Number of `morph_to` calls received.
    pub fn morph_count(&self) -> u64 {
        self.inner.borrow().morphs
    }

    /// Number of frames presented.
    pub fn presented_frames(&self) -> u64 {
        self.inner.borrow().presented
    }

    /// Narration clips scheduled so far.
    pub fn narrations(&self) -> Ref<'_, [NarrationRecord]> {
        Ref::map(self.inner.borrow(), |r| r.narrations.as_slice())
    }

    /// Last camera frame set on the backend.
    pub fn camera(&self) -> Option<Rect> {
        self.inner.borrow().camera
    }
}

impl RenderBackend for RecordingBackend {
    fn add_to_scene(&mut self, id: DrawableId, visual: &Visual) -> GeomotionResult<()> {
        let mut rec = self.inner.borrow_mut();
        if rec.drawables.contains_key(&id) {
            return Err(GeomotionError::playback(format!(
                "drawable {} already in scene",
                id.0
            )));
        }
        let z = rec.drawables.values().map(|d| d.z).max().unwrap_or(0) + 1;
        rec.drawables.insert(
            id,
            DrawableRecord {
                visual: visual.clone(),
                opacity: 1.0,
                z,
                reveal: 1.0,
            },
        );
        Ok(())
    }

    fn morph_to(&mut self, id: DrawableId, visual: &Visual) -> GeomotionResult<()> {
        let mut rec = self.inner.borrow_mut();
        rec.drawable_mut(id)?.visual = visual.clone();
        rec.morphs += 1;
        Ok(())
    }

    fn set_opacity(&mut self, id: DrawableId, opacity: f64) -> GeomotionResult<()> {
        self.inner.borrow_mut().drawable_mut(id)?.opacity = opacity;
        Ok(())
    }

    fn set_z_order(&mut self, id: DrawableId, z: i32) -> GeomotionResult<()> {
        self.inner.borrow_mut().drawable_mut(id)?.z = z;
        Ok(())
    }

    fn set_reveal(&mut self, id: DrawableId, fraction: f64) -> GeomotionResult<()> {
        self.inner.borrow_mut().drawable_mut(id)?.reveal = fraction;
        Ok(())
    }

    fn remove_from_scene(&mut self, id: DrawableId) -> GeomotionResult<()> {
        self.inner
            .borrow_mut()
            .drawables
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| GeomotionError::playback(format!("unknown drawable {}", id.0)))
    }

    fn set_camera(&mut self, frame: Rect) -> GeomotionResult<()> {
        self.inner.borrow_mut().camera = Some(frame);
        Ok(())
    }

    fn begin_play(&mut self, request: &PlayRequest) -> GeomotionResult<()> {
        let mut rec = self.inner.borrow_mut();
        if rec.playing {
            return Err(GeomotionError::playback("begin_play while another play is in flight"));
        }
        rec.playing = true;
        rec.plays.push(request.clone());
        Ok(())
    }

    fn present_frame(&mut self, _time: Seconds) -> GeomotionResult<()> {
        self.inner.borrow_mut().presented += 1;
        Ok(())
    }

    fn end_play(&mut self) -> GeomotionResult<()> {
        self.inner.borrow_mut().playing = false;
        Ok(())
    }

    fn start_narration(&mut self, text: &str, at: Seconds, duration: Seconds) -> GeomotionResult<()> {
        self.inner.borrow_mut().narrations.push(NarrationRecord {
            text: text.to_owned(),
            at,
            duration,
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
