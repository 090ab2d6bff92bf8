//! Playback policies over sets of effects.
//!
//! Every policy is fail-fast: the first error from a build, a play or a clear aborts the call,
//! and effects already played are not reversed.

use crate::effects::effect::Effect;
use crate::effects::transition::Transition;
use crate::foundation::core::Seconds;
use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::narration::bookmarks::{bookmark_label, bookmark_marker};
use crate::scene::stage::Scene;

/// Options shared by [`Scheduler::play_parallel`] and [`Scheduler::play_group`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlayOpts {
    /// Narration spoken over the whole call.
    pub narration: Option<String>,
    /// Total duration; defaults to the longest member run time.
    pub run_time: Option<Seconds>,
    /// Divides the resolved duration.
    pub speed: f64,
    /// Stagger used by [`Scheduler::play_group`].
    pub lag_ratio: f64,
}

impl Default for PlayOpts {
    fn default() -> Self {
        Self {
            narration: None,
            run_time: None,
            speed: 1.0,
            lag_ratio: 1.0,
        }
    }
}

impl PlayOpts {
    /// Options with narration text.
    pub fn narrated(text: impl Into<String>) -> Self {
        Self {
            narration: Some(text.into()),
            ..Self::default()
        }
    }
}

/// Drives effects against one scene.
#[derive(Clone, Debug)]
pub struct Scheduler {
    scene: Scene,
}

impl Scheduler {
    /// Scheduler for `scene`.
    pub fn new(scene: &Scene) -> Self {
        Self {
            scene: scene.clone(),
        }
    }

    /// The driven scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Run every effect at once in one play call with a shared, narration-clamped duration,
    /// then clear the auto-remove members.
    #[tracing::instrument(skip(self, effects, opts), fields(n = effects.len()))]
    pub fn play_parallel(&self, effects: &[Effect], opts: &PlayOpts) -> GeomotionResult<()> {
        self.play_staggered(effects, opts, 0.0)
    }

    /// Like [`Scheduler::play_parallel`], with member starts offset by `opts.lag_ratio`.
    #[tracing::instrument(skip(self, effects, opts), fields(n = effects.len()))]
    pub fn play_group(&self, effects: &[Effect], opts: &PlayOpts) -> GeomotionResult<()> {
        if !opts.lag_ratio.is_finite() || opts.lag_ratio < 0.0 {
            return Err(GeomotionError::invalid_input(format!(
                "lag ratio must be finite and >= 0, got {}",
                opts.lag_ratio
            )));
        }
        self.play_staggered(effects, opts, opts.lag_ratio)
    }

    /// Play each effect on its own, in order, clearing auto-remove members right after they play.
    #[tracing::instrument(skip(self, effects), fields(n = effects.len()))]
    pub fn play_sequence(&self, effects: &[Effect]) -> GeomotionResult<()> {
        for effect in effects {
            effect.play()?;
            if effect.is_auto_remove() {
                effect.remove_effect()?;
            }
        }
        Ok(())
    }

    /// Speak every member's narration as one clip and pace each member by its bookmark.
    ///
    /// Member `i` gets bookmark `i` (`A`, `B`, ...) in front of its fragment. It starts when
    /// speech reaches its bookmark and runs until the next one; the last member runs for the
    /// remaining speech minus `narration_buffer`. Without a narrator the members play in order
    /// at their own run times. Auto-remove members are cleared once all have played.
    #[tracing::instrument(skip(self, effects), fields(n = effects.len()))]
    pub fn play_with_narration_fragments(&self, effects: &[Effect]) -> GeomotionResult<()> {
        if effects.is_empty() {
            return Err(GeomotionError::invalid_input(
                "narration fragments need at least one effect",
            ));
        }
        let marks: Vec<String> = (0..effects.len()).map(bookmark_label).collect();
        let text = effects
            .iter()
            .zip(&marks)
            .map(|(e, mark)| format!("{}{}", bookmark_marker(mark), e.narration().unwrap_or("")))
            .collect::<Vec<_>>()
            .join(" ");

        match self.scene.narrate(&text)? {
            Some(track) => {
                let floor = self.scene.frame_duration();
                let buffer = self.scene.config().narration_buffer;
                for (i, effect) in effects.iter().enumerate() {
                    track.wait_until_bookmark(&marks[i])?;
                    let span = match marks.get(i + 1) {
                        Some(next) => track.time_until_bookmark(next)?,
                        None => track.remaining_duration(buffer),
                    };
                    let run_time = if span > 0.0 { span } else { floor };
                    tracing::debug!(mark = %marks[i], span, run_time, "fragment");
                    let t = effect.build()?;
                    effect.mark_playing();
                    self.scene.play(&t, run_time)?;
                    effect.mark_completed();
                }
                track.finish()?;
            }
            None => {
                for effect in effects {
                    let t = effect.build()?;
                    effect.play_built(&t, effect.requested_run_time(), None)?;
                }
            }
        }
        self.clear_auto_removed(effects)
    }

    fn play_staggered(
        &self,
        effects: &[Effect],
        opts: &PlayOpts,
        lag_ratio: f64,
    ) -> GeomotionResult<()> {
        if effects.is_empty() {
            return Ok(());
        }
        if !opts.speed.is_finite() || opts.speed <= 0.0 {
            return Err(GeomotionError::invalid_input(format!(
                "speed must be finite and > 0, got {}",
                opts.speed
            )));
        }
        let requested = opts.run_time.unwrap_or_else(|| {
            effects
                .iter()
                .map(Effect::requested_run_time)
                .fold(0.0, f64::max)
        }) / opts.speed;

        let members = effects
            .iter()
            .map(Effect::build)
            .collect::<GeomotionResult<Vec<_>>>()?;
        let group = Transition::Group { members, lag_ratio };
        effects.iter().for_each(Effect::mark_playing);
        self.scene
            .play_narrated(&group, requested, opts.narration.as_deref())?;
        effects.iter().for_each(Effect::mark_completed);
        self.clear_auto_removed(effects)
    }

    fn clear_auto_removed(&self, effects: &[Effect]) -> GeomotionResult<()> {
        effects
            .iter()
            .filter(|e| e.is_auto_remove())
            .try_for_each(Effect::remove_effect)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/scheduler.rs"]
mod tests;
