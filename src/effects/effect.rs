//! Reversible, composable animation units.

use crate::effects::transition::Transition;
use crate::foundation::core::Seconds;
use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::scene::stage::Scene;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Builds a transition against the scene's current state.
pub type TransitionBuilder = Rc<dyn Fn(&Scene) -> GeomotionResult<Transition>>;

/// Lifecycle of an [`Effect`]. Clones share it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EffectState {
    /// Not built yet.
    #[default]
    Created,
    /// `build()` produced a forward transition.
    Built,
    /// Handed to the scene for a resolved duration.
    Playing,
    /// Forward transition finished.
    Completed,
    /// Reverse transition played.
    Cleared,
}

/// A forward/reverse transition pair with a requested duration and optional narration.
///
/// Builders run on every [`Effect::build`]/[`Effect::clear`] call and are not memoized, so
/// supporting drawables allocated by a builder are allocated again on each build.
#[derive(Clone)]
pub struct Effect {
    scene: Scene,
    label: String,
    forward: TransitionBuilder,
    reverse: Option<TransitionBuilder>,
    run_time: Seconds,
    narration: Option<String>,
    auto_remove: bool,
    state: Rc<Cell<EffectState>>,
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("label", &self.label)
            .field("run_time", &self.run_time)
            .field("narration", &self.narration)
            .field("auto_remove", &self.auto_remove)
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

impl Effect {
    /// Effect with the scene's default run time and a no-op reverse.
    pub fn new(
        scene: &Scene,
        label: impl Into<String>,
        forward: impl Fn(&Scene) -> GeomotionResult<Transition> + 'static,
    ) -> Self {
        Self {
            scene: scene.clone(),
            label: label.into(),
            forward: Rc::new(forward),
            reverse: None,
            run_time: scene.config().default_run_time,
            narration: None,
            auto_remove: false,
            state: Rc::new(Cell::new(EffectState::Created)),
        }
    }

    /// Set the reverse builder used by [`Effect::clear`].
    pub fn with_reverse(
        mut self,
        reverse: impl Fn(&Scene) -> GeomotionResult<Transition> + 'static,
    ) -> Self {
        self.reverse = Some(Rc::new(reverse));
        self
    }

    /// Requested duration.
    pub fn run_time(mut self, secs: Seconds) -> Self {
        self.run_time = secs;
        self
    }

    /// Narration spoken while the effect plays.
    pub fn narrated(mut self, text: impl Into<String>) -> Self {
        self.narration = Some(text.into());
        self
    }

    /// Play the reverse transition once a scheduler policy has played this effect.
    pub fn auto_remove(mut self, yes: bool) -> Self {
        self.auto_remove = yes;
        self
    }

    /// Label used in logs.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Requested duration.
    pub fn requested_run_time(&self) -> Seconds {
        self.run_time
    }

    /// Narration text, if any.
    pub fn narration(&self) -> Option<&str> {
        self.narration.as_deref()
    }

    /// Whether schedulers clear this effect after playing it.
    pub fn is_auto_remove(&self) -> bool {
        self.auto_remove
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EffectState {
        self.state.get()
    }

    /// The scene this effect animates.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Fresh forward transition.
    pub fn build(&self) -> GeomotionResult<Transition> {
        let t = (self.forward)(&self.scene)?;
        self.state.set(EffectState::Built);
        Ok(t)
    }

    /// Fresh reverse transition; a wait when there is nothing to undo.
    pub fn clear(&self) -> GeomotionResult<Transition> {
        match &self.reverse {
            Some(reverse) => reverse(&self.scene),
            None => Ok(Transition::Wait),
        }
    }

    /// Build and play for the requested duration, clamped to the narration length when one is
    /// spoken.
    #[tracing::instrument(skip(self), fields(label = %self.label))]
    pub fn play(&self) -> GeomotionResult<()> {
        let t = self.build()?;
        self.play_built(&t, self.run_time, self.narration.as_deref())
    }

    /// Play [`Effect::clear`] for the requested duration.
    pub fn remove_effect(&self) -> GeomotionResult<()> {
        let t = self.clear()?;
        self.scene.play(&t, self.run_time)?;
        self.state.set(EffectState::Cleared);
        Ok(())
    }

    pub(crate) fn play_built(
        &self,
        transition: &Transition,
        run_time: Seconds,
        narration: Option<&str>,
    ) -> GeomotionResult<()> {
        self.state.set(EffectState::Playing);
        self.scene.play_narrated(transition, run_time, narration)?;
        self.state.set(EffectState::Completed);
        Ok(())
    }

    pub(crate) fn mark_playing(&self) {
        self.state.set(EffectState::Playing);
    }

    pub(crate) fn mark_completed(&self) {
        self.state.set(EffectState::Completed);
    }
}

/// Combine effects into one.
///
/// `build()` runs every member's forward transition in one group with lag `stagger` (0 runs them
/// together, 1 back to back); `clear()` runs every member's reverse in parallel. The run time is
/// long enough that each member keeps its own share at the largest member duration, and the
/// narration is the members' texts joined by spaces.
pub fn compose(effects: &[Effect], stagger: f64) -> GeomotionResult<Effect> {
    let first = effects
        .first()
        .ok_or_else(|| GeomotionError::invalid_input("compose needs at least one effect"))?;
    if !stagger.is_finite() || stagger < 0.0 {
        return Err(GeomotionError::invalid_input(format!(
            "stagger must be finite and >= 0, got {stagger}"
        )));
    }
    let n = effects.len() as f64;
    let longest = effects
        .iter()
        .map(Effect::requested_run_time)
        .fold(0.0, f64::max);
    let texts: Vec<&str> = effects.iter().filter_map(Effect::narration).collect();

    let forward_members = effects.to_vec();
    let reverse_members = effects.to_vec();
    let mut composed = Effect::new(first.scene(), "compose", move |_| {
        Ok(Transition::Group {
            members: forward_members
                .iter()
                .map(Effect::build)
                .collect::<GeomotionResult<_>>()?,
            lag_ratio: stagger,
        })
    })
    .with_reverse(move |_| {
        Ok(Transition::parallel(
            reverse_members
                .iter()
                .map(Effect::clear)
                .collect::<GeomotionResult<_>>()?,
        ))
    })
    .run_time(longest * (1.0 + stagger * (n - 1.0)));
    if !texts.is_empty() {
        composed = composed.narrated(texts.join(" "));
    }
    Ok(composed)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/effect.rs"]
mod tests;
