//! Concrete transitions handed to [`Scene::play`].
//!
//! A transition is driven by normalized progress `alpha` in `[0, 1]`. The scene calls
//! [`Transition::begin`] once, [`Transition::apply`] for every presented frame and
//! [`Transition::finish`] once at the end.

use crate::animation::ease::Ease;
use crate::animation::lerp::Lerp;
use crate::foundation::core::{Affine, Color, Rect};
use crate::foundation::error::GeomotionResult;
use crate::render::backend::DrawableId;
use crate::render::visual::Visual;
use crate::scene::stage::Scene;
use std::fmt;
use std::rc::Rc;

/// Progress callback of a [`Transition::Tween`], fed eased progress.
pub type TweenDriver = Rc<dyn Fn(f64) -> GeomotionResult<()>>;

/// One animatable change of the scene.
#[derive(Clone)]
pub enum Transition {
    /// Nothing changes; only time passes.
    Wait,
    /// Opacity from 0 to 1.
    FadeIn {
        /// Drawable.
        target: DrawableId,
    },
    /// Opacity from `from` to 0, optionally removing the drawable afterwards.
    FadeOut {
        /// Drawable.
        target: DrawableId,
        /// Starting opacity.
        from: f64,
        /// Remove when done.
        remove: bool,
    },
    /// Outline drawn progressively.
    Write {
        /// Drawable.
        target: DrawableId,
    },
    /// Outline erased progressively, optionally removing the drawable afterwards.
    Unwrite {
        /// Drawable.
        target: DrawableId,
        /// Remove when done.
        remove: bool,
    },
    /// Continuous transform from one visual to another.
    Morph {
        /// Drawable.
        target: DrawableId,
        /// Visual at progress 0.
        from: Visual,
        /// Visual at progress 1.
        to: Visual,
    },
    /// Scale-and-tint pulse that returns to `base`.
    Indicate {
        /// Drawable.
        target: DrawableId,
        /// Visual restored at the end.
        base: Visual,
        /// Peak scale factor.
        scale: f64,
        /// Peak stroke colour.
        color: Color,
    },
    /// Camera frame interpolation.
    Camera {
        /// Frame at progress 0.
        from: Rect,
        /// Frame at progress 1.
        to: Rect,
    },
    /// Arbitrary progress-driven change, usually a model update.
    Tween {
        /// Label reported to the backend.
        label: String,
        /// Rate function.
        ease: Ease,
        /// Receives eased progress.
        driver: TweenDriver,
    },
    /// Several transitions in one play call, staggered by `lag_ratio`.
    Group {
        /// Members in start order.
        members: Vec<Transition>,
        /// 0 runs members together, 1 runs them back to back.
        lag_ratio: f64,
    },
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group { members, lag_ratio } => f
                .debug_struct("Group")
                .field("members", members)
                .field("lag_ratio", lag_ratio)
                .finish(),
            Self::Tween { label, ease, .. } => f
                .debug_struct("Tween")
                .field("label", label)
                .field("ease", ease)
                .finish_non_exhaustive(),
            other => f.write_str(other.label()),
        }
    }
}

impl Transition {
    /// Parallel group.
    pub fn parallel(members: Vec<Transition>) -> Self {
        Self::Group {
            members,
            lag_ratio: 0.0,
        }
    }

    /// Short name reported to the backend.
    pub fn label(&self) -> &str {
        match self {
            Self::Wait => "wait",
            Self::FadeIn { .. } => "fade_in",
            Self::FadeOut { .. } => "fade_out",
            Self::Write { .. } => "write",
            Self::Unwrite { .. } => "unwrite",
            Self::Morph { .. } => "morph",
            Self::Indicate { .. } => "indicate",
            Self::Camera { .. } => "camera",
            Self::Tween { label, .. } => label,
            Self::Group { .. } => "group",
        }
    }

    /// Normalized `(start, end)` of every top-level member; `[(0, 1)]` for a single transition.
    ///
    /// With `n` members and lag `l`, each member spans `u = 1 / (1 + l (n - 1))` and member `i`
    /// starts at `i l u`.
    pub fn member_windows(&self) -> Vec<(f64, f64)> {
        match self {
            Self::Group { members, lag_ratio } if !members.is_empty() => {
                let n = members.len() as f64;
                let lag = lag_ratio.max(0.0);
                let unit = 1.0 / (1.0 + lag * (n - 1.0));
                (0..members.len())
                    .map(|i| {
                        let start = i as f64 * lag * unit;
                        (start, (start + unit).min(1.0))
                    })
                    .collect()
            }
            _ => vec![(0.0, 1.0)],
        }
    }

    /// Put the scene in the progress-0 state.
    ///
    /// Tweens are not applied here so a staggered tween does not overwrite the model a running
    /// sibling is driving.
    pub fn begin(&self, scene: &Scene) -> GeomotionResult<()> {
        match self {
            Self::Group { members, .. } => members.iter().try_for_each(|m| m.begin(scene)),
            Self::Tween { .. } | Self::Wait => Ok(()),
            other => other.apply(scene, 0.0),
        }
    }

    /// Set the scene to progress `alpha`.
    pub fn apply(&self, scene: &Scene, alpha: f64) -> GeomotionResult<()> {
        let alpha = alpha.clamp(0.0, 1.0);
        let e = Ease::Smooth.apply(alpha);
        match self {
            Self::Wait => Ok(()),
            Self::FadeIn { target } => scene.set_opacity(*target, e),
            Self::FadeOut { target, from, .. } => scene.set_opacity(*target, from * (1.0 - e)),
            Self::Write { target } => {
                if alpha == 0.0 {
                    scene.set_opacity(*target, 1.0)?;
                }
                scene.set_reveal(*target, e)
            }
            Self::Unwrite { target, .. } => scene.set_reveal(*target, 1.0 - e),
            Self::Morph { target, from, to } => scene.morph(*target, &from.interpolate(to, e)),
            Self::Indicate {
                target,
                base,
                scale,
                color,
            } => {
                let pulse = Ease::ThereAndBack.apply(alpha);
                let factor = 1.0 + (scale - 1.0) * pulse;
                let anchor = base.anchor().to_vec2();
                let mut v = base.transformed(
                    Affine::translate(anchor) * Affine::scale(factor) * Affine::translate(-anchor),
                );
                if let Some(stroke) = v.style.stroke {
                    v.style.stroke = Some(<Color as Lerp>::lerp(&stroke, color, pulse));
                }
                scene.morph(*target, &v)
            }
            Self::Camera { from, to } => scene.set_camera(<Rect as Lerp>::lerp(from, to, e)),
            Self::Tween { ease, driver, .. } => (driver.as_ref())(ease.apply(alpha)),
            Self::Group { .. } => self.step(scene, 0.0, alpha),
        }
    }

    /// Advance from progress `prev` to `alpha`.
    ///
    /// Group members are only touched while their window is active or when they complete during
    /// this step; members that have not started are left alone.
    pub(crate) fn step(&self, scene: &Scene, prev: f64, alpha: f64) -> GeomotionResult<()> {
        let Self::Group { members, .. } = self else {
            return self.apply(scene, alpha);
        };
        for (member, (start, end)) in members.iter().zip(self.member_windows()) {
            let started = alpha >= start;
            let already_done = prev >= end && prev > 0.0;
            if !started || already_done {
                continue;
            }
            let span = end - start;
            let local = if span > 0.0 {
                ((alpha - start) / span).clamp(0.0, 1.0)
            } else {
                1.0
            };
            let local_prev = if span > 0.0 {
                ((prev - start) / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
            member.step(scene, local_prev, local)?;
        }
        Ok(())
    }

    /// Settle end-of-transition state (removals, restoring indicated visuals).
    pub fn finish(&self, scene: &Scene) -> GeomotionResult<()> {
        match self {
            Self::FadeOut {
                target,
                remove: true,
                ..
            }
            | Self::Unwrite {
                target,
                remove: true,
            } => scene.remove(*target),
            Self::Indicate { target, base, .. } => scene.morph(*target, base),
            Self::Group { members, .. } => members.iter().try_for_each(|m| m.finish(scene)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transition.rs"]
mod tests;
