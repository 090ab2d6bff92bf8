//! Model ↔ delegate bookkeeping and the "become visible" transition.

use crate::effects::transition::Transition;
use crate::foundation::core::Seconds;
use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::model::observable::{ModelId, Observable, Observe, SubscriptionId};
use crate::render::backend::DrawableId;
use crate::render::delegates::{Delegate, Entrance};
use crate::scene::stage::Scene;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::{Rc, Weak};

/// Options for [`Registry::register`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegisterOpts {
    /// Add the visual directly, without an entrance transition.
    pub no_animate: bool,
    /// Narration spoken over the entrance; ignored with `no_animate`.
    pub narration: Option<String>,
    /// Entrance duration; defaults to the scene's default run time.
    pub run_time: Option<Seconds>,
}

impl RegisterOpts {
    /// Add without animation.
    pub fn immediate() -> Self {
        Self {
            no_animate: true,
            ..Self::default()
        }
    }

    /// Animated entrance with narration.
    pub fn narrated(text: impl Into<String>) -> Self {
        Self {
            narration: Some(text.into()),
            ..Self::default()
        }
    }
}

/// A registered delegate and the drawable it renders into.
#[derive(Clone)]
pub struct BoundDelegate {
    /// Drawable owned by the scene.
    pub drawable: DrawableId,
    /// The delegate.
    pub delegate: Rc<dyn Delegate>,
}

impl fmt::Debug for BoundDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundDelegate")
            .field("drawable", &self.drawable)
            .finish_non_exhaustive()
    }
}

struct Binding {
    model: ModelId,
    node: Weak<Observable>,
    subscription: SubscriptionId,
    delegate: Rc<dyn Delegate>,
}

impl Binding {
    fn detach(&self) {
        if let Some(node) = self.node.upgrade() {
            node.unsubscribe(self.subscription);
        }
    }
}

#[derive(Default)]
struct Entries {
    by_model: HashMap<ModelId, DrawableId>,
    by_drawable: BTreeMap<DrawableId, Binding>,
}

/// Tracks which delegate renders which model.
///
/// Registering subscribes the drawable to the model: every later `notify()` on the model morphs
/// the drawable into the delegate's freshly built visual. The subscription holds the delegate
/// weakly, so the registry owns delegates and dropping it stops the morphs.
///
/// Do not register or unregister from inside a model notification.
pub struct Registry {
    scene: Scene,
    entries: RefCell<Entries>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Empty registry over `scene`.
    pub fn new(scene: &Scene) -> Self {
        Self {
            scene: scene.clone(),
            entries: RefCell::new(Entries::default()),
        }
    }

    /// The scene drawables are added to.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Show `model` through `delegate` on top of the scene.
    pub fn register(
        &self,
        model: &dyn Observe,
        delegate: Rc<dyn Delegate>,
        opts: &RegisterOpts,
    ) -> GeomotionResult<DrawableId> {
        self.register_at(model, delegate, opts, false)
    }

    /// Like [`Registry::register`], beneath every existing drawable.
    pub fn register_in_background(
        &self,
        model: &dyn Observe,
        delegate: Rc<dyn Delegate>,
        opts: &RegisterOpts,
    ) -> GeomotionResult<DrawableId> {
        self.register_at(model, delegate, opts, true)
    }

    #[tracing::instrument(skip(self, model, delegate, opts), fields(model = model.model_id().0))]
    fn register_at(
        &self,
        model: &dyn Observe,
        delegate: Rc<dyn Delegate>,
        opts: &RegisterOpts,
        background: bool,
    ) -> GeomotionResult<DrawableId> {
        let model_id = model.model_id();
        if self.entries.borrow().by_model.contains_key(&model_id) {
            return Err(GeomotionError::invalid_input(format!(
                "model {} is already registered",
                model_id.0
            )));
        }

        let visual = delegate.visual()?;
        let drawable = if background {
            self.scene.add_to_back(&visual)?
        } else {
            self.scene.add(&visual)?
        };

        let scene = self.scene.clone();
        let weak = Rc::downgrade(&delegate);
        let subscription = model.node().subscribe(move || {
            let Some(delegate) = weak.upgrade() else {
                return Ok(());
            };
            // Removed from the scene by an effect; the binding outlives the drawable.
            if !scene.contains(drawable) {
                return Ok(());
            }
            let next = delegate.visual()?;
            scene.morph(drawable, &next)
        });

        let entrance = delegate.entrance();
        {
            let mut entries = self.entries.borrow_mut();
            entries.by_model.insert(model_id, drawable);
            entries.by_drawable.insert(
                drawable,
                Binding {
                    model: model_id,
                    node: Rc::downgrade(model.node()),
                    subscription,
                    delegate,
                },
            );
        }

        if !opts.no_animate {
            let transition = match entrance {
                Entrance::Fade => Transition::FadeIn { target: drawable },
                Entrance::Write => Transition::Write { target: drawable },
            };
            let run_time = opts
                .run_time
                .unwrap_or(self.scene.config().default_run_time);
            self.scene
                .play_narrated(&transition, run_time, opts.narration.as_deref())?;
        }
        tracing::debug!(drawable = drawable.0, background, "registered");
        Ok(drawable)
    }

    /// Remove one model's drawable, optionally fading it out first.
    pub fn unregister(&self, model: &dyn Observe, fade_out: bool) -> GeomotionResult<()> {
        let model_id = model.model_id();
        let (drawable, binding) = {
            let mut entries = self.entries.borrow_mut();
            let drawable = entries
                .by_model
                .remove(&model_id)
                .ok_or_else(|| not_registered(model_id))?;
            let binding = entries
                .by_drawable
                .remove(&drawable)
                .ok_or_else(|| not_registered(model_id))?;
            (drawable, binding)
        };
        binding.detach();
        self.take_down(&[drawable], fade_out)
    }

    /// Remove every tracked pair and clear both maps.
    ///
    /// With `fade_out`, all drawables fade out together in one play call before removal.
    #[tracing::instrument(skip(self))]
    pub fn unregister_all(&self, fade_out: bool) -> GeomotionResult<()> {
        let entries = std::mem::take(&mut *self.entries.borrow_mut());
        let drawables: Vec<DrawableId> = entries
            .by_drawable
            .iter()
            .map(|(id, binding)| {
                binding.detach();
                *id
            })
            .collect();
        self.take_down(&drawables, fade_out)
    }

    /// The delegate bound to `model`.
    pub fn delegate_for(&self, model: &dyn Observe) -> GeomotionResult<BoundDelegate> {
        let model_id = model.model_id();
        let entries = self.entries.borrow();
        entries
            .by_model
            .get(&model_id)
            .and_then(|d| entries.by_drawable.get(d).map(|b| (*d, b)))
            .map(|(drawable, b)| BoundDelegate {
                drawable,
                delegate: Rc::clone(&b.delegate),
            })
            .ok_or_else(|| not_registered(model_id))
    }

    /// The model rendered by `drawable`.
    pub fn model_for(&self, drawable: DrawableId) -> GeomotionResult<ModelId> {
        self.entries
            .borrow()
            .by_drawable
            .get(&drawable)
            .map(|b| b.model)
            .ok_or_else(|| {
                GeomotionError::lookup_miss(format!("drawable {} is not registered", drawable.0))
            })
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.entries.borrow().by_model.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_down(&self, drawables: &[DrawableId], fade_out: bool) -> GeomotionResult<()> {
        let live: Vec<DrawableId> = drawables
            .iter()
            .copied()
            .filter(|id| self.scene.contains(*id))
            .collect();
        if live.len() < drawables.len() {
            tracing::debug!(
                skipped = drawables.len() - live.len(),
                "drawables already gone from the scene"
            );
        }
        if live.is_empty() {
            return Ok(());
        }
        if !fade_out {
            return live.iter().try_for_each(|id| self.scene.remove(*id));
        }
        let members = live
            .iter()
            .map(|&target| {
                Ok(Transition::FadeOut {
                    target,
                    from: self.scene.opacity(target)?,
                    remove: true,
                })
            })
            .collect::<GeomotionResult<Vec<_>>>()?;
        self.scene.play(
            &Transition::parallel(members),
            self.scene.config().default_run_time,
        )
    }
}

fn not_registered(model: ModelId) -> GeomotionError {
    GeomotionError::lookup_miss(format!("model {} is not registered", model.0))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/registry.rs"]
mod tests;
