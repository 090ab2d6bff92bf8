use crate::animation::ease::Ease;
use crate::animation::lerp::Lerp;
use crate::effects::effect::Effect;
use crate::effects::transition::Transition;
use crate::foundation::error::GeomotionResult;
use crate::model::observable::{Model, Observable, Observe, Propagate};
use crate::scene::stage::Scene;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// A leaf model that can be tweened from one value to another.
///
/// Dependents subscribe to it like any other model; a tween notifies them on every frame.
pub struct Parameter<T> {
    model: Model<T>,
}

impl<T> Clone for Parameter<T> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Parameter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Parameter").field(&self.model).finish()
    }
}

impl<T: Lerp + Clone + 'static> Parameter<T> {
    /// Parameter holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            model: Model::new(value),
        }
    }

    /// The underlying model handle.
    pub fn model(&self) -> &Model<T> {
        &self.model
    }

    /// Tween from `from` to `to`; the reverse tweens back.
    pub fn play(&self, scene: &Scene, from: T, to: T) -> Effect {
        let forward = tween(&self.model, from.clone(), to.clone());
        let reverse = tween(&self.model, to, from);
        Effect::new(scene, "parameter", move |_| Ok(forward.clone()))
            .with_reverse(move |_| Ok(reverse.clone()))
    }

    /// Tween from the value held when the effect is built to `to`; the reverse returns to it.
    pub fn animate_to(&self, scene: &Scene, to: T) -> Effect {
        let start: Rc<RefCell<Option<T>>> = Rc::default();
        let captured = Rc::clone(&start);
        let model = self.model.clone();
        let back = self.model.clone();
        Effect::new(scene, "parameter", move |_| {
            let from = model.get();
            *captured.borrow_mut() = Some(from.clone());
            Ok(tween(&model, from, to.clone()))
        })
        .with_reverse(move |_| {
            Ok(match start.borrow().clone() {
                Some(original) => tween(&back, back.get(), original),
                None => Transition::Wait,
            })
        })
    }
}

fn tween<T: Lerp + Clone + 'static>(model: &Model<T>, from: T, to: T) -> Transition {
    let model = model.clone();
    Transition::Tween {
        label: "parameter".into(),
        ease: Ease::Smooth,
        driver: Rc::new(move |t: f64| -> GeomotionResult<()> {
            model.set(<T as Lerp>::lerp(&from, &to, t), Propagate::Notify)
        }),
    }
}

impl<T> Deref for Parameter<T> {
    type Target = Model<T>;

    fn deref(&self) -> &Model<T> {
        &self.model
    }
}

impl<T> Observe for Parameter<T> {
    fn node(&self) -> &Rc<Observable> {
        self.model.node()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/parameter.rs"]
mod tests;
