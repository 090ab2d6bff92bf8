use crate::foundation::error::GeomotionResult;
use crate::model::observable::{Model, Observable, Observe, Propagate};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

type Compute<T> = Rc<dyn Fn() -> GeomotionResult<T>>;

/// A model whose state is a pure function of other models.
///
/// Built once, then recomputed in place for its whole life: [`Derived::recompute`] is what gets
/// subscribed to every source, and it writes the new value into the same [`Model`] before
/// notifying that model's own subscribers. Derefs to the underlying [`Model`].
pub struct Derived<T> {
    model: Model<T>,
    compute: Compute<T>,
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            compute: Rc::clone(&self.compute),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Derived").field(&self.model).finish()
    }
}

impl<T: Clone + 'static> Derived<T> {
    /// Compute the initial value, build the model and subscribe it to every source.
    ///
    /// `compute` reads the sources itself (usually through [`WeakModel`](super::observable::WeakModel)
    /// handles so sources do not keep their dependents' inputs alive in a loop).
    pub fn new(
        sources: &[&dyn Observe],
        compute: impl Fn() -> GeomotionResult<T> + 'static,
    ) -> GeomotionResult<Self> {
        let initial = compute()?;
        let derived = Self {
            model: Model::new(initial),
            compute: Rc::new(compute),
        };
        for source in sources {
            derived.track(*source)?;
        }
        Ok(derived)
    }

    /// Add another source after construction.
    ///
    /// Fails with a cycle error if `source` already depends on this model.
    pub fn track(&self, source: &dyn Observe) -> GeomotionResult<()> {
        source.node().link_dependent(self.model.node())?;
        let this = self.clone();
        source.node().subscribe(move || this.recompute());
        Ok(())
    }

    /// Recompute from the current source state, store it, then notify.
    pub fn recompute(&self) -> GeomotionResult<()> {
        let next = (self.compute)()?;
        self.model.set(next, Propagate::Notify)
    }

    /// Recompute and store without notifying (for batched updates).
    pub fn recompute_quiet(&self) -> GeomotionResult<()> {
        let next = (self.compute)()?;
        self.model.set(next, Propagate::Defer)
    }

    /// The underlying model handle.
    pub fn model(&self) -> &Model<T> {
        &self.model
    }
}

impl<T> Deref for Derived<T> {
    type Target = Model<T>;

    fn deref(&self) -> &Model<T> {
        &self.model
    }
}

impl<T> Observe for Derived<T> {
    fn node(&self) -> &Rc<Observable> {
        self.model.node()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/derived.rs"]
mod tests;
