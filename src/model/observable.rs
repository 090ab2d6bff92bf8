//! Leaf reactive node and the typed model handle built on it.
//!
//! A [`Model`] is a reference-stable handle: clones share the same state and the same subscriber
//! list, and the handle is never rebuilt when its state is recomputed. Consumers keep the handle,
//! never a snapshot of the state.
//!
//! Notification is synchronous and runs subscribers in registration order. It is re-entrant: a
//! subscriber may mutate other models (or this one) and notify again, and the nested pass runs to
//! completion before the outer pass continues. Plain closure subscriptions are not cycle-checked;
//! model-to-model edges declared through [`Observable::link_dependent`] are.

use crate::foundation::error::{GeomotionError, GeomotionResult};
use smallvec::SmallVec;
use std::cell::{Cell, Ref, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a model node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct ModelId(pub u64);

/// Handle returned by [`Observable::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Whether a state write notifies subscribers.
///
/// `Defer` lets a caller write several leaf models and then notify once on an aggregate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Propagate {
    /// Notify subscribers after the write.
    #[default]
    Notify,
    /// Write only; the caller notifies later.
    Defer,
}

type Callback = Rc<dyn Fn() -> GeomotionResult<()>>;

/// Untyped reactive node: identity, ordered subscribers and declared dependents.
pub struct Observable {
    id: ModelId,
    next_subscription: Cell<u64>,
    subscribers: RefCell<SmallVec<[(SubscriptionId, Callback); 4]>>,
    dependents: RefCell<Vec<Weak<Observable>>>,
}

impl Observable {
    /// Create a node with a fresh identity.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            id: ModelId(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed)),
            next_subscription: Cell::new(0),
            subscribers: RefCell::new(SmallVec::new()),
            dependents: RefCell::new(Vec::new()),
        })
    }

    /// Identity of this node.
    pub fn id(&self) -> ModelId {
        self.id
    }

    /// Register `callback` to run on every [`notify`](Self::notify), after all earlier ones.
    pub fn subscribe(
        &self,
        callback: impl Fn() -> GeomotionResult<()> + 'static,
    ) -> SubscriptionId {
        let sub = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(sub.0 + 1);
        self.subscribers.borrow_mut().push((sub, Rc::new(callback)));
        sub
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    ///
    /// A notification pass already in flight still runs the removed callback.
    pub fn unsubscribe(&self, sub: SubscriptionId) -> bool {
        let mut subs = self.subscribers.borrow_mut();
        let before = subs.len();
        subs.retain(|(id, _)| *id != sub);
        subs.len() != before
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Run every subscriber in registration order.
    ///
    /// Stops at the first failing subscriber and returns its error; later subscribers are not
    /// invoked.
    pub fn notify(&self) -> GeomotionResult<()> {
        // Snapshot so callbacks may subscribe, unsubscribe or notify re-entrantly.
        let snapshot: SmallVec<[Callback; 4]> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        tracing::trace!(model = self.id.0, subscribers = snapshot.len(), "notify");
        for cb in snapshot {
            cb()?;
        }
        Ok(())
    }

    /// Declare that `dependent` is recomputed from this node.
    ///
    /// Rejects the edge with [`GeomotionError::Cycle`] if `dependent` already reaches this node.
    pub fn link_dependent(&self, dependent: &Rc<Observable>) -> GeomotionResult<()> {
        if dependent.id == self.id || dependent.reaches(self.id) {
            return Err(GeomotionError::cycle(format!(
                "model {} already depends on model {}",
                self.id.0, dependent.id.0
            )));
        }
        let mut deps = self.dependents.borrow_mut();
        deps.retain(|w| w.strong_count() > 0);
        if !deps
            .iter()
            .any(|w| w.upgrade().is_some_and(|d| d.id == dependent.id))
        {
            deps.push(Rc::downgrade(dependent));
        }
        Ok(())
    }

    /// `true` when `target` is reachable through declared dependents.
    pub fn reaches(&self, target: ModelId) -> bool {
        let mut seen = HashSet::new();
        let mut stack: Vec<Rc<Observable>> = self.live_dependents();
        while let Some(node) = stack.pop() {
            if node.id == target {
                return true;
            }
            if seen.insert(node.id) {
                stack.extend(node.live_dependents());
            }
        }
        false
    }

    fn live_dependents(&self) -> Vec<Rc<Observable>> {
        self.dependents
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }
}

impl fmt::Debug for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("id", &self.id)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Anything backed by an [`Observable`] node.
///
/// Factories and the registry accept `&dyn Observe` so heterogeneous models can be mixed.
pub trait Observe {
    /// The backing node.
    fn node(&self) -> &Rc<Observable>;

    /// Identity of the backing node.
    fn model_id(&self) -> ModelId {
        self.node().id()
    }
}

/// Typed, reference-stable model handle.
pub struct Model<T> {
    node: Rc<Observable>,
    state: Rc<RefCell<T>>,
}

impl<T> Clone for Model<T> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.node.id)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl<T> Observe for Model<T> {
    fn node(&self) -> &Rc<Observable> {
        &self.node
    }
}

impl<T: Clone + 'static> Model<T> {
    /// Create a leaf model.
    pub fn new(state: T) -> Self {
        Self {
            node: Observable::new(),
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Identity of this model.
    pub fn id(&self) -> ModelId {
        self.node.id
    }

    /// `true` if both handles refer to the same model.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Clone of the current state.
    pub fn get(&self) -> T {
        self.state.borrow().clone()
    }

    /// Borrow the current state.
    ///
    /// Do not write to this model while the borrow is alive.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.state.borrow()
    }

    /// Replace the state.
    pub fn set(&self, state: T, propagate: Propagate) -> GeomotionResult<()> {
        *self.state.borrow_mut() = state;
        self.after_write(propagate)
    }

    /// Mutate the state in place.
    pub fn update(&self, f: impl FnOnce(&mut T), propagate: Propagate) -> GeomotionResult<()> {
        f(&mut self.state.borrow_mut());
        self.after_write(propagate)
    }

    /// Mutate the state through a fallible closure that runs on a scratch copy.
    ///
    /// On error the stored state is left untouched and nothing is notified.
    pub fn try_update(
        &self,
        f: impl FnOnce(&mut T) -> GeomotionResult<()>,
        propagate: Propagate,
    ) -> GeomotionResult<()> {
        let mut next = self.get();
        f(&mut next)?;
        self.set(next, propagate)
    }

    /// Notify subscribers without changing state.
    pub fn notify(&self) -> GeomotionResult<()> {
        self.node.notify()
    }

    /// See [`Observable::subscribe`].
    pub fn subscribe(
        &self,
        callback: impl Fn() -> GeomotionResult<()> + 'static,
    ) -> SubscriptionId {
        self.node.subscribe(callback)
    }

    /// See [`Observable::unsubscribe`].
    pub fn unsubscribe(&self, sub: SubscriptionId) -> bool {
        self.node.unsubscribe(sub)
    }

    /// Non-owning handle, used by derived computations to read their sources.
    pub fn downgrade(&self) -> WeakModel<T> {
        WeakModel {
            id: self.node.id,
            state: Rc::downgrade(&self.state),
        }
    }

    fn after_write(&self, propagate: Propagate) -> GeomotionResult<()> {
        match propagate {
            Propagate::Notify => self.node.notify(),
            Propagate::Defer => Ok(()),
        }
    }
}

/// Non-owning read handle to a model's state.
pub struct WeakModel<T> {
    id: ModelId,
    state: Weak<RefCell<T>>,
}

impl<T> Clone for WeakModel<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            state: Weak::clone(&self.state),
        }
    }
}

impl<T: Clone> WeakModel<T> {
    /// Clone of the current state, or a lookup miss if the model was dropped.
    pub fn get(&self) -> GeomotionResult<T> {
        let state = self.state.upgrade().ok_or_else(|| {
            GeomotionError::lookup_miss(format!("source model {} was dropped", self.id.0))
        })?;
        let value = state.borrow().clone();
        Ok(value)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/observable.rs"]
mod tests;
