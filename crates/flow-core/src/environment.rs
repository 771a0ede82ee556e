//! Environment values and their change detection.
//!
//! Each component context owns an [`Environment`]. The host hands the
//! environment-construction procedure an [`EnvironmentBuilder`] borrowed for
//! the length of that call; writes that change the stored value raise the
//! store's dirty flag, which the host consumes once per update.

use std::cell::{Cell, RefCell};
use std::fmt;

/// Change-detection surface the host depends on.
pub trait ErasedEnvironment {
    /// True when a value changed since the flag was last cleared.
    fn is_updated(&self) -> bool;
    fn clear_updated(&self);
}

pub struct Environment<E> {
    value: RefCell<Option<E>>,
    updated: Cell<bool>,
}

impl<E: PartialEq + 'static> Environment<E> {
    pub fn new() -> Self {
        Self {
            value: RefCell::new(None),
            updated: Cell::new(false),
        }
    }

    pub fn is_built(&self) -> bool {
        self.value.borrow().is_some()
    }

    pub fn try_with<R>(&self, f: impl FnOnce(&E) -> R) -> Option<R> {
        let value = self.value.borrow();
        value.as_ref().map(f)
    }

    /// Run `f` with the current environment value.
    ///
    /// # Panics
    /// Panics if no value has been built yet.
    pub fn with<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        self.try_with(f)
            .expect("environment read before any value was built")
    }

    /// Builder for writing values into this store. The host creates one for
    /// every external update that refreshes the environment.
    pub fn builder(&self) -> EnvironmentBuilder<'_, E> {
        EnvironmentBuilder { environment: self }
    }
}

impl<E: PartialEq + Clone + 'static> Environment<E> {
    /// # Panics
    /// Panics if no value has been built yet.
    pub fn value(&self) -> E {
        self.with(E::clone)
    }
}

impl<E: PartialEq + 'static> Default for Environment<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PartialEq + 'static> ErasedEnvironment for Environment<E> {
    fn is_updated(&self) -> bool {
        self.updated.get()
    }

    fn clear_updated(&self) {
        self.updated.set(false);
    }
}

impl<E: fmt::Debug> fmt::Debug for Environment<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("value", &*self.value.borrow())
            .field("updated", &self.updated.get())
            .finish()
    }
}

pub struct EnvironmentBuilder<'a, E> {
    environment: &'a Environment<E>,
}

impl<E: PartialEq + 'static> EnvironmentBuilder<'_, E> {
    /// Stores `value`, marking the environment updated only when it differs
    /// from what was stored before.
    pub fn set(&mut self, value: E) {
        let mut slot = self.environment.value.borrow_mut();
        if slot.as_ref() == Some(&value) {
            return;
        }
        *slot = Some(value);
        self.environment.updated.set(true);
        log::trace!("environment value changed");
    }

    /// Value stored by the previous build, if any.
    pub fn previous<R>(&self, f: impl FnOnce(&E) -> R) -> Option<R> {
        self.environment.try_with(f)
    }
}

impl<E: PartialEq + Clone + 'static> EnvironmentBuilder<'_, E> {
    /// Edits the stored value in place. Returns whether anything changed;
    /// does nothing when no value has been built yet.
    pub fn update(&mut self, f: impl FnOnce(&mut E)) -> bool {
        let Some(mut next) = self.environment.try_with(E::clone) else {
            return false;
        };
        f(&mut next);
        let changed = self.environment.try_with(|current| *current != next) == Some(true);
        if changed {
            self.set(next);
        }
        changed
    }
}
