//! Erased per-component state with a self-update trigger.

use std::any::{type_name, Any};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::transition::Transition;

pub(crate) type UpdateHandler = Rc<dyn Fn(Transition)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    TypeMismatch { expected: &'static str },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::TypeMismatch { expected } => {
                write!(f, "component state type mismatch; expected {expected}")
            }
        }
    }
}

impl std::error::Error for StateError {}

struct ComponentStateInner {
    payload: RefCell<Box<dyn Any>>,
    updated: RefCell<Option<UpdateHandler>>,
}

/// Component-owned state carried by a view's context.
///
/// The payload is whatever the component's `make_state` produced. The
/// update handler is installed by the host on every render; calling
/// [`ComponentState::request_update`] re-renders the component without an
/// external driver.
#[derive(Clone)]
pub struct ComponentState {
    inner: Rc<ComponentStateInner>,
}

impl ComponentState {
    pub fn new(payload: Box<dyn Any>) -> Self {
        Self {
            inner: Rc::new(ComponentStateInner {
                payload: RefCell::new(payload),
                updated: RefCell::new(None),
            }),
        }
    }

    pub fn empty() -> Self {
        Self::new(Box::new(()))
    }

    pub fn with<T: 'static, R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, StateError> {
        let payload = self.inner.payload.borrow();
        let typed = payload
            .downcast_ref::<T>()
            .ok_or(StateError::TypeMismatch {
                expected: type_name::<T>(),
            })?;
        Ok(f(typed))
    }

    /// Mutably borrows the payload for the duration of `f`. Do not request an
    /// update from inside `f`; use [`ComponentState::mutate`] instead.
    pub fn update<T: 'static, R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, StateError> {
        let mut payload = self.inner.payload.borrow_mut();
        let typed = payload
            .downcast_mut::<T>()
            .ok_or(StateError::TypeMismatch {
                expected: type_name::<T>(),
            })?;
        Ok(f(typed))
    }

    /// Updates the payload, then asks the owning host to re-render.
    pub fn mutate<T: 'static, R>(
        &self,
        transition: Transition,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, StateError> {
        let result = self.update(f)?;
        self.request_update(transition);
        Ok(result)
    }

    pub fn request_update(&self, transition: Transition) {
        let handler = self.inner.updated.borrow().clone();
        match handler {
            Some(handler) => handler(transition),
            None => log::trace!("update requested before the component was rendered"),
        }
    }

    pub fn has_update_handler(&self) -> bool {
        self.inner.updated.borrow().is_some()
    }

    pub(crate) fn set_update_handler(&self, handler: UpdateHandler) {
        *self.inner.updated.borrow_mut() = Some(handler);
    }

    pub fn ptr_eq(&self, other: &ComponentState) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for ComponentState {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentState")
            .field("has_update_handler", &self.has_update_handler())
            .finish_non_exhaustive()
    }
}
