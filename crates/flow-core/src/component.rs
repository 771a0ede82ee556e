//! The component capability and its type-erased form.

use std::any::{type_name, Any};
use std::fmt;
use std::rc::Rc;

use flow_ui_graphics::Size;

use crate::context::ComponentContext;
use crate::transition::Transition;
use crate::view::ViewHandle;

/// A value describing what to render.
///
/// Two descriptions that compare equal render the same thing; the host uses
/// that equality to skip work.
pub trait Component: PartialEq + 'static {
    type Environment: PartialEq + 'static;

    fn make_view(&self) -> ViewHandle;

    /// Initial payload for the view's [`crate::ComponentState`].
    fn make_state(&self) -> Box<dyn Any> {
        Box::new(())
    }

    /// Reconciles `view` with this description and returns the size it
    /// occupies within `available_size`.
    fn update(
        &self,
        view: &ViewHandle,
        available_size: Size,
        context: &ComponentContext<Self::Environment>,
        transition: Transition,
    ) -> Size;
}

trait DynComponent<E> {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn DynComponent<E>) -> bool;
    fn type_name(&self) -> &'static str;
    fn make_view(&self) -> ViewHandle;
    fn make_state(&self) -> Box<dyn Any>;
    fn update(
        &self,
        view: &ViewHandle,
        available_size: Size,
        context: &ComponentContext<E>,
        transition: Transition,
    ) -> Size;
}

impl<C: Component> DynComponent<C::Environment> for C {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn DynComponent<C::Environment>) -> bool {
        other
            .as_any()
            .downcast_ref::<C>()
            .is_some_and(|other| self == other)
    }

    fn type_name(&self) -> &'static str {
        type_name::<C>()
    }

    fn make_view(&self) -> ViewHandle {
        Component::make_view(self)
    }

    fn make_state(&self) -> Box<dyn Any> {
        Component::make_state(self)
    }

    fn update(
        &self,
        view: &ViewHandle,
        available_size: Size,
        context: &ComponentContext<C::Environment>,
        transition: Transition,
    ) -> Size {
        Component::update(self, view, available_size, context, transition)
    }
}

/// Type-erased component description compared by value.
pub struct AnyComponent<E> {
    inner: Rc<dyn DynComponent<E>>,
}

impl<E: PartialEq + 'static> AnyComponent<E> {
    pub fn new<C: Component<Environment = E>>(component: C) -> Self {
        Self {
            inner: Rc::new(component),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    pub fn downcast_ref<C: Component<Environment = E>>(&self) -> Option<&C> {
        self.inner.as_any().downcast_ref::<C>()
    }

    pub(crate) fn make_view(&self) -> ViewHandle {
        self.inner.make_view()
    }

    pub(crate) fn make_state(&self) -> Box<dyn Any> {
        self.inner.make_state()
    }

    pub(crate) fn update(
        &self,
        view: &ViewHandle,
        available_size: Size,
        context: &ComponentContext<E>,
        transition: Transition,
    ) -> Size {
        self.inner.update(view, available_size, context, transition)
    }
}

impl<E> Clone for AnyComponent<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> PartialEq for AnyComponent<E> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.dyn_eq(&*other.inner)
    }
}

impl<E> fmt::Debug for AnyComponent<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnyComponent")
            .field(&self.inner.type_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(PartialEq)]
    struct Label {
        text: &'static str,
    }

    impl Component for Label {
        type Environment = ();

        fn make_view(&self) -> ViewHandle {
            ViewHandle::new("Label")
        }

        fn update(
            &self,
            _view: &ViewHandle,
            available_size: Size,
            _context: &ComponentContext<()>,
            _transition: Transition,
        ) -> Size {
            Size::new(available_size.width.min(self.text.len() as f32), 1.0)
        }
    }

    #[derive(PartialEq)]
    struct Spacer {
        height: f32,
    }

    impl Component for Spacer {
        type Environment = ();

        fn make_view(&self) -> ViewHandle {
            ViewHandle::new("Spacer")
        }

        fn make_state(&self) -> Box<dyn Any> {
            Box::new(0_usize)
        }

        fn update(
            &self,
            _view: &ViewHandle,
            _available_size: Size,
            _context: &ComponentContext<()>,
            _transition: Transition,
        ) -> Size {
            Size::new(0.0, self.height)
        }
    }

    #[test]
    fn equality_is_by_value() {
        let first = AnyComponent::new(Label { text: "hello" });
        let same = AnyComponent::new(Label { text: "hello" });
        let other = AnyComponent::new(Label { text: "world" });

        assert_eq!(first, same);
        assert_ne!(first, other);
    }

    #[test]
    fn different_types_never_compare_equal() {
        let label = AnyComponent::new(Label { text: "" });
        let spacer = AnyComponent::new(Spacer { height: 0.0 });

        assert_ne!(label, spacer);
        assert!(label.type_name().ends_with("Label"));
    }

    #[test]
    fn nan_fields_defeat_reference_identity() {
        let spacer = AnyComponent::new(Spacer { height: f32::NAN });
        assert_ne!(spacer, spacer.clone());
    }

    #[test]
    fn downcast_and_state_seed_follow_concrete_type() {
        let spacer = AnyComponent::new(Spacer { height: 4.0 });

        assert_eq!(spacer.downcast_ref::<Spacer>().map(|s| s.height), Some(4.0));
        assert!(spacer.downcast_ref::<Label>().is_none());
        assert!(spacer.make_state().downcast_ref::<usize>().is_some());
        assert_eq!(spacer.make_view().label(), "Spacer");
    }
}
