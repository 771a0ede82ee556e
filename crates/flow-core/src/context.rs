use std::rc::Rc;

use crate::component::AnyComponent;
use crate::environment::Environment;
use crate::state::ComponentState;
use crate::view::ViewHandle;

/// Per-view bundle of component state and environment, attached to the view
/// the first time a component renders into it.
pub struct ComponentContext<E> {
    state: ComponentState,
    environment: Environment<E>,
}

impl<E: PartialEq + 'static> ComponentContext<E> {
    pub fn new(state: ComponentState) -> Self {
        Self {
            state,
            environment: Environment::new(),
        }
    }

    pub fn state(&self) -> &ComponentState {
        &self.state
    }

    pub fn environment(&self) -> &Environment<E> {
        &self.environment
    }

    /// Context already attached to `view`, if any.
    pub fn of(view: &ViewHandle) -> Option<Rc<Self>> {
        view.context::<Self>()
    }

    /// Context attached to `view`, creating it from `component` when the view
    /// has none (or carries a context for another environment type).
    pub(crate) fn resolve(view: &ViewHandle, component: &AnyComponent<E>) -> Rc<Self> {
        if let Some(context) = Self::of(view) {
            return context;
        }
        if view.has_context() {
            log::debug!(
                "replacing context of view {} with one for {}",
                view.id(),
                std::any::type_name::<E>()
            );
        }
        let context = Rc::new(Self::new(ComponentState::new(component.make_state())));
        view.set_context(context.clone());
        context
    }
}
