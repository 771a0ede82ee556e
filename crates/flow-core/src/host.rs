//! The component host: owns one component view and decides whether an
//! update re-renders it.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use flow_ui_graphics::{Rect, Size};

use crate::component::AnyComponent;
use crate::context::ComponentContext;
use crate::environment::{EnvironmentBuilder, ErasedEnvironment};
use crate::state::ComponentState;
use crate::transition::Transition;
use crate::view::ViewHandle;

/// Upper bound on chained self-updates drained after a single pass.
const MAX_DEFERRED_UPDATES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Run the environment-construction procedure before checking for changes.
    pub update_environment: bool,
    /// Re-render even when nothing changed.
    pub force_update: bool,
}

impl UpdateOptions {
    const SELF_TRIGGERED: UpdateOptions = UpdateOptions {
        update_environment: false,
        force_update: true,
    };
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            update_environment: true,
            force_update: false,
        }
    }
}

struct HostInner<E> {
    view: ViewHandle,
    current_component: RefCell<Option<AnyComponent<E>>>,
    current_container_size: Cell<Option<Size>>,
    current_size: Cell<Option<Size>>,
    component_view: RefCell<Option<ViewHandle>>,
    is_updating: Cell<bool>,
    pending_update: Cell<Option<Transition>>,
}

/// Hosts a single component inside its own view.
///
/// The first [`ComponentHost::update`] always renders. Later calls return
/// the cached size unless the component description, the container size or
/// the environment changed. Components can also re-render themselves by
/// calling [`ComponentState::request_update`] on their context's state.
///
/// Handles are cheap to clone and all refer to the same host. The host is
/// single-threaded.
pub struct ComponentHost<E> {
    inner: Rc<HostInner<E>>,
}

impl<E> Clone for ComponentHost<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: PartialEq + 'static> ComponentHost<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(HostInner {
                view: ViewHandle::new("ComponentHost"),
                current_component: RefCell::new(None),
                current_container_size: Cell::new(None),
                current_size: Cell::new(None),
                component_view: RefCell::new(None),
                is_updating: Cell::new(false),
                pending_update: Cell::new(None),
            }),
        }
    }

    /// Renders `component` into `container_size` and returns the size it
    /// occupies.
    ///
    /// `environment` receives a builder for the component's environment and
    /// is called once per update. If the values it writes equal the previous
    /// ones, and `component` and `container_size` are unchanged, the
    /// previous size is returned without touching the component.
    ///
    /// # Panics
    /// Panics if either dimension of `container_size` is not finite or is
    /// `f32::MAX` or larger, or if called while this host is already
    /// updating.
    pub fn update<F>(
        &self,
        transition: Transition,
        component: AnyComponent<E>,
        environment: F,
        container_size: Size,
    ) -> Size
    where
        F: FnOnce(&mut EnvironmentBuilder<'_, E>),
    {
        self.update_with_options(
            transition,
            component,
            environment,
            container_size,
            UpdateOptions::default(),
        )
    }

    /// [`ComponentHost::update`] with explicit control over the environment
    /// phase and memoization.
    pub fn update_with_options<F>(
        &self,
        transition: Transition,
        component: AnyComponent<E>,
        environment: F,
        container_size: Size,
        options: UpdateOptions,
    ) -> Size
    where
        F: FnOnce(&mut EnvironmentBuilder<'_, E>),
    {
        let size =
            self.inner
                .update_internal(transition, &component, environment, options, container_size);
        let size = self.inner.drain_pending(size);
        self.inner.current_size.set(Some(size));
        size
    }

    /// First view in the rendered subtree whose tag matches `tag`, searched
    /// depth-first in pre-order. `None` before the first render.
    pub fn find_tagged_view(&self, tag: &dyn Any) -> Option<ViewHandle> {
        let component_view = self.component_view()?;
        component_view.find_tagged(tag)
    }

    /// The host's own view; the component view is its only subview.
    pub fn view(&self) -> &ViewHandle {
        &self.inner.view
    }

    pub fn component_view(&self) -> Option<ViewHandle> {
        self.inner.component_view.borrow().clone()
    }

    pub fn current_component(&self) -> Option<AnyComponent<E>> {
        self.inner.current_component.borrow().clone()
    }

    pub fn current_container_size(&self) -> Option<Size> {
        self.inner.current_container_size.get()
    }

    pub fn current_size(&self) -> Option<Size> {
        self.inner.current_size.get()
    }

    pub fn is_updating(&self) -> bool {
        self.inner.is_updating.get()
    }

    /// Whether a self-update requested mid-pass is waiting to run.
    pub fn has_pending_update(&self) -> bool {
        self.inner.pending_update.get().is_some()
    }
}

impl<E: PartialEq + 'static> Default for ComponentHost<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for ComponentHost<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentHost")
            .field("view", &self.inner.view)
            .field("component", &*self.inner.current_component.borrow())
            .field("container_size", &self.inner.current_container_size.get())
            .field("size", &self.inner.current_size.get())
            .field("is_updating", &self.inner.is_updating.get())
            .finish()
    }
}

impl<E: PartialEq + 'static> HostInner<E> {
    fn update_internal<F>(
        self: &Rc<Self>,
        transition: Transition,
        component: &AnyComponent<E>,
        environment: F,
        options: UpdateOptions,
        container_size: Size,
    ) -> Size
    where
        F: FnOnce(&mut EnvironmentBuilder<'_, E>),
    {
        assert!(
            !self.is_updating.get(),
            "ComponentHost update re-entered while an update is in progress"
        );
        assert!(
            container_size.is_bounded(),
            "container size must be finite and bounded, got {container_size}"
        );
        self.is_updating.set(true);

        let component_view = self.resolve_component_view(component);
        let context = ComponentContext::resolve(&component_view, component);

        if options.update_environment {
            let mut builder = context.environment().builder();
            environment(&mut builder);
        }

        let environment_updated = context.environment().is_updated();
        if environment_updated {
            log::trace!("environment of {} changed", component.type_name());
            context.environment().clear_updated();
        }

        if !options.force_update && !environment_updated {
            if let Some(size) = self.memoized_size(component, container_size) {
                log::trace!("{} unchanged; keeping size {size}", component.type_name());
                self.is_updating.set(false);
                return size;
            }
        }

        *self.current_component.borrow_mut() = Some(component.clone());
        self.current_container_size.set(Some(container_size));

        self.install_update_handler(context.state(), component, container_size);

        let updated_size = component.update(&component_view, container_size, &context, transition);
        transition.set_frame(&component_view, Rect::from_size(updated_size));

        self.current_size.set(Some(updated_size));
        self.is_updating.set(false);

        updated_size
    }

    fn resolve_component_view(&self, component: &AnyComponent<E>) -> ViewHandle {
        if let Some(view) = self.component_view.borrow().as_ref() {
            return view.clone();
        }
        let view = component.make_view();
        log::debug!(
            "created view {} for {}",
            view.id(),
            component.type_name()
        );
        self.view.add_subview(&view);
        *self.component_view.borrow_mut() = Some(view.clone());
        view
    }

    fn memoized_size(&self, component: &AnyComponent<E>, container_size: Size) -> Option<Size> {
        let current_size = self.current_size.get()?;
        let current_container_size = self.current_container_size.get()?;
        let current_component = self.current_component.borrow();
        let current_component = current_component.as_ref()?;
        (current_container_size == container_size && current_component == component)
            .then_some(current_size)
    }

    fn install_update_handler(
        self: &Rc<Self>,
        state: &ComponentState,
        component: &AnyComponent<E>,
        container_size: Size,
    ) {
        let host: Weak<Self> = Rc::downgrade(self);
        let component = component.clone();
        state.set_update_handler(Rc::new(move |transition: Transition| {
            let Some(host) = host.upgrade() else {
                log::trace!("update requested after its host was dropped");
                return;
            };
            if host.is_updating.get() {
                log::debug!("deferring self-update requested during an update pass");
                host.pending_update.set(Some(transition));
                return;
            }
            let size = host.self_update(transition, &component, container_size);
            host.drain_pending(size);
        }));
    }

    fn self_update(
        self: &Rc<Self>,
        transition: Transition,
        component: &AnyComponent<E>,
        container_size: Size,
    ) -> Size {
        log::trace!("self-update of {}", component.type_name());
        self.update_internal(
            transition,
            component,
            |_: &mut EnvironmentBuilder<'_, E>| {
                panic!("environment procedure invoked during a self-triggered update")
            },
            UpdateOptions::SELF_TRIGGERED,
            container_size,
        )
    }

    /// Runs self-updates that were requested while a pass was in progress.
    /// They re-render the committed component at the committed container
    /// size.
    fn drain_pending(self: &Rc<Self>, mut size: Size) -> Size {
        let mut passes = 0;
        loop {
            let Some(transition) = self.pending_update.take() else {
                return size;
            };
            passes += 1;
            assert!(
                passes <= MAX_DEFERRED_UPDATES,
                "component requested more than {MAX_DEFERRED_UPDATES} chained self-updates"
            );
            let current_component = self.current_component.borrow().clone();
            let (Some(component), Some(container_size)) =
                (current_component, self.current_container_size.get())
            else {
                return size;
            };
            size = self.self_update(transition, &component, container_size);
        }
    }
}
