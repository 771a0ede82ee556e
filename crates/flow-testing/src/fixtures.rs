//! Components, environments and probes for exercising a `ComponentHost`.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use flow_core::{
    Component, ComponentContext, ComponentState, EnvironmentBuilder, Transition, ViewHandle,
    ViewTag,
};
use flow_ui_graphics::Size;

#[derive(Clone, Debug, PartialEq)]
pub struct TestEnvironment {
    pub theme: &'static str,
    pub scale: f32,
}

impl TestEnvironment {
    pub fn light() -> Self {
        Self {
            theme: "light",
            scale: 1.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            theme: "dark",
            scale: 1.0,
        }
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::light()
    }
}

/// Environment procedure that writes `environment` into the builder.
pub fn provide(
    environment: TestEnvironment,
) -> impl FnOnce(&mut EnvironmentBuilder<'_, TestEnvironment>) {
    move |builder: &mut EnvironmentBuilder<'_, TestEnvironment>| builder.set(environment)
}

fn fit(size: Size, available: Size) -> Size {
    Size::new(
        size.width.min(available.width),
        size.height.min(available.height),
    )
}

#[derive(Default)]
struct ProbeInner {
    views_made: Cell<usize>,
    updates: Cell<usize>,
    last_available: Cell<Option<Size>>,
    last_transition: Cell<Option<Transition>>,
    last_environment: RefCell<Option<TestEnvironment>>,
    state: RefCell<Option<ComponentState>>,
    requests_during_update: Cell<usize>,
}

/// Shared record of what a fixture component was asked to do.
///
/// Probes are not part of a component's equality, so two components that
/// share a probe but differ in value still compare unequal, and vice versa.
#[derive(Clone, Default)]
pub struct RenderProbe {
    inner: Rc<ProbeInner>,
}

impl RenderProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views_made(&self) -> usize {
        self.inner.views_made.get()
    }

    pub fn updates(&self) -> usize {
        self.inner.updates.get()
    }

    pub fn last_available_size(&self) -> Option<Size> {
        self.inner.last_available.get()
    }

    pub fn last_transition(&self) -> Option<Transition> {
        self.inner.last_transition.get()
    }

    pub fn last_environment(&self) -> Option<TestEnvironment> {
        self.inner.last_environment.borrow().clone()
    }

    /// State handle of the most recent render.
    pub fn state(&self) -> Option<ComponentState> {
        self.inner.state.borrow().clone()
    }

    /// Makes the next `count` renders request a self-update from inside the
    /// component's own `update`.
    pub fn request_during_next_updates(&self, count: usize) {
        self.inner.requests_during_update.set(count);
    }

    fn record_view(&self) {
        self.inner.views_made.set(self.views_made() + 1);
    }

    fn record_update(
        &self,
        available_size: Size,
        context: &ComponentContext<TestEnvironment>,
        transition: Transition,
    ) {
        self.inner.updates.set(self.updates() + 1);
        self.inner.last_available.set(Some(available_size));
        self.inner.last_transition.set(Some(transition));
        *self.inner.last_environment.borrow_mut() =
            context.environment().try_with(TestEnvironment::clone);
        *self.inner.state.borrow_mut() = Some(context.state().clone());

        let pending = self.inner.requests_during_update.get();
        if pending > 0 {
            self.inner.requests_during_update.set(pending - 1);
            context.state().request_update(Transition::immediate());
        }
    }
}

/// Stateless component that reports a fixed preferred size.
#[derive(Clone)]
pub struct RecordingComponent {
    pub label: &'static str,
    pub size: Size,
    probe: RenderProbe,
}

impl RecordingComponent {
    pub fn new(label: &'static str, size: Size, probe: &RenderProbe) -> Self {
        Self {
            label,
            size,
            probe: probe.clone(),
        }
    }
}

impl PartialEq for RecordingComponent {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.size == other.size
    }
}

impl Component for RecordingComponent {
    type Environment = TestEnvironment;

    fn make_view(&self) -> ViewHandle {
        self.probe.record_view();
        ViewHandle::new(format!("Recording({})", self.label))
    }

    fn update(
        &self,
        _view: &ViewHandle,
        available_size: Size,
        context: &ComponentContext<TestEnvironment>,
        transition: Transition,
    ) -> Size {
        self.probe.record_update(available_size, context, transition);
        fit(self.size, available_size)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CounterState {
    pub count: i32,
}

/// Component with local state; its width grows by ten per count.
#[derive(Clone)]
pub struct CounterComponent {
    pub start: i32,
    probe: RenderProbe,
}

impl CounterComponent {
    pub fn new(start: i32, probe: &RenderProbe) -> Self {
        Self {
            start,
            probe: probe.clone(),
        }
    }

    pub fn width_for(count: i32) -> f32 {
        count as f32 * 10.0
    }
}

impl PartialEq for CounterComponent {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
    }
}

impl Component for CounterComponent {
    type Environment = TestEnvironment;

    fn make_view(&self) -> ViewHandle {
        self.probe.record_view();
        ViewHandle::new("Counter")
    }

    fn make_state(&self) -> Box<dyn Any> {
        Box::new(CounterState { count: self.start })
    }

    fn update(
        &self,
        _view: &ViewHandle,
        available_size: Size,
        context: &ComponentContext<TestEnvironment>,
        transition: Transition,
    ) -> Size {
        let count = context
            .state()
            .with(|state: &CounterState| state.count)
            .unwrap_or_default();
        self.probe.record_update(available_size, context, transition);
        fit(Size::new(Self::width_for(count), 20.0), available_size)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub label: &'static str,
    pub tag: Option<&'static str>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(label: &'static str) -> Self {
        Self {
            label,
            tag: None,
            children: Vec::new(),
        }
    }

    pub fn tagged(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    fn apply_tag(&self, view: &ViewHandle) {
        match self.tag {
            Some(tag) => view.set_tag(ViewTag::new(tag)),
            None => view.clear_tag(),
        }
    }

    fn build(&self) -> ViewHandle {
        let view = ViewHandle::new(self.label);
        self.apply_tag(&view);
        for child in &self.children {
            view.add_subview(&child.build());
        }
        view
    }
}

/// Component that mirrors a [`TreeNode`] description into subviews.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeComponent {
    pub root: TreeNode,
    pub size: Size,
}

impl TreeComponent {
    pub fn new(root: TreeNode, size: Size) -> Self {
        Self { root, size }
    }
}

impl Component for TreeComponent {
    type Environment = TestEnvironment;

    fn make_view(&self) -> ViewHandle {
        ViewHandle::new(self.root.label)
    }

    fn update(
        &self,
        view: &ViewHandle,
        available_size: Size,
        _context: &ComponentContext<TestEnvironment>,
        _transition: Transition,
    ) -> Size {
        self.root.apply_tag(view);
        for subview in view.subviews() {
            subview.remove_from_superview();
        }
        for child in &self.root.children {
            view.add_subview(&child.build());
        }
        fit(self.size, available_size)
    }
}
