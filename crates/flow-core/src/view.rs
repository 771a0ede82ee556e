//! Retained view tree the host renders into.
//!
//! A [`ViewHandle`] is a cheap, reference-counted handle to a node with a
//! frame, ordered subviews and a weak link to its superview. Backends keep
//! their own drawing state; the host only needs identity, frames, the tree
//! shape and a slot to attach the per-view component context.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};

use flow_ui_graphics::Rect;

use crate::transition::FrameAnimation;

pub type ViewId = usize;

static NEXT_VIEW_ID: AtomicUsize = AtomicUsize::new(1);

fn next_view_id() -> ViewId {
    NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed)
}

/// Capability installed on views that can be found by tag.
pub trait TaggedView {
    fn matches(&self, tag: &dyn Any) -> bool;
}

/// Matches tags of type `T` that compare equal to the stored value.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTag<T> {
    value: T,
}

impl<T> ViewTag<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: PartialEq + 'static> TaggedView for ViewTag<T> {
    fn matches(&self, tag: &dyn Any) -> bool {
        tag.downcast_ref::<T>()
            .is_some_and(|candidate| *candidate == self.value)
    }
}

struct ViewInner {
    id: ViewId,
    label: String,
    frame: Cell<Rect>,
    subviews: RefCell<Vec<ViewHandle>>,
    superview: RefCell<Weak<ViewInner>>,
    tag: RefCell<Option<Rc<dyn TaggedView>>>,
    context: RefCell<Option<Rc<dyn Any>>>,
    pending_animation: Cell<Option<FrameAnimation>>,
}

#[derive(Clone)]
pub struct ViewHandle {
    inner: Rc<ViewInner>,
}

impl ViewHandle {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ViewInner {
                id: next_view_id(),
                label: label.into(),
                frame: Cell::new(Rect::ZERO),
                subviews: RefCell::new(Vec::new()),
                superview: RefCell::new(Weak::new()),
                tag: RefCell::new(None),
                context: RefCell::new(None),
                pending_animation: Cell::new(None),
            }),
        }
    }

    pub fn id(&self) -> ViewId {
        self.inner.id
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn frame(&self) -> Rect {
        self.inner.frame.get()
    }

    /// Sets the frame without touching any recorded animation. Use
    /// [`crate::Transition::set_frame`] to apply a frame change the way a
    /// render pass does.
    pub fn set_frame(&self, frame: Rect) {
        self.inner.frame.set(frame);
    }

    pub fn ptr_eq(&self, other: &ViewHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Appends `child` as the last subview, detaching it from its previous
    /// superview first.
    ///
    /// # Panics
    /// Panics if `child` is this view.
    pub fn add_subview(&self, child: &ViewHandle) {
        assert!(!self.ptr_eq(child), "a view cannot be its own subview");
        child.remove_from_superview();
        self.inner.subviews.borrow_mut().push(child.clone());
        *child.inner.superview.borrow_mut() = Rc::downgrade(&self.inner);
    }

    pub fn remove_from_superview(&self) {
        let parent = self.inner.superview.replace(Weak::new());
        if let Some(parent) = parent.upgrade() {
            parent
                .subviews
                .borrow_mut()
                .retain(|view| !Rc::ptr_eq(&view.inner, &self.inner));
        }
    }

    pub fn subviews(&self) -> Vec<ViewHandle> {
        self.inner.subviews.borrow().clone()
    }

    pub fn subview_count(&self) -> usize {
        self.inner.subviews.borrow().len()
    }

    pub fn superview(&self) -> Option<ViewHandle> {
        self.inner
            .superview
            .borrow()
            .upgrade()
            .map(|inner| ViewHandle { inner })
    }

    pub fn set_tag(&self, tag: impl TaggedView + 'static) {
        *self.inner.tag.borrow_mut() = Some(Rc::new(tag));
    }

    pub fn clear_tag(&self) {
        self.inner.tag.borrow_mut().take();
    }

    pub fn matches_tag(&self, tag: &dyn Any) -> bool {
        let matcher = self.inner.tag.borrow().clone();
        matcher.is_some_and(|matcher| matcher.matches(tag))
    }

    /// Depth-first pre-order search for the first view in this subtree
    /// (including this view) whose tag matches.
    pub fn find_tagged(&self, tag: &dyn Any) -> Option<ViewHandle> {
        if self.matches_tag(tag) {
            return Some(self.clone());
        }
        self.subviews()
            .iter()
            .find_map(|subview| subview.find_tagged(tag))
    }

    /// Frame animation recorded by the last animated transition, if the
    /// backend has not consumed it yet.
    pub fn pending_animation(&self) -> Option<FrameAnimation> {
        self.inner.pending_animation.get()
    }

    pub fn take_pending_animation(&self) -> Option<FrameAnimation> {
        self.inner.pending_animation.take()
    }

    pub(crate) fn set_pending_animation(&self, animation: Option<FrameAnimation>) {
        self.inner.pending_animation.set(animation);
    }

    pub(crate) fn context<T: Any>(&self) -> Option<Rc<T>> {
        let context = self.inner.context.borrow().clone()?;
        context.downcast::<T>().ok()
    }

    pub(crate) fn has_context(&self) -> bool {
        self.inner.context.borrow().is_some()
    }

    pub(crate) fn set_context(&self, context: Rc<dyn Any>) {
        *self.inner.context.borrow_mut() = Some(context);
    }

    pub fn dump_tree(&self) -> String {
        let mut output = String::new();
        self.dump_view(&mut output, 0);
        output
    }

    fn dump_view(&self, output: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        output.push_str(&format!(
            "{}[{}] {} {}\n",
            indent,
            self.id(),
            self.label(),
            self.frame()
        ));
        for subview in self.subviews() {
            subview.dump_view(output, depth + 1);
        }
    }
}

impl PartialEq for ViewHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ViewHandle {}

impl fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHandle")
            .field("id", &self.id())
            .field("label", &self.label())
            .field("frame", &self.frame())
            .field("subviews", &self.subview_count())
            .finish()
    }
}
