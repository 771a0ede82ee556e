#![doc = r"Component hosting and reconciliation core for Component Flow."]

pub mod component;
pub mod context;
pub mod environment;
pub mod host;
pub mod state;
pub mod transition;
pub mod view;

pub use component::{AnyComponent, Component};
pub use context::ComponentContext;
pub use environment::{Environment, EnvironmentBuilder, ErasedEnvironment};
pub use host::{ComponentHost, UpdateOptions};
pub use state::{ComponentState, StateError};
pub use transition::{Animation, AnimationCurve, FrameAnimation, Transition};
pub use view::{TaggedView, ViewHandle, ViewId, ViewTag};

pub use flow_ui_graphics::{Point, Rect, Size};
