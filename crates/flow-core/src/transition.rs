//! How a visual change is applied to a view: immediately or animated.
//!
//! Animated transitions only record a [`FrameAnimation`] on the view; the
//! rendering backend owns interpolation.

use std::time::Duration;

use flow_ui_graphics::Rect;

use crate::view::ViewHandle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationCurve {
    #[default]
    EaseInOut,
    Linear,
    Spring,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animation {
    pub duration: Duration,
    pub curve: AnimationCurve,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Transition {
    #[default]
    Immediate,
    Animated(Animation),
}

/// Frame change left on a view by an animated transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameAnimation {
    pub from: Rect,
    pub to: Rect,
    pub animation: Animation,
}

impl Transition {
    pub fn immediate() -> Self {
        Transition::Immediate
    }

    pub fn animated(duration: Duration, curve: AnimationCurve) -> Self {
        Transition::Animated(Animation { duration, curve })
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Transition::Animated(_))
    }

    pub fn animation(&self) -> Option<Animation> {
        match self {
            Transition::Immediate => None,
            Transition::Animated(animation) => Some(*animation),
        }
    }

    /// Moves `view` to `frame`. An immediate transition drops any animation
    /// still pending on the view; an animated one records the change unless
    /// the frame is already in place.
    pub fn set_frame(&self, view: &ViewHandle, frame: Rect) {
        match self {
            Transition::Immediate => {
                view.set_pending_animation(None);
            }
            Transition::Animated(animation) => {
                let from = view.frame();
                if from != frame {
                    view.set_pending_animation(Some(FrameAnimation {
                        from,
                        to: frame,
                        animation: *animation,
                    }));
                }
            }
        }
        view.set_frame(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_ui_graphics::Size;

    #[test]
    fn immediate_transition_sets_frame_and_clears_animation() {
        let view = ViewHandle::new("view");
        let animated = Transition::animated(Duration::from_millis(200), AnimationCurve::Linear);
        animated.set_frame(&view, Rect::from_size(Size::new(10.0, 10.0)));
        assert!(view.pending_animation().is_some());

        Transition::immediate().set_frame(&view, Rect::from_size(Size::new(20.0, 20.0)));

        assert_eq!(view.frame().size(), Size::new(20.0, 20.0));
        assert!(view.pending_animation().is_none());
    }

    #[test]
    fn animated_transition_records_from_and_to() {
        let view = ViewHandle::new("view");
        view.set_frame(Rect::from_size(Size::new(5.0, 5.0)));
        let transition = Transition::animated(Duration::from_millis(300), AnimationCurve::Spring);

        transition.set_frame(&view, Rect::from_size(Size::new(15.0, 5.0)));

        let animation = view.take_pending_animation().expect("animation recorded");
        assert_eq!(animation.from.size(), Size::new(5.0, 5.0));
        assert_eq!(animation.to.size(), Size::new(15.0, 5.0));
        assert_eq!(animation.animation.curve, AnimationCurve::Spring);
        assert!(view.pending_animation().is_none());
    }

    #[test]
    fn animated_transition_ignores_unchanged_frame() {
        let view = ViewHandle::new("view");
        let frame = Rect::from_size(Size::new(5.0, 5.0));
        view.set_frame(frame);

        Transition::animated(Duration::from_millis(100), AnimationCurve::EaseInOut)
            .set_frame(&view, frame);

        assert!(view.pending_animation().is_none());
        assert!(!Transition::default().is_animated());
    }
}
