//! Camera focus hints driven by the visible-tag count.
//!
//! While no tag is on screen the camera should keep refocusing to find one.
//! Once tags are visible, focus hunting would blur them and lose tracking, so
//! focus is locked.

use std::sync::Arc;

/// Camera focus modes a controller may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FocusMode {
    ContinuousVideo,
    ContinuousPicture,
    Auto,
    Fixed,
}

/// Explicit capability for changing the camera's focus mode.
pub trait FocusController: Send + Sync + 'static {
    fn supported_focus_modes(&self) -> Vec<FocusMode>;

    fn set_focus_mode(&self, mode: FocusMode);
}

impl<T: FocusController> FocusController for Arc<T> {
    fn supported_focus_modes(&self) -> Vec<FocusMode> {
        (**self).supported_focus_modes()
    }

    fn set_focus_mode(&self, mode: FocusMode) {
        (**self).set_focus_mode(mode)
    }
}

/// Chooses a focus mode for a visible-tag count.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusPolicy;

impl FocusPolicy {
    /// Continuous video focus with no tags visible; fixed (else auto) focus
    /// otherwise. `None` when the camera supports no suitable mode.
    pub fn mode_for(visible: usize, supported: &[FocusMode]) -> Option<FocusMode> {
        let preferred: &[FocusMode] = if visible == 0 {
            &[FocusMode::ContinuousVideo]
        } else {
            &[FocusMode::Fixed, FocusMode::Auto]
        };
        preferred.iter().copied().find(|mode| supported.contains(mode))
    }

    /// Visibility listener that applies the chosen mode to `controller`.
    ///
    /// Pass it to [`on_visibility_changed`](crate::SessionBuilder::on_visibility_changed).
    pub fn listener<C: FocusController>(controller: C) -> impl Fn(usize) + Send + Sync + 'static {
        move |visible| {
            let supported = controller.supported_focus_modes();
            match Self::mode_for(visible, &supported) {
                Some(mode) => {
                    tracing::debug!(visible, ?mode, "Switching focus mode");
                    controller.set_focus_mode(mode);
                }
                None => tracing::debug!(visible, "No suitable focus mode supported"),
            }
        }
    }
}
