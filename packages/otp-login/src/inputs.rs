//! Focus management for the code slots.
//!
//! The front end mounts one handle per slot. The controller addresses slots
//! by index and never looks them up itself. A focus request made before the
//! slot is mounted is remembered and applied on mount.

use std::sync::Arc;

use crate::draft::CODE_LENGTH;

/// Something that can take keyboard focus, e.g. a rendered `<input>`.
pub trait FocusHandle: Send + Sync {
    fn focus(&self);
}

/// Indexed handles for the code slots.
#[derive(Default)]
pub struct CodeInputs {
    handles: [Option<Arc<dyn FocusHandle>>; CODE_LENGTH],
    focused: Option<usize>,
}

impl CodeInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the handle for slot `index`.
    pub fn mount(&mut self, index: usize, handle: Arc<dyn FocusHandle>) {
        let Some(slot) = self.handles.get_mut(index) else {
            return;
        };
        if self.focused == Some(index) {
            handle.focus();
        }
        *slot = Some(handle);
    }

    pub fn unmount(&mut self, index: usize) {
        if let Some(slot) = self.handles.get_mut(index) {
            *slot = None;
        }
    }

    /// Move focus to slot `index`. Out-of-range indices are ignored.
    pub fn focus(&mut self, index: usize) {
        let Some(slot) = self.handles.get(index) else {
            return;
        };
        self.focused = Some(index);
        if let Some(handle) = slot {
            handle.focus();
        }
    }

    /// Slot that last received (or is waiting for) focus.
    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingFocus;

    #[test]
    fn focus_before_mount_is_applied_on_mount() {
        let mut inputs = CodeInputs::new();
        let first = RecordingFocus::new();

        inputs.focus(0);
        assert_eq!(first.count(), 0);

        inputs.mount(0, first.handle());
        assert_eq!(first.count(), 1);
        assert_eq!(inputs.focused(), Some(0));
    }

    #[test]
    fn focus_calls_mounted_handle() {
        let mut inputs = CodeInputs::new();
        let third = RecordingFocus::new();
        inputs.mount(2, third.handle());

        inputs.focus(2);
        inputs.focus(2);
        assert_eq!(third.count(), 2);
    }

    #[test]
    fn out_of_range_focus_is_ignored() {
        let mut inputs = CodeInputs::new();
        inputs.focus(1);
        inputs.focus(CODE_LENGTH);
        assert_eq!(inputs.focused(), Some(1));
    }
}
