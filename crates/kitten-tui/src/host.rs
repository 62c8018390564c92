// ── Host shell seam ──
//
// Window-management calls a desktop wrapper may provide. All of them are
// fire-and-forget; a terminal has no window to manage, so the default
// binding only records the request.

use tracing::debug;

/// Window size the shell starts with and returns to on reset.
pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (1200, 800);

/// Size requested by the "large window" shortcut.
pub const LARGE_WINDOW_SIZE: (u32, u32) = (1600, 1000);

/// Window controls offered by an embedding desktop shell.
pub trait HostShell: Send {
    fn toggle_fullscreen(&mut self);

    fn set_window_size(&mut self, width: u32, height: u32);

    /// Leave fullscreen and return to [`DEFAULT_WINDOW_SIZE`].
    fn reset_window(&mut self) {
        let (width, height) = DEFAULT_WINDOW_SIZE;
        self.set_window_size(width, height);
    }
}

/// Binding used when no desktop shell is present.
#[derive(Debug, Default)]
pub struct NoHost;

impl HostShell for NoHost {
    fn toggle_fullscreen(&mut self) {
        debug!("no host shell: toggle_fullscreen ignored");
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        debug!(width, height, "no host shell: set_window_size ignored");
    }
}

/// Host request triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    ToggleFullscreen,
    SetWindowSize(u32, u32),
    ResetWindow,
}

impl HostAction {
    pub fn apply(self, host: &mut dyn HostShell) {
        match self {
            Self::ToggleFullscreen => host.toggle_fullscreen(),
            Self::SetWindowSize(w, h) => host.set_window_size(w, h),
            Self::ResetWindow => host.reset_window(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl HostShell for Recorder {
        fn toggle_fullscreen(&mut self) {
            self.calls.push("fullscreen".into());
        }

        fn set_window_size(&mut self, width: u32, height: u32) {
            self.calls.push(format!("size {width}x{height}"));
        }
    }

    #[test]
    fn reset_returns_to_default_size() {
        let mut host = Recorder::default();
        HostAction::ResetWindow.apply(&mut host);
        assert_eq!(host.calls, vec!["size 1200x800"]);
    }

    #[test]
    fn actions_dispatch_to_matching_calls() {
        let mut host = Recorder::default();
        HostAction::ToggleFullscreen.apply(&mut host);
        HostAction::SetWindowSize(1600, 1000).apply(&mut host);
        assert_eq!(host.calls, vec!["fullscreen", "size 1600x1000"]);
    }

    #[test]
    fn no_host_accepts_everything() {
        let mut host = NoHost;
        HostAction::ToggleFullscreen.apply(&mut host);
        HostAction::ResetWindow.apply(&mut host);
    }
}
