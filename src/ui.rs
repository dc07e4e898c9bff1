//! Notification surface into the UI layer
//!
//! The core never draws anything. After applying a batch of files received
//! over the launch channel it tells the UI to show itself through this
//! trait; the real implementation lives with the (out-of-scope) widget
//! code.
//!
//! Calls arrive with the session lock held, so implementations must not
//! reach back into the session; everything they need comes as arguments.

pub trait Frontend: Send + Sync {
    /// Bring the editor window to the foreground.
    fn present_window(&self);
    /// The set of open files changed; redraw whatever lists them.
    fn refresh_file_list(&self);
    /// Make `path` the visible file.
    fn switch_to_file(&self, path: &str);
}

/// Frontend for headless operation: notifications go nowhere.
#[derive(Debug, Default)]
pub struct NullFrontend;

impl Frontend for NullFrontend {
    fn present_window(&self) {}
    fn refresh_file_list(&self) {}
    fn switch_to_file(&self, _path: &str) {}
}
