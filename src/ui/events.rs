//! Background fetch event processing.
//!
//! All commit logic (generation checks, cache writes, index clamping) lives
//! in the application state; this layer only forwards and marks the frame
//! dirty.

use crate::app::{App, AppEvent};

pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    app.handle_event(event);
    app.needs_redraw = true;
}
