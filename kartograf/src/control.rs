//! Keyboard and pointer input in a form independent of the UI toolkit.
//!
//! The shell converts its native events into [`UserEvent`]s and gives them to
//! [`ViewController::handle`](crate::ViewController::handle), which turns them into intents:
//!
//! | Input                  | Intent                  |
//! |------------------------|-------------------------|
//! | `PageUp` / `PageDown`  | zoom in / zoom out      |
//! | arrow keys             | pan                     |
//! | left click             | place the marker        |
//! | right click            | nearby business search  |

use kartograf_types::cartesian::Point2d;

/// Keys the viewer reacts to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    /// Zoom in.
    PageUp,
    /// Zoom out.
    PageDown,
    /// Pan west.
    Left,
    /// Pan east.
    Right,
    /// Pan north.
    Up,
    /// Pan south.
    Down,
    /// Any other key.
    Other,
}

/// Mouse button enum.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MouseButton {
    /// Places the marker.
    Left,
    /// Not used by the viewer.
    Middle,
    /// Searches for businesses next to the pointer.
    Right,
    /// Any other button.
    Other,
}

/// User interaction event.
#[derive(Debug, Clone, PartialEq)]
pub enum UserEvent {
    /// A key was pressed.
    KeyPressed(Key),
    /// A mouse button was clicked at the given pixel position of the map image, measured from its
    /// top-left corner.
    Click(MouseButton, Point2d),
}

/// Value returned by the event handler to indicate the status of the event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventPropagation {
    /// Event was not used by the viewer and should be given to the next handler.
    Propagate,
    /// Event was handled.
    Stop,
}
