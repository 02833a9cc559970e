/// Notifies the UI shell that the map image or the address label changed and should be shown.
pub trait Messenger: Send + Sync {
    /// Requests the shell to redraw the map view.
    fn request_redraw(&self);
}

/// Messenger that does nothing. Useful when the shell polls the controller on its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyMessenger;

impl Messenger for DummyMessenger {
    fn request_redraw(&self) {}
}
