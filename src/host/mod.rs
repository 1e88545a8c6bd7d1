//! The environment a backdrop is mounted into.
//!
//! A host owns the display refresh and the resize notifications. The backdrop never keeps
//! callbacks in it; it holds plain handles and reacts to [`HostEvent`]s delivered back to it.

use crate::foundation::core::Viewport;

/// Headless in-memory host.
pub mod headless;

/// Ticket for one requested display refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(pub u64);

/// Ticket for one resize listener registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Notifications a host delivers to a mounted backdrop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// A previously requested refresh has arrived.
    Refresh(FrameHandle),
    /// The window was resized; the new viewport is available from [`Host::viewport`].
    Resize(ListenerId),
}

/// Services a backdrop needs from its environment.
pub trait Host {
    /// Current viewport width and full document height.
    fn viewport(&self) -> Viewport;

    /// Ask for one [`HostEvent::Refresh`] on the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a refresh request. Unknown or already delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Start delivering [`HostEvent::Resize`] for this registration.
    fn add_resize_listener(&mut self) -> ListenerId;

    /// Stop delivering resize events for `id`. Unknown ids are ignored.
    fn remove_resize_listener(&mut self, id: ListenerId);
}
