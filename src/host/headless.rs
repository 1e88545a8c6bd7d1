use std::collections::{BTreeSet, VecDeque};

use crate::foundation::core::Viewport;
use crate::host::{FrameHandle, Host, HostEvent, ListenerId};

/// Deterministic host with no window: refreshes and resizes happen when the caller says so.
///
/// Refresh requests made while a refresh is being delivered wait for the next
/// [`HeadlessHost::refresh`], matching `requestAnimationFrame` semantics.
#[derive(Debug)]
pub struct HeadlessHost {
    viewport: Viewport,
    next_id: u64,
    requested: BTreeSet<FrameHandle>,
    listeners: BTreeSet<ListenerId>,
    queue: VecDeque<HostEvent>,
    refreshes: u64,
}

impl HeadlessHost {
    /// Host showing `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            next_id: 1,
            requested: BTreeSet::new(),
            listeners: BTreeSet::new(),
            queue: VecDeque::new(),
            refreshes: 0,
        }
    }

    /// Simulate one display refresh: every outstanding request becomes a queued event.
    pub fn refresh(&mut self) {
        self.refreshes += 1;
        let due = std::mem::take(&mut self.requested);
        self.queue.extend(due.into_iter().map(HostEvent::Refresh));
    }

    /// Change the viewport and notify every registered listener.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let listeners: Vec<ListenerId> = self.listeners.iter().copied().collect();
        self.queue.extend(listeners.into_iter().map(HostEvent::Resize));
    }

    /// Next event to deliver, if any.
    pub fn poll_event(&mut self) -> Option<HostEvent> {
        self.queue.pop_front()
    }

    /// Refresh requests not yet turned into events.
    pub fn requested_frames(&self) -> usize {
        self.requested.len()
    }

    /// Events queued but not yet delivered.
    pub fn queued_events(&self) -> usize {
        self.queue.len()
    }

    /// Registered resize listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Display refreshes simulated so far.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    fn issue(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Host for HeadlessHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.issue());
        self.requested.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.requested.remove(&handle);
        self.queue.retain(|ev| *ev != HostEvent::Refresh(handle));
    }

    fn add_resize_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.issue());
        self.listeners.insert(id);
        id
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
        self.queue.retain(|ev| *ev != HostEvent::Resize(id));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/headless.rs"]
mod tests;
