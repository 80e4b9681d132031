//! Event channel implementation using crossbeam-channel.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Sends events from the core library.
///
/// Cheap to clone. If the receiver is gone, events are dropped so
/// progress reporting stays optional.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event, discarding it if nobody is listening.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

impl std::fmt::Debug for EventSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSender")
            .field("pending", &self.inner.len())
            .finish()
    }
}

/// Receives events from the core library.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event is received
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Drain whatever is queued without blocking
    pub fn drain(&self) -> Vec<Event> {
        self.inner.try_iter().collect()
    }

    /// Returns an iterator over received events
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Factory for connected sender/receiver pairs.
pub struct EventChannel;

impl EventChannel {
    /// Create a new unbounded event channel.
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A no-op event sender for tests and headless use.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ScanEvent, SessionEvent};
    use std::path::PathBuf;
    use std::thread;

    #[test]
    fn events_can_be_sent_across_threads() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.send(Event::Scan(ScanEvent::ImageFound {
                path: PathBuf::from("/photos/a.png"),
            }));
        });

        handle.join().unwrap();

        match receiver.recv().unwrap() {
            Event::Scan(ScanEvent::ImageFound { path }) => {
                assert_eq!(path, PathBuf::from("/photos/a.png"));
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(Event::Session(SessionEvent::Reset));
    }

    #[test]
    fn drain_returns_queued_events_in_order() {
        let (sender, receiver) = EventChannel::new();
        sender.send(Event::Session(SessionEvent::Reset));
        sender.send(Event::Scan(ScanEvent::Completed { total_images: 2 }));

        let events = receiver.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::Session(SessionEvent::Reset)));
        assert!(receiver.drain().is_empty());
    }
}
