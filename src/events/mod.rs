//! # Events Module
//!
//! Event-driven progress reporting so any front end (CLI, GUI, web)
//! can display progress while the core stays free of rendering.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Fingerprint(FingerprintEvent::Progress(p)) = event {
//!             println!("{}: {}/{}", p.algorithm, p.completed, p.total);
//!         }
//!     }
//! });
//!
//! let mut session = Session::new(images, config)?.with_events(sender);
//! let report = session.run_once();
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
