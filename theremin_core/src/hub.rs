//! Sensor sources and the handler registry they publish into.
//!
//! A [`SensorSource`] runs on its own thread and calls
//! [`SensorHub::publish`] for every frame it acquires.  Consumers register a
//! handler with [`SensorHub::subscribe`] and remove it with
//! [`SensorHub::unsubscribe`].

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crate::body::RawBodyFrame;
use crate::slot::FrameSlot;

// ════════════════════════════════════════════════════════════════════════════
// SensorSource trait — unified interface for hardware and simulation
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can acquire body frames.
pub trait SensorSource: Send + 'static {
    /// Acquire frames until the source is exhausted or the hub has been closed.
    fn run(self: Box<Self>, hub: SensorHub);
}

/// Start acquisition on a dedicated thread.
pub fn spawn_sensor_source<S: SensorSource>(source: S, hub: SensorHub) -> JoinHandle<()> {
    thread::spawn(move || Box::new(source).run(hub))
}

// ════════════════════════════════════════════════════════════════════════════
// SensorHub
// ════════════════════════════════════════════════════════════════════════════

type FrameHandler = Arc<Mutex<dyn FnMut(&RawBodyFrame) + Send>>;

/// Returned by [`SensorHub::subscribe`]; pass back to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

#[derive(Default)]
struct Registry {
    next_id:  u64,
    handlers: Vec<(Subscription, FrameHandler)>,
    closed:   bool,
    failure:  Option<String>,
}

#[derive(Clone, Default)]
pub struct SensorHub {
    registry: Arc<Mutex<Registry>>,
}

impl SensorHub {
    pub fn new() -> Self {
        SensorHub::default()
    }

    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: FnMut(&RawBodyFrame) + Send + 'static,
    {
        let handler: FrameHandler = Arc::new(Mutex::new(handler));
        let mut reg = self.lock();
        let sub = Subscription(reg.next_id);
        reg.next_id += 1;
        reg.handlers.push((sub, handler));
        sub
    }

    /// Returns false if `sub` was not registered.
    pub fn unsubscribe(&self, sub: Subscription) -> bool {
        let mut reg = self.lock();
        let before = reg.handlers.len();
        reg.handlers.retain(|(s, _)| *s != sub);
        reg.handlers.len() != before
    }

    /// Route every published frame into `slot`.
    pub fn attach_slot(&self, slot: &FrameSlot) -> Subscription {
        let slot = slot.clone();
        self.subscribe(move |frame| slot.store(frame.clone()))
    }

    /// Deliver `frame` to every handler, in subscription order.
    ///
    /// The registry is unlocked while handlers run, so a handler may
    /// subscribe, unsubscribe or close the hub.  Changes take effect on the
    /// next publish.
    pub fn publish(&self, frame: &RawBodyFrame) {
        let handlers: Vec<FrameHandler> = self.lock()
            .handlers
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();
        for handler in handlers {
            let mut handler = handler.lock().unwrap_or_else(PoisonError::into_inner);
            (&mut *handler)(frame);
        }
    }

    /// Ask sources to stop; they check [`is_closed`](Self::is_closed).
    pub fn close(&self) {
        self.lock().closed = true;
    }

    /// Close the hub because the source cannot continue.  The first reason
    /// recorded is kept.
    pub fn fail(&self, reason: impl Into<String>) {
        let mut reg = self.lock();
        reg.closed = true;
        if reg.failure.is_none() {
            reg.failure = Some(reason.into());
        }
    }

    /// Why the source stopped, if it failed.
    pub fn failure(&self) -> Option<String> {
        self.lock().failure.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().handlers.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
