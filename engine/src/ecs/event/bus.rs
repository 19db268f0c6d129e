//! Synchronous publish/subscribe dispatch.
//!
//! The [`EventBus`] delivers each published event immediately to every subscriber of that exact
//! type, in subscription order. There is no buffering: an event published with no subscribers
//! is dropped.
//!
//! Systems that want to consume events during their own update can use
//! [`channel`](EventBus::channel), which subscribes a `crossbeam` sender and hands back the
//! receiving end to drain later.
//!
//! # Example
//!
//! ```rust,ignore
//! #[derive(Event, Clone)]
//! struct Splash { x: f32 }
//!
//! let mut bus = EventBus::new();
//! bus.subscribe(|e: &Splash| log::info!("splash at {}", e.x));
//! let splashes = bus.channel::<Splash>();
//!
//! bus.publish(Splash { x: 3.0 });
//! assert_eq!(splashes.try_recv().map(|e| e.x), Ok(3.0));
//! ```

use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
};

use crossbeam::channel::{self, Receiver};

use crate::ecs::event::Event;

type Callback = Box<dyn FnMut(&dyn Any)>;

/// Typed subscriber lists keyed by event type.
#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<TypeId, Vec<Callback>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
        }
    }

    /// Add a callback for events of type `E`.
    pub fn subscribe<E: Event>(&mut self, mut callback: impl FnMut(&E) + 'static) {
        let erased: Callback = Box::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                callback(event);
            }
        });
        self.subscribers
            .entry(TypeId::of::<E>())
            .or_default()
            .push(erased);
    }

    /// Subscribe a channel for events of type `E` and return the receiving end.
    ///
    /// Every published event is cloned into the channel. Once the receiver is dropped the
    /// subscription silently stops delivering.
    pub fn channel<E: Event + Clone>(&mut self) -> Receiver<E> {
        let (sender, receiver) = channel::unbounded();
        self.subscribe(move |event: &E| {
            let _ = sender.send(event.clone());
        });
        receiver
    }

    /// Deliver `event` to every subscriber of its type. Returns the number of subscribers
    /// that were called.
    pub fn publish<E: Event>(&mut self, event: E) -> usize {
        let Some(subscribers) = self.subscribers.get_mut(&TypeId::of::<E>()) else {
            log::trace!("dropping {}: no subscribers", type_name::<E>());
            return 0;
        };
        for subscriber in subscribers.iter_mut() {
            subscriber(&event as &dyn Any);
        }
        subscribers.len()
    }

    /// Number of subscribers for events of type `E`.
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.subscribers
            .get(&TypeId::of::<E>())
            .map_or(0, |subscribers| subscribers.len())
    }
}
