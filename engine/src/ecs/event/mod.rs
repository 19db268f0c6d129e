mod bus;

pub use bus::EventBus;

/// Marker trait for event types.
///
/// Events must be:
/// - `'static`: No borrowed data
/// - `Send + Sync`: Safe to hand to a channel subscriber
///
/// Use `#[derive(Event)]` to implement this trait.
pub trait Event: 'static + Send + Sync {}
