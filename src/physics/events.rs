//! Synchronous observer lists, one per emitter, as described in `spec.md` §9:
//! "Events map to a typed observer list per emitter; synchronous dispatch
//! preserves source semantics." `Body` owns `collision`/`sleep_enter`/
//! `sleep_exit` sinks; `Engine` owns `pre_update`/`update`.

/// A list of listeners for one event type, dispatched in registration order.
pub struct EventSink<T> {
    listeners: Vec<Box<dyn FnMut(&T)>>,
}

impl<T> EventSink<T> {
    pub fn new() -> Self {
        Self { listeners: Vec::new() }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, value: &T) {
        for listener in self.listeners.iter_mut() {
            listener(value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T> Default for EventSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for EventSink<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
