//! Owned DOM event listener registrations.
//!
//! A `Listener` keeps its closure alive while registered and removes it from
//! the target when dropped, so a session can detach exactly the handlers it
//! attached by dropping the handles it holds.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget};

pub struct Listener {
    target: EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    /// Register `callback` for `event_type` on `target`.
    pub fn new<F>(target: &EventTarget, event_type: &'static str, callback: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())?;

        Ok(Self {
            target: target.clone(),
            event_type,
            callback,
        })
    }

    pub fn event_type(&self) -> &'static str {
        self.event_type
    }
}

// Dropping a listener from inside its own callback is fine: wasm-bindgen
// defers freeing the closure until the running call returns.
impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event_type, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("Failed to remove {} listener: {:?}", self.event_type, e);
        }
    }
}
