use leptos::ev::{self, EventDescriptor};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event};

#[derive(Clone, Debug)]
pub struct EventOptions {
    pub passive: bool,
    pub capture: bool,
    pub once: bool,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self { passive: true, capture: false, once: false }
    }
}

/// Keeps a window listener registered until `remove` is called. Dropping
/// the handle without calling `remove` invalidates the JS callback.
pub struct WindowEventListenerHandle {
    event_name: String,
    callback: Closure<dyn FnMut(Event)>,
    capture: bool,
}

impl WindowEventListenerHandle {
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn remove(self) {
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback_and_bool(
                &self.event_name,
                self.callback.as_ref().unchecked_ref(),
                self.capture,
            );
        }
    }
}

pub fn window_event_listener_with_options<E>(
    event: E,
    options: &EventOptions,
    mut cb: impl FnMut(E::EventType) + 'static,
) -> WindowEventListenerHandle
where
    E: EventDescriptor + 'static,
    E::EventType: JsCast,
{
    let opts = AddEventListenerOptions::new();
    opts.set_passive(options.passive);
    opts.set_capture(options.capture);
    opts.set_once(options.once);

    let event_name = event.name().into_owned();
    let callback = Closure::wrap(Box::new(move |ev: Event| {
        cb(ev.unchecked_into::<E::EventType>());
    }) as Box<dyn FnMut(Event)>);

    if let Some(window) = web_sys::window() {
        let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
            &event_name,
            callback.as_ref().unchecked_ref(),
            &opts,
        );
    }

    WindowEventListenerHandle { event_name, callback, capture: options.capture }
}

/// Run `flush` when the page is going away. Browsers fire `pagehide`
/// reliably on mobile and `beforeunload` on desktop; both are hooked and
/// `flush` must tolerate running twice.
pub fn on_page_exit(flush: impl Fn() + 'static) -> Vec<WindowEventListenerHandle> {
    let flush = std::rc::Rc::new(flush);
    let options = EventOptions::default();
    let on_hide = flush.clone();
    vec![
        window_event_listener_with_options(ev::pagehide, &options, move |_| on_hide()),
        window_event_listener_with_options(ev::beforeunload, &options, move |_| flush()),
    ]
}

pub fn on_window_resize(cb: impl FnMut(web_sys::UiEvent) + 'static) -> WindowEventListenerHandle {
    window_event_listener_with_options(ev::resize, &EventOptions::default(), cb)
}
