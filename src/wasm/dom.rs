use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, Event, EventTarget, Window};

use crate::error::{SiteError, SiteResult};

pub fn window() -> SiteResult<Window> {
    web_sys::window().ok_or_else(|| SiteError::Js("no window".to_owned()))
}

pub fn document(window: &Window) -> SiteResult<Document> {
    window
        .document()
        .ok_or_else(|| SiteError::Js("no document".to_owned()))
}

/// Current vertical scroll offset; 0 if the browser refuses to report it.
pub fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

pub fn viewport_size(window: &Window) -> (f64, f64) {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (dim(window.inner_width()), dim(window.inner_height()))
}

/// Elements under `root` matching `selector`, in document order.
pub fn select_all(root: &Element, selector: &str) -> SiteResult<Vec<Element>> {
    let list = root.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Replace any of `family` on `el` with `class`.
pub fn swap_class(el: &Element, family: &[&str], class: &str) {
    let list = el.class_list();
    for stale in family.iter().filter(|c| **c != class) {
        let _ = list.remove_1(stale);
    }
    let _ = list.add_1(class);
}

/// Event listener removed from its target on drop.
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> SiteResult<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}
