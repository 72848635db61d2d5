use web_sys::Window;

use super::dom::{self, Listener};
use crate::error::SiteResult;
use crate::scroll::ScrollHub;

/// The page's only `scroll` listener, feeding the shared [`ScrollHub`].
pub struct WindowScroll {
    hub: ScrollHub,
    _listener: Listener,
}

impl WindowScroll {
    pub fn attach(window: &Window) -> SiteResult<Self> {
        let hub = ScrollHub::new(dom::scroll_y(window));
        let listener = {
            let hub = hub.clone();
            let win = window.clone();
            Listener::new(window, "scroll", move |_| {
                hub.publish(dom::scroll_y(&win));
            })?
        };
        Ok(Self {
            hub,
            _listener: listener,
        })
    }

    pub fn hub(&self) -> &ScrollHub {
        &self.hub
    }
}
