use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{Document, Element};

use super::dom::{self, Listener};
use crate::error::SiteResult;
use crate::nav::{NavState, NAV_LINKS};
use crate::scroll::{ScrollHub, Subscription};

const SCROLLED_CLASS: &str = "nav-scrolled";
const OPEN_CLASS: &str = "open";
const LINKS_SELECTOR: &str = "[data-nav-links]";

/// Fill an empty link container with the section links.
fn render_links(document: &Document, container: &Element) -> SiteResult<()> {
    if container.child_element_count() > 0 {
        return Ok(());
    }
    for (label, href) in NAV_LINKS {
        let link = document.create_element("a")?;
        link.set_attribute("href", href)?;
        link.set_text_content(Some(label));
        container.append_child(&link)?;
    }
    Ok(())
}

/// Navbar backdrop and the mobile menu.
pub struct NavBinding {
    _scroll: Subscription,
    _listeners: Vec<Listener>,
}

impl NavBinding {
    pub fn attach(document: &Document, hub: &ScrollHub) -> SiteResult<Option<Self>> {
        let Some(navbar) = document.get_element_by_id("navbar") else {
            return Ok(None);
        };
        if let Some(root) = document.document_element() {
            for container in dom::select_all(&root, LINKS_SELECTOR)? {
                render_links(document, &container)?;
            }
        }
        let state = Rc::new(RefCell::new(NavState::default()));

        let set_scrolled = |navbar: &Element, scrolled: bool| {
            let _ = navbar.class_list().toggle_with_force(SCROLLED_CLASS, scrolled);
        };
        {
            let mut nav = state.borrow_mut();
            nav.on_scroll(hub.latest().offset);
            set_scrolled(&navbar, nav.scrolled);
        }
        let scroll = {
            let state = Rc::clone(&state);
            let navbar = navbar.clone();
            hub.subscribe(move |sample| {
                let mut nav = state.borrow_mut();
                if nav.on_scroll(sample.offset) {
                    set_scrolled(&navbar, nav.scrolled);
                }
            })
        };

        let mut listeners = Vec::new();
        if let (Some(toggle), Some(menu)) = (
            document.get_element_by_id("menu-toggle"),
            document.get_element_by_id("mobile-menu"),
        ) {
            let show = |menu: &Element, open: bool| {
                let _ = menu.class_list().toggle_with_force(OPEN_CLASS, open);
            };
            {
                let state = Rc::clone(&state);
                let menu = menu.clone();
                listeners.push(Listener::new(&toggle, "click", move |_| {
                    let open = state.borrow_mut().toggle_menu();
                    show(&menu, open);
                })?);
            }
            for link in dom::select_all(&menu, "a")? {
                let state = Rc::clone(&state);
                let menu = menu.clone();
                listeners.push(Listener::new(&link, "click", move |_| {
                    state.borrow_mut().close_menu();
                    show(&menu, false);
                })?);
            }
        }

        Ok(Some(Self {
            _scroll: scroll,
            _listeners: listeners,
        }))
    }
}
