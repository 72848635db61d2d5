//! Behaviour for a single-page portfolio site, compiled to WebAssembly.
//!
//! The state machines (reveal coordinator, scroll hub, glyph rain, typewriter,
//! navbar, contact form) are plain Rust and build on any target. Only the
//! `wasm` module touches the DOM.

pub mod config;
pub mod contact;
pub mod error;
pub mod frame;
pub mod nav;
pub mod rain;
pub mod reveal;
pub mod scroll;
pub mod theme;
pub mod typing;

pub use error::{SiteError, SiteResult};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Window};

    use crate::config::{SiteConfig, CONFIG_ELEMENT_ID};
    use crate::error::{SiteError, SiteResult};

    pub mod contact;
    pub mod dom;
    pub mod nav;
    pub mod render;
    pub mod reveal;
    pub mod scroll;
    pub mod theme;
    pub mod typing;

    /// Everything bound to the page. Dropping it unmounts every behaviour.
    pub struct Site {
        _scroll: scroll::WindowScroll,
        reveals: Vec<reveal::RevealBinding>,
        rain: Option<render::RainEffect>,
        _typing: Vec<typing::TypingEffect>,
        _nav: Option<nav::NavBinding>,
        _contact: Option<contact::ContactBinding>,
    }

    impl Site {
        pub fn mount(window: &Window, document: &Document, config: &SiteConfig) -> SiteResult<Self> {
            let theme = theme::current(window);
            theme::apply(window, document, theme)?;

            let scroll = scroll::WindowScroll::attach(window)?;
            let hub = scroll.hub();

            let reveals = reveal::RevealBinding::attach_all(document, hub, config.reveal.threshold);
            let rain = render::RainEffect::attach(window, document, &config.rain, hub)?;

            let typing = config
                .typing
                .lines
                .iter()
                .filter_map(|line| {
                    let Some(target) = document.get_element_by_id(&line.target) else {
                        log::debug!("typing skipped: {}", SiteError::missing(&line.target));
                        return None;
                    };
                    Some(typing::TypingEffect::start(target, line.typewriter()))
                })
                .collect();

            let site = Self {
                reveals,
                rain,
                _typing: typing,
                _nav: nav::NavBinding::attach(document, hub)?,
                _contact: contact::ContactBinding::attach(document, config.email.clone())?,
                _scroll: scroll,
            };
            log::info!(
                "site mounted: {} reveal regions, glyph rain {}",
                site.reveals.len(),
                if site.rain.is_some() { "on" } else { "unavailable" }
            );
            Ok(site)
        }
    }

    thread_local! {
        static SITE: RefCell<Option<Site>> = const { RefCell::new(None) };
    }

    fn load_config(document: &Document) -> SiteConfig {
        let Some(text) = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            return SiteConfig::default();
        };
        SiteConfig::from_json_str(&text).unwrap_or_else(|err| {
            log::warn!("ignoring #{CONFIG_ELEMENT_ID}: {err}");
            SiteConfig::default()
        })
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        mount()
    }

    /// Bind the page. A no-op while already mounted; after [`teardown`] it
    /// re-discovers elements, so regions added since are picked up.
    #[wasm_bindgen]
    pub fn mount() -> Result<(), JsValue> {
        if SITE.with(|slot| slot.borrow().is_some()) {
            return Ok(());
        }
        let window = dom::window()?;
        let document = dom::document(&window)?;
        let config = load_config(&document);
        let site = Site::mount(&window, &document, &config)?;
        SITE.with(|slot| *slot.borrow_mut() = Some(site));
        Ok(())
    }

    /// Stop every observer, listener, timer and frame. Safe to call twice.
    #[wasm_bindgen]
    pub fn teardown() {
        let site = SITE.with(|slot| slot.borrow_mut().take());
        if site.is_some() {
            drop(site);
            log::info!("site unmounted");
        }
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted() -> bool {
        SITE.with(|slot| slot.borrow().is_some())
    }
}
