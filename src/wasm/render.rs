use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, Window};

use super::dom::{self, Listener};
use super::theme;
use crate::config::RainConfig;
use crate::error::SiteResult;
use crate::rain::{AnchorGate, GlyphSurface, RainField, RainLoop};
use crate::scroll::{ScrollHub, Subscription};
use crate::theme::RainPalette;

impl GlyphSurface for CanvasRenderingContext2d {
    fn fade(&mut self, fill: &str, width: f64, height: f64) {
        self.set_fill_style_str(fill);
        self.fill_rect(0.0, 0.0, width, height);
    }

    fn set_glyph_style(&mut self, fill: &str, font: &str) {
        self.set_fill_style_str(fill);
        self.set_font(font);
    }

    fn draw_glyph(&mut self, glyph: char, x: f64, y: f64) {
        let mut buf = [0u8; 4];
        let _ = self.fill_text(glyph.encode_utf8(&mut buf), x, y);
    }
}

/// A self-renewing `requestAnimationFrame` chain. Dropping the handle cancels
/// the pending frame and releases the callback.
pub struct AnimationLoop {
    window: Window,
    pending: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl AnimationLoop {
    pub fn start(window: &Window, mut frame: impl FnMut(f64) + 'static) -> SiteResult<Self> {
        let pending = Rc::new(Cell::new(None));

        // `f` holds the animation-frame closure so that it can keep calling
        // `request_animation_frame` on itself.
        let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let pending_in_frame = Rc::clone(&pending);
        let win = window.clone();
        let callback = Closure::wrap(Box::new({
            let f = Rc::clone(&f);
            move |timestamp: f64| {
                frame(timestamp);
                // Cancelled while painting: the slot is empty and nothing is rescheduled.
                let next = f.borrow().as_ref().and_then(|cb| {
                    win.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
                });
                pending_in_frame.set(next);
            }
        }) as Box<dyn FnMut(f64)>);

        let first = window.request_animation_frame(callback.as_ref().unchecked_ref())?;
        *f.borrow_mut() = Some(callback);
        pending.set(Some(first));

        Ok(Self {
            window: window.clone(),
            pending,
            callback: f,
        })
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.get().is_some()
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // Breaks the closure's reference cycle through `f`.
        self.callback.borrow_mut().take();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct RainState {
    window: Window,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    anchor: HtmlElement,
    gate: AnchorGate,
    fade_alpha: f64,
    rain: Rc<RefCell<RainLoop>>,
    frames: Option<AnimationLoop>,
}

impl RainState {
    fn fit_canvas(&self) {
        let (width, height) = dom::viewport_size(&self.window);
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        self.rain.borrow_mut().resize(width, height);
    }

    fn sync(&mut self, scroll_y: f64) {
        let anchor_height = f64::from(self.anchor.offset_height());
        let active = self.gate.is_active(scroll_y, anchor_height);
        match (active, self.frames.is_some()) {
            (true, false) => self.activate(),
            (false, true) => self.deactivate(),
            _ => {}
        }
    }

    fn activate(&mut self) {
        let palette = RainPalette::for_theme(theme::current(&self.window), self.fade_alpha);
        self.fit_canvas();
        self.rain.borrow_mut().reactivate(palette);

        let rain = Rc::clone(&self.rain);
        let mut context = self.context.clone();
        match AnimationLoop::start(&self.window, move |ts| {
            rain.borrow_mut().tick(ts, &mut context);
        }) {
            Ok(frames) => {
                let _ = self.canvas.style().remove_property("display");
                self.frames = Some(frames);
                log::debug!("glyph rain started");
            }
            Err(err) => log::warn!("glyph rain could not start: {err}"),
        }
    }

    fn deactivate(&mut self) {
        self.frames = None;
        self.hide();
        log::debug!("glyph rain paused");
    }

    fn hide(&self) {
        let _ = self.canvas.style().set_property("display", "none");
    }
}

/// Full-viewport glyph rain, running only while the anchor section is in view.
pub struct RainEffect {
    state: Rc<RefCell<RainState>>,
    _scroll: Subscription,
    _resize: Listener,
}

impl RainEffect {
    /// Returns `Ok(None)` when the canvas, anchor or 2D context is unavailable;
    /// the effect is decorative and its absence is not an error.
    pub fn attach(
        window: &Window,
        document: &Document,
        config: &RainConfig,
        hub: &ScrollHub,
    ) -> SiteResult<Option<Self>> {
        let Some(canvas) = document
            .get_element_by_id(&config.canvas)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::debug!("no #{} canvas; glyph rain disabled", config.canvas);
            return Ok(None);
        };
        let Some(anchor) = document
            .get_element_by_id(&config.anchor)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            log::debug!("no #{} anchor; glyph rain disabled", config.anchor);
            return Ok(None);
        };
        let Some(context) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            log::debug!("2d context unavailable; glyph rain disabled");
            return Ok(None);
        };

        let (width, height) = dom::viewport_size(window);
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        let field = RainField::new(width, height, config.settings.clone(), seed);
        let palette = RainPalette::for_theme(theme::current(window), config.settings.fade_alpha);

        let state = Rc::new(RefCell::new(RainState {
            window: window.clone(),
            canvas,
            context,
            anchor,
            gate: config.gate,
            fade_alpha: config.settings.fade_alpha,
            rain: Rc::new(RefCell::new(RainLoop::new(field, palette))),
            frames: None,
        }));

        let resize = {
            let state = Rc::clone(&state);
            Listener::new(window, "resize", move |_| state.borrow().fit_canvas())?
        };
        let scroll = {
            let state = Rc::clone(&state);
            hub.subscribe(move |sample| state.borrow_mut().sync(sample.offset))
        };

        {
            let mut state = state.borrow_mut();
            state.sync(hub.latest().offset);
            if state.frames.is_none() {
                state.hide();
            }
        }
        Ok(Some(Self {
            state,
            _scroll: scroll,
            _resize: resize,
        }))
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().frames.is_some()
    }
}

impl Drop for RainEffect {
    fn drop(&mut self) {
        self.state.borrow_mut().frames = None;
    }
}
