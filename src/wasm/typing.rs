use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use web_sys::Element;

use crate::typing::Typewriter;

type Slot = Rc<RefCell<Option<Timeout>>>;

/// Plays a [`Typewriter`] into an element's text, one step per timeout.
/// Dropping the effect cancels the next step.
pub struct TypingEffect {
    pending: Slot,
}

impl TypingEffect {
    pub fn start(target: Element, typewriter: Typewriter) -> Self {
        target.set_text_content(Some(typewriter.shown()));
        let pending: Slot = Rc::new(RefCell::new(None));
        schedule(&pending, target, typewriter);
        Self { pending }
    }

    pub fn is_finished(&self) -> bool {
        self.pending.borrow().is_none()
    }
}

fn schedule(pending: &Slot, target: Element, mut typewriter: Typewriter) {
    let delay = u32::try_from(typewriter.delay().as_millis()).unwrap_or(u32::MAX);
    let slot = Rc::clone(pending);
    let timeout = Timeout::new(delay, move || match typewriter.next() {
        Some(prefix) => {
            target.set_text_content(Some(&prefix));
            schedule(&slot, target, typewriter);
        }
        None => {
            slot.borrow_mut().take();
        }
    });
    *pending.borrow_mut() = Some(timeout);
}

impl Drop for TypingEffect {
    fn drop(&mut self) {
        // Dropping a gloo `Timeout` clears it.
        self.pending.borrow_mut().take();
    }
}
