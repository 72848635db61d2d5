use std::cell::RefCell;
use std::rc::Rc;

use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement,
};

use super::dom::{self, Listener};
use crate::contact::{ContactErrors, ContactForm, Delivery, EmailSettings, Field, ValidContact};
use crate::error::{SiteError, SiteResult};

const TOAST_MS: u32 = 5_000;
const VISIBLE_CLASS: &str = "toast-visible";
const ERROR_CLASS: &str = "toast-error";

/// POST the submission to EmailJS. No retries; the toast tells the visitor.
pub async fn deliver(settings: &EmailSettings, contact: &ValidContact) -> SiteResult<()> {
    if !settings.is_configured() {
        return Err(SiteError::delivery("email service is not configured"));
    }
    let request = contact.email_request(settings);
    let resp = Request::post(&settings.endpoint)
        .json(&request)
        .map_err(|e| SiteError::delivery(e.to_string()))?
        .send()
        .await
        .map_err(|e| SiteError::delivery(e.to_string()))?;

    if !resp.ok() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let body = body.trim();
        let msg = if body.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {body}")
        };
        return Err(SiteError::delivery(msg));
    }
    Ok(())
}

fn field_value(form: &HtmlFormElement, name: &str) -> String {
    let Ok(Some(el)) = form.query_selector(&format!("[name=\"{name}\"]")) else {
        return String::new();
    };
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    el.dyn_ref::<HtmlTextAreaElement>()
        .map(HtmlTextAreaElement::value)
        .unwrap_or_default()
}

fn optional_value(form: &HtmlFormElement, name: &str) -> Option<String> {
    Some(field_value(form, name)).filter(|v| !v.trim().is_empty())
}

fn read_form(form: &HtmlFormElement) -> ContactForm {
    ContactForm {
        name: field_value(form, "name"),
        email: field_value(form, "email"),
        message: field_value(form, "message"),
        subject: optional_value(form, "subject"),
        phone: optional_value(form, "phone"),
    }
}

fn show_errors(form: &HtmlFormElement, errors: Option<&ContactErrors>) {
    for field in [Field::Name, Field::Email, Field::Message] {
        let selector = format!("[data-error-for=\"{}\"]", field.control_name());
        if let Ok(Some(slot)) = form.query_selector(&selector) {
            let message = errors
                .and_then(|e| e.for_field(field))
                .map(ToString::to_string);
            slot.set_text_content(message.as_deref());
        }
    }
}

fn set_busy(button: Option<&HtmlButtonElement>, busy: bool) {
    if let Some(button) = button {
        button.set_disabled(busy);
        button.set_text_content(Some(if busy { "Sending..." } else { "Send Message" }));
    }
}

/// The `#toast` popup. Showing a new toast restarts the hide timer.
#[derive(Clone)]
pub struct Toaster {
    element: Element,
    hide_after_ms: u32,
    pending: Rc<RefCell<Option<Timeout>>>,
}

impl Toaster {
    pub fn new(element: Element, hide_after_ms: u32) -> Self {
        Self {
            element,
            hide_after_ms,
            pending: Rc::new(RefCell::new(None)),
        }
    }

    fn find(document: &Document) -> Option<Self> {
        document
            .get_element_by_id("toast")
            .map(|el| Self::new(el, TOAST_MS))
    }

    pub fn show(&self, outcome: Delivery) {
        let content = outcome.toast();
        if let Ok(Some(title)) = self.element.query_selector("[data-toast-title]") {
            title.set_text_content(Some(content.title));
        }
        if let Ok(Some(body)) = self.element.query_selector("[data-toast-description]") {
            body.set_text_content(Some(content.description));
        }
        let classes = self.element.class_list();
        let _ = classes.toggle_with_force(ERROR_CLASS, content.destructive);
        let _ = classes.add_1(VISIBLE_CLASS);

        let element = self.element.clone();
        let slot = Rc::clone(&self.pending);
        let hide = Timeout::new(self.hide_after_ms, move || {
            let _ = element.class_list().remove_1(VISIBLE_CLASS);
            slot.borrow_mut().take();
        });
        // Replacing the previous timer clears it.
        *self.pending.borrow_mut() = Some(hide);
    }

    pub fn is_visible(&self) -> bool {
        self.element.class_list().contains(VISIBLE_CLASS)
    }
}

/// Submit handler for `#contact-form`.
pub struct ContactBinding {
    _submit: Listener,
}

impl ContactBinding {
    pub fn attach(document: &Document, settings: EmailSettings) -> SiteResult<Option<Self>> {
        let Some(form) = document
            .get_element_by_id("contact-form")
            .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
        else {
            return Ok(None);
        };
        if !settings.is_configured() {
            log::warn!("EmailJS settings missing; contact submissions will fail");
        }

        let toaster = Toaster::find(document);
        let target = form.clone();
        let submit = Listener::new(&form, "submit", move |event| {
            event.prevent_default();
            let form = target.clone();
            let contact = match read_form(&form).validate() {
                Ok(contact) => {
                    show_errors(&form, None);
                    contact
                }
                Err(errors) => {
                    show_errors(&form, Some(&errors));
                    log::debug!("contact form rejected: {}", SiteError::from(errors));
                    return;
                }
            };

            let button = dom::select_all(&form, "button[type=\"submit\"]")
                .ok()
                .and_then(|buttons| buttons.into_iter().next())
                .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
            let settings = settings.clone();
            let toaster = toaster.clone();
            spawn_local(async move {
                set_busy(button.as_ref(), true);
                log::debug!("contact submission:\n{}", contact.notification_body());
                let outcome = match deliver(&settings, &contact).await {
                    Ok(()) => {
                        log::info!("contact message sent");
                        form.reset();
                        Delivery::Sent
                    }
                    Err(err) => {
                        log::error!("failed to send contact message: {err}");
                        Delivery::Failed
                    }
                };
                if let Some(toaster) = &toaster {
                    toaster.show(outcome);
                }
                set_busy(button.as_ref(), false);
            });
        })?;

        Ok(Some(Self { _submit: submit }))
    }
}
