use crate::contact::ContactErrors;

/// Convenience result type used across the site crate.
pub type SiteResult<T> = Result<T, SiteError>;

/// Errors raised while wiring the page up or delivering the contact form.
///
/// The reveal coordinator and the rain loop never produce these; a missing
/// platform capability simply leaves the effect inactive.
#[derive(thiserror::Error, Debug)]
pub enum SiteError {
    /// A required element id is absent from the document.
    #[error("missing element #{0}")]
    MissingElement(String),

    /// Invalid or malformed site configuration.
    #[error("config error: {0}")]
    Config(String),

    /// An exception thrown by a browser API.
    #[error("javascript error: {0}")]
    Js(String),

    /// The email API rejected or never received the submission.
    #[error("email delivery failed: {0}")]
    Delivery(String),

    #[error(transparent)]
    Validation(#[from] ContactErrors),
}

impl SiteError {
    pub fn missing(id: impl Into<String>) -> Self {
        Self::MissingElement(id.into())
    }

    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for SiteError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<SiteError> for wasm_bindgen::JsValue {
    fn from(err: SiteError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
