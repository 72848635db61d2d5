//! Site-wide settings, read from an inline JSON block in `index.html`.

use serde::{Deserialize, Serialize};

use crate::contact::EmailSettings;
use crate::error::{SiteError, SiteResult};
use crate::rain::{AnchorGate, RainSettings};
use crate::reveal::DEFAULT_THRESHOLD;
use crate::typing::{TypedLine, HEADLINE_DELAY, TAGLINE, TAGLINE_DELAY};

/// Id of the `<script type="application/json">` element holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub reveal: RevealSettings,
    pub rain: RainConfig,
    pub typing: TypingSettings,
    pub email: EmailSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealSettings {
    pub threshold: f64,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    /// Id of the section whose visibility gates the effect.
    pub anchor: String,
    /// Id of the full-viewport canvas.
    pub canvas: String,
    #[serde(flatten)]
    pub settings: RainSettings,
    #[serde(flatten)]
    pub gate: AnchorGate,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            anchor: "home".to_owned(),
            canvas: "c".to_owned(),
            settings: RainSettings::default(),
            gate: AnchorGate::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingSettings {
    pub lines: Vec<TypedLine>,
}

impl Default for TypingSettings {
    fn default() -> Self {
        Self {
            lines: vec![
                TypedLine {
                    target: "headline".to_owned(),
                    text: "Shivaraj Subhash Taware".to_owned(),
                    delay_ms: HEADLINE_DELAY.as_millis() as u64,
                },
                TypedLine {
                    target: "tagline".to_owned(),
                    text: TAGLINE.to_owned(),
                    delay_ms: TAGLINE_DELAY.as_millis() as u64,
                },
            ],
        }
    }
}

impl SiteConfig {
    pub fn from_json_str(json: &str) -> SiteResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SiteError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SiteResult<()> {
        let threshold = self.reveal.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SiteError::Config(format!(
                "reveal.threshold must be within [0, 1], got {threshold}"
            )));
        }
        let rain = &self.rain.settings;
        if !(rain.fps > 0.0) {
            return Err(SiteError::Config(format!("rain.fps must be positive, got {}", rain.fps)));
        }
        if !(rain.cell_size > 0.0) {
            return Err(SiteError::Config(format!(
                "rain.cell_size must be positive, got {}",
                rain.cell_size
            )));
        }
        if rain.glyphs.is_empty() {
            return Err(SiteError::Config("rain.glyphs must not be empty".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_yields_defaults() {
        let config = SiteConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.rain.settings.cell_size, 14.0);
        assert_eq!(config.rain.gate.buffer, 100.0);
        assert_eq!(config.typing.lines[1].delay_ms, 100);
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let config = SiteConfig::from_json_str(
            r#"{"rain": {"fps": 24, "buffer": 40}, "email": {"service_id": "svc"}}"#,
        )
        .unwrap();
        assert_eq!(config.rain.settings.fps, 24.0);
        assert_eq!(config.rain.settings.drop_step, 0.5);
        assert_eq!(config.rain.gate.buffer, 40.0);
        assert_eq!(config.rain.anchor, "home");
        assert_eq!(config.email.service_id, "svc");
        assert_eq!(config.email.endpoint, crate::contact::EMAILJS_ENDPOINT);
    }

    #[test]
    fn rejects_out_of_range_values() {
        for json in [
            r#"{"reveal": {"threshold": 1.5}}"#,
            r#"{"rain": {"fps": 0}}"#,
            r#"{"rain": {"cell_size": -2}}"#,
            r#"{"rain": {"glyphs": ""}}"#,
        ] {
            assert!(
                matches!(SiteConfig::from_json_str(json), Err(SiteError::Config(_))),
                "{json}"
            );
        }
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = SiteConfig::from_json_str("{ nope").unwrap_err();
        assert!(err.to_string().starts_with("config error:"));
    }
}
