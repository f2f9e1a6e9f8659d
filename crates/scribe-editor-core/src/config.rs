use serde::{Deserialize, Serialize};

/// Page and type settings for the text PDF renderer. Units are PDF points.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PdfConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub font_size: f32,
    pub heading_size: f32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        // A4 with 2cm margins.
        Self {
            page_width: 595.0,
            page_height: 842.0,
            margin: 56.7,
            font_size: 11.0,
            heading_size: 20.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScribeConfig {
    /// Undo steps kept by the model engine.
    pub history_depth: usize,
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub pdf: PdfConfig,
}

impl Default for ScribeConfig {
    fn default() -> Self {
        Self {
            history_depth: 100,
            log_filter: "info".into(),
            pdf: PdfConfig::default(),
        }
    }
}
