use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::palette::Palette;

pub const DEFAULT_DPI: f64 = 1.5;

fn default_colors() -> Vec<String> {
    vec!["#ff0000".into(), "#00ff00".into(), "#0000ff".into()]
}

fn default_dpi() -> f64 {
    DEFAULT_DPI
}

/// Options of one fluid background instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidConfig {
    /// Hex colors, `#rrggbb`.
    pub colors: Vec<String>,
    /// Upper bound on the device pixel ratio used for the backing store.
    pub dpi: f64,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            colors: default_colors(),
            dpi: default_dpi(),
        }
    }
}

impl FluidConfig {
    pub fn from_json(json: &str) -> RenderResult<Self> {
        serde_json::from_str(json).map_err(|e| RenderError::options(e.to_string()))
    }

    /// Builds a config from the `data-colors` (comma separated) and `data-dpi`
    /// attributes of a canvas. Missing or unparseable values keep their defaults.
    pub fn from_attributes(colors: Option<&str>, dpi: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(colors) = colors {
            let parsed: Vec<String> = colors
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect();
            if !parsed.is_empty() {
                config.colors = parsed;
            }
        }
        if let Some(dpi) = dpi.and_then(|d| d.trim().parse::<f64>().ok()) {
            config.dpi = dpi;
        }
        config
    }

    pub fn palette(&self) -> RenderResult<Palette> {
        Palette::from_hex_list(&self.colors)
    }

    /// The dpi cap; non-finite or non-positive values mean the default.
    pub fn dpi_cap(&self) -> f64 {
        if self.dpi.is_finite() && self.dpi > 0.0 {
            self.dpi
        } else {
            DEFAULT_DPI
        }
    }
}
