use tracing::warn;

use crate::error::{RenderError, RenderResult};

/// Capacity of the `u_colors` uniform array.
pub const MAX_COLORS: usize = 10;

/// Straight (non-premultiplied) color with channels in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rrggbb`. Channels that are missing or not hex come out as 0.0;
    /// opacity is always 1.0.
    pub fn from_hex(hex: &str) -> Self {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |offset: usize| -> f32 {
            match digits
                .get(offset..offset + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            {
                Some(value) => f32::from(value) / 255.0,
                None => {
                    warn!(color = hex, offset, "unparseable color channel, using 0");
                    0.0
                }
            }
        };
        Self::new(channel(0), channel(2), channel(4), 1.0)
    }

    /// RGB scaled by opacity.
    pub fn premultiplied(&self) -> [f32; 3] {
        [self.r * self.a, self.g * self.a, self.b * self.a]
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Ordered set of at most [`MAX_COLORS`] colors fed to the fragment stage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Keeps the first [`MAX_COLORS`] entries; the rest are dropped silently.
    pub fn new(colors: impl IntoIterator<Item = Rgba>) -> Self {
        Self {
            colors: colors.into_iter().take(MAX_COLORS).collect(),
        }
    }

    pub fn from_hex_list<S: AsRef<str>>(hex: &[S]) -> RenderResult<Self> {
        if hex.is_empty() {
            return Err(RenderError::EmptyPalette);
        }
        Ok(Self::new(hex.iter().map(|c| Rgba::from_hex(c.as_ref()))))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// RGBA floats laid out for `uniform4fv`.
    pub fn flatten(&self) -> Vec<f32> {
        self.colors.iter().flat_map(|c| c.to_array()).collect()
    }
}
