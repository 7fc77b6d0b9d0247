//! Everywhere site: the animated fluid background and the page glue around
//! it. Everything outside `web` is platform independent and runs under
//! `cargo test` on the host.

pub mod config;
pub mod driver;
pub mod error;
pub mod field;
pub mod gl;
pub mod palette;
pub mod shader;
pub mod site;
pub mod surface;

#[cfg(test)]
mod mock;

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{render_poster, FluidBackground};

pub use config::FluidConfig;
pub use driver::{Drawable, DriverPhase, FrameDriver, FrameHost};
pub use error::{RenderError, RenderResult, SiteError};
pub use gl::{GraphicsContext, ShaderStage};
pub use palette::{Palette, Rgba};
pub use surface::SurfaceSize;
