//! Browser side: the WebGL2 context, animation-frame host, console logging
//! and the page wiring run from the wasm start function.

mod background;
mod gl;
mod host;
mod logging;
mod pages;

use tracing::{debug, error, info};
use wasm_bindgen::prelude::*;

use crate::config::FluidConfig;
use crate::error::RenderError;
use crate::field;
use crate::site::locale_from_path;

pub use background::FluidBackground;

pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

pub(crate) fn to_js(err: RenderError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Still RGBA8 frame of the background, premultiplied, top row first.
/// Feed it to `new ImageData(...)` for a poster image when motion is reduced.
#[wasm_bindgen(js_name = renderPoster)]
pub fn render_poster(width: u32, height: u32, time: f32, options: Option<String>) -> Result<Vec<u8>, JsValue> {
    let config = match options {
        Some(json) => FluidConfig::from_json(&json),
        None => Ok(FluidConfig::default()),
    }
    .map_err(to_js)?;
    let palette = config.palette().map_err(to_js)?;
    field::render_poster(width, height, time, &palette).map_err(to_js)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if !logging::init() {
        debug!("console logging already installed");
    }

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let path = window.location().pathname()?;
    let locale = locale_from_path(&path);
    info!(%locale, %path, "page start");

    // one broken section must not keep the others from rendering
    if let Err(e) = pages::fill_nav(&document, locale, &path) {
        error!("nav: {}", describe(&e));
    }
    if let Err(e) = pages::mount_backgrounds(&document) {
        error!("background: {}", describe(&e));
    }
    if let Err(e) = pages::wire_download(&window, &document, locale) {
        error!("download: {}", describe(&e));
    }
    if let Err(e) = pages::fill_not_found(&document, &path) {
        error!("not found page: {}", describe(&e));
    }
    Ok(())
}
