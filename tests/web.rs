#![cfg(target_arch = "wasm32")]

use everywhere_site::{render_poster, FluidBackground};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas() -> web_sys::HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    canvas.set_attribute("style", "width: 320px; height: 200px").unwrap();
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn background_runs_until_disposed() {
    let canvas = canvas();
    let mut bg = FluidBackground::new(canvas.clone(), Some(r##"{"colors":["#ff0000","#0000ff"],"dpi":1}"##.into())).unwrap();

    // headless runners without WebGL2 leave the background inert
    if bg.is_running() {
        assert_eq!(canvas.width(), 320);
        assert_eq!(canvas.height(), 200);
    }

    bg.dispose();
    assert!(!bg.is_running());
    bg.dispose();
}

#[wasm_bindgen_test]
fn set_options_rejects_bad_json() {
    let bg = FluidBackground::new(canvas(), None).unwrap();
    assert!(bg.set_options("{ not json").is_err());
    assert!(bg.set_options(r##"{"colors":["#00ff00"]}"##).is_ok());
}

#[wasm_bindgen_test]
fn poster_has_one_rgba_quad_per_pixel() {
    let pixels = render_poster(8, 4, 0.0, None).unwrap();
    assert_eq!(pixels.len(), 8 * 4 * 4);
}

#[wasm_bindgen_test]
fn oversized_poster_throws() {
    assert!(render_poster(u32::MAX, u32::MAX, 0.0, None).is_err());
}
