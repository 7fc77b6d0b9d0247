//! Fills the static HTML pages from the site model. Each page opts in with a
//! data attribute, so missing elements are simply skipped.

use std::cell::RefCell;

use tracing::{debug, error, info};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, Window};

use crate::config::FluidConfig;
use crate::site::nav::base_options;
use crate::site::{
    download_button, locale_from_path, other_versions, DownloadButton, DownloadTable, Locale, VersionLink,
};
use crate::web::background::FluidBackground;
use crate::web::describe;

thread_local! {
    static BACKGROUNDS: RefCell<Vec<FluidBackground>> = const { RefCell::new(Vec::new()) };
}

/// Starts a background on every `canvas[data-fluid]`, configured from its
/// `data-colors` and `data-dpi` attributes.
pub fn mount_backgrounds(document: &Document) -> Result<usize, JsValue> {
    let canvases = document.query_selector_all("canvas[data-fluid]")?;
    let mut mounted = 0;
    for i in 0..canvases.length() {
        let Some(canvas) = canvases
            .item(i)
            .and_then(|n| n.dyn_into::<HtmlCanvasElement>().ok())
        else {
            continue;
        };
        let config = FluidConfig::from_attributes(
            canvas.get_attribute("data-colors").as_deref(),
            canvas.get_attribute("data-dpi").as_deref(),
        );
        let background = FluidBackground::create(canvas, config)?;
        BACKGROUNDS.with(|all| all.borrow_mut().push(background));
        mounted += 1;
    }
    debug!(mounted, "backgrounds mounted");
    Ok(mounted)
}

/// Header inside `nav[data-site-nav]`: logo, title link, community links and
/// the language switcher for the page at `path`.
pub fn fill_nav(document: &Document, locale: Locale, path: &str) -> Result<(), JsValue> {
    let Some(nav) = document.query_selector("nav[data-site-nav]")? else {
        return Ok(());
    };
    let options = base_options(locale);

    if let Some(logo) = nav.query_selector("[data-nav-logo]")? {
        logo.set_attribute("src", options.logo.src)?;
        logo.set_attribute("alt", options.logo.alt)?;
        logo.set_attribute("width", &options.logo.width.to_string())?;
        logo.set_attribute("height", &options.logo.height.to_string())?;
    }
    if let Some(home) = nav.query_selector("[data-nav-home]")? {
        home.set_attribute("href", &options.url)?;
        home.set_text_content(Some(options.title));
    }

    if let Some(list) = nav.query_selector("[data-nav-links]")? {
        list.set_text_content(None);
        for item in options.links {
            let link = document.create_element("a")?;
            link.set_attribute("href", item.url)?;
            link.set_attribute("aria-label", item.label)?;
            link.set_attribute("data-icon", item.icon)?;
            if item.external {
                link.set_attribute("target", "_blank")?;
                link.set_attribute("rel", "noopener noreferrer")?;
            }
            link.set_text_content(Some(item.text));
            list.append_child(&link)?;
        }
    }

    if let Some(switcher) = nav.query_selector("[data-nav-locales]")? {
        switcher.set_text_content(None);
        for entry in options.locale_links(path) {
            let link = document.create_element("a")?;
            link.set_attribute("href", &entry.href)?;
            link.set_attribute("hreflang", entry.locale.as_str())?;
            link.set_attribute("lang", entry.locale.as_str())?;
            if entry.current {
                link.set_attribute("aria-current", "true")?;
            }
            link.set_text_content(Some(entry.label));
            switcher.append_child(&link)?;
        }
    }
    Ok(())
}

/// Download page: shows the loading text, then (after the current task, like
/// a mount effect) swaps in the button for the detected OS. Unrecognised
/// platforms keep the loading text.
pub fn wire_download(window: &Window, document: &Document, locale: Locale) -> Result<(), JsValue> {
    let Some(slot) = document.query_selector("[data-download-auto-detect]")? else {
        return Ok(());
    };
    let text = locale.download();
    slot.set_text_content(Some(text.loading));

    let user_agent = window.navigator().user_agent()?;
    let document = document.clone();
    let detect = Closure::once_into_js(move || {
        let table = DownloadTable::default();
        let Some(button) = download_button(&user_agent, locale, &table) else {
            info!("unrecognised platform, leaving download page in loading state");
            return;
        };
        let versions = other_versions(button.os, locale, &table);
        if let Err(e) = render_download(&document, &slot, &button, text.other_versions, &versions) {
            error!("download button: {}", describe(&e));
        }
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(detect.unchecked_ref(), 0)?;
    Ok(())
}

fn external_link(document: &Document, href: &str, text: &str) -> Result<Element, JsValue> {
    let link = document.create_element("a")?;
    link.set_attribute("href", href)?;
    link.set_attribute("target", "_blank")?;
    link.set_attribute("rel", "noopener noreferrer")?;
    link.set_text_content(Some(text));
    Ok(link)
}

fn render_download(
    document: &Document,
    slot: &Element,
    button: &DownloadButton,
    heading: &str,
    versions: &[VersionLink],
) -> Result<(), JsValue> {
    slot.set_text_content(None);

    let primary = external_link(document, &button.href, &button.label)?;
    primary.set_attribute("data-os", button.os.id())?;
    primary.set_attribute("class", "download-primary")?;
    slot.append_child(&primary)?;

    let others = document.create_element("details")?;
    others.set_attribute("class", "download-others")?;
    let summary = document.create_element("summary")?;
    summary.set_text_content(Some(heading));
    others.append_child(&summary)?;
    let list = document.create_element("ul")?;
    for version in versions {
        let item = document.create_element("li")?;
        item.append_child(&external_link(document, &version.href, version.label)?)?;
        list.append_child(&item)?;
    }
    others.append_child(&list)?;
    slot.append_child(&others)?;
    Ok(())
}

/// 404 page text in the locale named by the path, linking back home.
pub fn fill_not_found(document: &Document, path: &str) -> Result<(), JsValue> {
    let Some(page) = document.query_selector("[data-not-found]")? else {
        return Ok(());
    };
    let locale = locale_from_path(path);
    let text = locale.not_found();

    for (selector, value) in [
        ("[data-not-found-title]", text.title),
        ("[data-not-found-description]", text.description),
    ] {
        if let Some(el) = page.query_selector(selector)? {
            el.set_text_content(Some(value));
        }
    }
    if let Some(action) = page.query_selector("[data-not-found-action]")? {
        action.set_attribute("href", &format!("{}/", locale.path()))?;
        action.set_text_content(Some(text.action));
    }
    if let Some(root) = document.document_element() {
        root.set_attribute("lang", locale.as_str())?;
    }
    Ok(())
}
