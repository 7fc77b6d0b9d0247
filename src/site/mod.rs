//! Page-level pieces of the site: locales and their strings, the shared
//! header, the download page's OS detection and the locale router.

pub mod download;
pub mod i18n;
pub mod nav;
pub mod routing;

pub use download::{detect_os, DownloadTable, Os, Variant};
pub use i18n::{locale_from_path, DownloadText, Locale};
pub use routing::{RouteDecision, RoutingConfig};

/// What the download button shows once the OS is known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadButton {
    pub os: Os,
    pub label: String,
    pub href: String,
}

/// "Download for {os}" in the dictionary's language.
pub fn button_label(text: &DownloadText, os: Os) -> String {
    text.download_for(os)
}

/// Button for a visitor with `user_agent`, or `None` when the platform is
/// unrecognised and the page keeps showing its loading text.
pub fn download_button(user_agent: &str, locale: Locale, table: &DownloadTable) -> Option<DownloadButton> {
    let os = detect_os(user_agent)?;
    Some(DownloadButton {
        os,
        label: button_label(locale.download(), os),
        href: table.primary(os).to_string(),
    })
}

/// Entry of the "Other versions" list under the download button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionLink {
    pub label: &'static str,
    pub href: String,
}

/// Every package kind for `os` followed by the full releases page. Kinds
/// without a link of their own point at the releases page too.
pub fn other_versions(os: Os, locale: Locale, table: &DownloadTable) -> Vec<VersionLink> {
    let labels = &locale.download().variants;
    Variant::ALL
        .iter()
        .map(|&variant| VersionLink {
            label: labels.label(variant),
            href: table.link(os, variant).to_string(),
        })
        .chain([VersionLink {
            label: labels.releases,
            href: table.fallback().to_string(),
        }])
        .collect()
}
