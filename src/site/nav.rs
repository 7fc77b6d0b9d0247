use serde::Serialize;

use crate::site::i18n::{switch_locale, Locale};

pub const SITE_TITLE: &str = "Everywhere";

#[derive(Debug, Serialize)]
pub struct Logo {
    pub src: &'static str,
    pub alt: &'static str,
    pub width: u32,
    pub height: u32,
}

pub static LOGO: Logo = Logo {
    src: "/favicon.ico",
    alt: SITE_TITLE,
    width: 20,
    height: 20,
};

#[derive(Debug, Serialize)]
pub struct LinkItem {
    pub url: &'static str,
    pub label: &'static str,
    pub text: &'static str,
    /// Icon id understood by the page's icon sprite.
    pub icon: &'static str,
    pub external: bool,
}

pub static LINK_ITEMS: [LinkItem; 3] = [
    LinkItem {
        url: "https://github.com/DearVa/Everywhere",
        label: "GitHub",
        text: "GitHub",
        icon: "github",
        external: true,
    },
    LinkItem {
        url: "https://discord.gg/5fyg6nE3yn",
        label: "Discord",
        text: "Discord",
        icon: "discord",
        external: true,
    },
    LinkItem {
        url: "https://qm.qq.com/cgi-bin/qm/qr?k=wp9aDBBnLc7pYATqT99tB-N2ZP2ETmJC&jump_from=webapi&authKey=97qUJfsQoI70dUNcgBZ0C3HCZeiEn8inLT7pzg8x+KinbQwfIrHFu3dB2+aHMbRD",
        label: "QQ",
        text: "QQ",
        icon: "qq",
        external: true,
    },
];

/// Shared header options for every page of a locale.
#[derive(Debug, Serialize)]
pub struct NavOptions {
    pub title: &'static str,
    pub logo: &'static Logo,
    pub url: String,
    pub links: &'static [LinkItem],
    pub locales: Vec<Locale>,
}

/// One entry of the language switcher.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct LocaleLink {
    pub locale: Locale,
    pub label: &'static str,
    pub href: String,
    pub current: bool,
}

impl NavOptions {
    /// Switcher entries pointing at the page at `current_path` in each locale.
    pub fn locale_links(&self, current_path: &str) -> Vec<LocaleLink> {
        self.locales
            .iter()
            .map(|&locale| LocaleLink {
                locale,
                label: locale.display_name(),
                href: switch_locale(current_path, locale),
                current: self.url == locale.path(),
            })
            .collect()
    }
}

pub fn base_options(locale: Locale) -> NavOptions {
    NavOptions {
        title: SITE_TITLE,
        logo: &LOGO,
        url: locale.path(),
        links: &LINK_ITEMS,
        locales: Locale::ALL.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_link_is_locale_prefixed() {
        assert_eq!(base_options(Locale::ZhCn).url, "/zh-CN");
        assert_eq!(base_options(Locale::EnUs).title, "Everywhere");
    }

    #[test]
    fn community_links_are_external() {
        let labels: Vec<_> = LINK_ITEMS.iter().map(|l| l.label).collect();
        assert_eq!(labels, ["GitHub", "Discord", "QQ"]);
        assert!(LINK_ITEMS.iter().all(|l| l.external && l.url.starts_with("https://")));
    }

    #[test]
    fn switcher_marks_current_locale() {
        let links = base_options(Locale::ZhCn).locale_links("/zh-CN/download/");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].href, "/en-US/download/");
        assert_eq!(links[0].label, "English");
        assert!(!links[0].current);
        assert!(links[1].current);
    }

    #[test]
    fn options_serialize_for_the_page() {
        let json = serde_json::to_value(base_options(Locale::EnUs)).unwrap();
        assert_eq!(json["logo"]["src"], "/favicon.ico");
        assert_eq!(json["locales"][1], "zh-CN");
        assert_eq!(json["links"].as_array().map(Vec::len), Some(3));
    }
}
