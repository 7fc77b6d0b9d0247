use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SiteError;
use crate::site::download::{Os, Variant};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-CN")]
    ZhCn,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::EnUs, Locale::ZhCn];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::ZhCn => "zh-CN",
        }
    }

    /// Home page of this locale.
    pub fn path(&self) -> String {
        format!("/{}", self.as_str())
    }

    /// Name of the language in that language, for the locale switcher.
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::EnUs => "English",
            Locale::ZhCn => "简体中文",
        }
    }

    pub fn not_found(&self) -> &'static NotFoundText {
        match self {
            Locale::EnUs => &NOT_FOUND_EN,
            Locale::ZhCn => &NOT_FOUND_ZH,
        }
    }

    pub fn download(&self) -> &'static DownloadText {
        match self {
            Locale::EnUs => &DOWNLOAD_EN,
            Locale::ZhCn => &DOWNLOAD_ZH,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| SiteError::UnknownLocale(s.to_string()))
    }
}

/// Locale named by the first path segment, or the default locale.
pub fn locale_from_path(path: &str) -> Locale {
    path.trim_start_matches('/')
        .split('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .unwrap_or_default()
}

/// `path` moved under `target`, replacing a leading locale segment if any.
pub fn switch_locale(path: &str, target: Locale) -> String {
    let trimmed = path.trim_start_matches('/');
    let rest = match trimmed.split_once('/') {
        Some((first, rest)) if first.parse::<Locale>().is_ok() => rest,
        None if trimmed.parse::<Locale>().is_ok() => "",
        _ => trimmed,
    };
    format!("{}/{rest}", target.path())
}

#[derive(Debug, Serialize)]
pub struct NotFoundText {
    pub title: &'static str,
    pub description: &'static str,
    pub action: &'static str,
}

static NOT_FOUND_EN: NotFoundText = NotFoundText {
    title: "Page Not Found",
    description: "We searched Everywhere, but this place remains untouched.",
    action: "Take me home",
};

static NOT_FOUND_ZH: NotFoundText = NotFoundText {
    title: "页面未找到",
    description: "我们寻遍了 Everywhere，唯独此处是无人踏足的秘境。",
    action: "返回主页",
};

/// Labels for the package kinds offered per OS.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantLabels {
    pub setup: &'static str,
    pub portable: &'static str,
    pub releases: &'static str,
}

impl VariantLabels {
    pub fn label(&self, variant: Variant) -> &'static str {
        match variant {
            Variant::Setup => self.setup,
            Variant::Portable => self.portable,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadText {
    /// Contains an `{os}` placeholder.
    pub download_for: &'static str,
    pub loading: &'static str,
    pub other_versions: &'static str,
    pub variants: VariantLabels,
}

impl DownloadText {
    pub fn download_for(&self, os: Os) -> String {
        self.download_for.replace("{os}", os.display_name())
    }
}

static DOWNLOAD_EN: DownloadText = DownloadText {
    download_for: "Download for {os}",
    loading: "Detecting your system...",
    other_versions: "Other versions",
    variants: VariantLabels {
        setup: "Installer",
        portable: "Portable",
        releases: "All releases",
    },
};

static DOWNLOAD_ZH: DownloadText = DownloadText {
    download_for: "下载 {os} 版",
    loading: "正在检测您的系统...",
    other_versions: "其他版本",
    variants: VariantLabels {
        setup: "安装程序",
        portable: "便携版",
        releases: "全部版本",
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_locales_only() {
        assert_eq!("en-US".parse::<Locale>(), Ok(Locale::EnUs));
        assert_eq!("zh-CN".parse::<Locale>(), Ok(Locale::ZhCn));
        assert_eq!(
            "fr-FR".parse::<Locale>(),
            Err(SiteError::UnknownLocale("fr-FR".into()))
        );
    }

    #[test]
    fn locale_from_first_segment() {
        assert_eq!(locale_from_path("/zh-CN/docs/intro"), Locale::ZhCn);
        assert_eq!(locale_from_path("/en-US/"), Locale::EnUs);
        assert_eq!(locale_from_path("/de/whatever"), Locale::EnUs);
        assert_eq!(locale_from_path(""), Locale::EnUs);
        assert_eq!(locale_from_path("/docs/zh-CN"), Locale::EnUs);
    }

    #[test]
    fn locale_paths() {
        assert_eq!(Locale::ZhCn.path(), "/zh-CN");
        assert_eq!(Locale::EnUs.to_string(), "en-US");
    }

    #[test]
    fn switching_keeps_the_page() {
        assert_eq!(switch_locale("/en-US/download/", Locale::ZhCn), "/zh-CN/download/");
        assert_eq!(switch_locale("/zh-CN", Locale::EnUs), "/en-US/");
        assert_eq!(switch_locale("/", Locale::ZhCn), "/zh-CN/");
        assert_eq!(switch_locale("/download/", Locale::EnUs), "/en-US/download/");
    }

    #[test]
    fn variant_labels_follow_the_locale() {
        let labels = &Locale::ZhCn.download().variants;
        assert_eq!(labels.label(Variant::Setup), "安装程序");
        assert_eq!(Locale::EnUs.download().variants.label(Variant::Portable), "Portable");
    }

    #[test]
    fn not_found_text_is_localized() {
        assert_eq!(Locale::EnUs.not_found().title, "Page Not Found");
        assert_eq!(Locale::ZhCn.not_found().action, "返回主页");
    }

    #[test]
    fn download_label_substitutes_os() {
        assert_eq!(Locale::EnUs.download().download_for(Os::MacOs), "Download for macOS");
        assert_eq!(Locale::ZhCn.download().download_for(Os::Linux), "下载 Linux 版");
    }

    #[test]
    fn dictionaries_serialize_with_page_keys() {
        let json = serde_json::to_value(Locale::EnUs.download()).unwrap();
        assert_eq!(json["downloadFor"], "Download for {os}");
        assert_eq!(json["otherVersions"], "Other versions");
        assert_eq!(json["variants"]["portable"], "Portable");
    }
}
