//! Locale routing: every page lives under `/{locale}/…`; bare paths are
//! redirected to the visitor's preferred locale.

use tracing::debug;

use crate::site::i18n::Locale;

const EXCLUDED_PREFIXES: [&str; 5] = ["api", "_next/static", "_next/image", "favicon.ico", "pkg"];

const EXCLUDED_EXTENSIONS: [&str; 17] = [
    "svg", "png", "jpg", "jpeg", "gif", "webp", "ico", "txt", "xml", "json", "woff", "woff2", "ttf",
    "eot", "js", "wasm", "css",
];

#[derive(Clone, Debug)]
pub struct RoutingConfig {
    pub locales: Vec<Locale>,
    pub default_locale: Locale,
    /// Paths (without the leading `/`) starting with any of these bypass routing.
    pub excluded_prefixes: Vec<String>,
    /// Paths containing `.{ext}` for any of these bypass routing.
    pub excluded_extensions: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            locales: Locale::ALL.to_vec(),
            default_locale: Locale::default(),
            excluded_prefixes: EXCLUDED_PREFIXES.iter().map(|s| s.to_string()).collect(),
            excluded_extensions: EXCLUDED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    /// Not a page route (assets, API); serve as is.
    Skip,
    /// Already locale-prefixed; `rest` is the path below the prefix.
    Pass { locale: Locale, rest: String },
    /// Send the client to this location.
    Redirect(String),
}

impl RoutingConfig {
    pub fn is_excluded(&self, path: &str) -> bool {
        let path = path.strip_prefix('/').unwrap_or(path);
        self.excluded_prefixes.iter().any(|p| path.starts_with(p.as_str()))
            || self
                .excluded_extensions
                .iter()
                .any(|ext| path.contains(&format!(".{ext}")))
    }

    pub fn route(&self, path: &str, query: Option<&str>, accept_language: Option<&str>) -> RouteDecision {
        if self.is_excluded(path) {
            return RouteDecision::Skip;
        }

        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let (first, rest) = match trimmed.find('/') {
            Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
            None => (trimmed, "/"),
        };
        if let Some(locale) = self.locales.iter().copied().find(|l| l.as_str() == first) {
            return RouteDecision::Pass {
                locale,
                rest: rest.to_string(),
            };
        }

        let locale = self.negotiate(accept_language);
        let below = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        let mut location = format!("{}{below}", locale.path());
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            location.push('?');
            location.push_str(query);
        }
        debug!(path, %locale, %location, "redirecting to locale");
        RouteDecision::Redirect(location)
    }

    /// Best configured locale for an `Accept-Language` header: highest q
    /// first, exact tag before primary-subtag match, default otherwise.
    pub fn negotiate(&self, accept_language: Option<&str>) -> Locale {
        let Some(header) = accept_language else {
            return self.default_locale;
        };

        for tag in preferred_tags(header) {
            if let Some(l) = self.locales.iter().find(|l| l.as_str().eq_ignore_ascii_case(tag)) {
                return *l;
            }
            let primary = tag.split('-').next().unwrap_or(tag);
            if let Some(l) = self.locales.iter().find(|l| {
                l.as_str()
                    .split('-')
                    .next()
                    .is_some_and(|p| p.eq_ignore_ascii_case(primary))
            }) {
                return *l;
            }
        }
        self.default_locale
    }
}

/// Language tags of an `Accept-Language` header ordered by quality.
/// Wildcards and zero-quality entries are dropped.
fn preferred_tags(header: &str) -> Vec<&str> {
    let mut tags: Vec<(&str, f32)> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';').map(str::trim);
            let tag = parts.next().filter(|t| !t.is_empty() && *t != "*")?;
            let q = parts
                .find_map(|p| p.strip_prefix("q="))
                .map(|q| q.parse::<f32>().unwrap_or(0.0))
                .unwrap_or(1.0);
            (q > 0.0).then_some((tag, q))
        })
        .collect();
    tags.sort_by(|a, b| b.1.total_cmp(&a.1));
    tags.into_iter().map(|(tag, _)| tag).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assets_and_api_bypass_routing() {
        let config = RoutingConfig::default();
        for path in [
            "/api/health",
            "/_next/static/chunk.js",
            "/_next/image",
            "/favicon.ico",
            "/pkg/everywhere_site_bg.wasm",
            "/images/hero.webp",
            "/fonts/inter.woff2",
            "/robots.txt",
        ] {
            assert_eq!(config.route(path, None, None), RouteDecision::Skip, "{path}");
        }
    }

    #[test]
    fn locale_prefixed_paths_pass_through() {
        let config = RoutingConfig::default();
        assert_eq!(
            config.route("/zh-CN/download/", None, Some("en-US")),
            RouteDecision::Pass {
                locale: Locale::ZhCn,
                rest: "/download/".into()
            }
        );
        assert_eq!(
            config.route("/en-US", None, None),
            RouteDecision::Pass {
                locale: Locale::EnUs,
                rest: "/".into()
            }
        );
    }

    #[test]
    fn bare_paths_redirect_with_query() {
        let config = RoutingConfig::default();
        assert_eq!(
            config.route("/download", Some("ref=nav"), None),
            RouteDecision::Redirect("/en-US/download?ref=nav".into())
        );
        assert_eq!(
            config.route("/", None, Some("zh-CN,zh;q=0.9,en;q=0.8")),
            RouteDecision::Redirect("/zh-CN/".into())
        );
    }

    #[test]
    fn negotiation_respects_quality() {
        let config = RoutingConfig::default();
        assert_eq!(config.negotiate(Some("en;q=0.5, zh-CN;q=0.9")), Locale::ZhCn);
        assert_eq!(config.negotiate(Some("zh-TW")), Locale::ZhCn);
        assert_eq!(config.negotiate(Some("en-GB,zh-CN;q=0.8")), Locale::EnUs);
        assert_eq!(config.negotiate(Some("fr-FR, de;q=0.7")), Locale::EnUs);
        assert_eq!(config.negotiate(Some("zh-CN;q=0, *")), Locale::EnUs);
        assert_eq!(config.negotiate(None), Locale::EnUs);
    }

    #[test]
    fn default_locale_is_configurable() {
        let config = RoutingConfig {
            default_locale: Locale::ZhCn,
            ..Default::default()
        };
        assert_eq!(config.negotiate(Some("ja")), Locale::ZhCn);
        assert_eq!(config.route("/", None, None), RouteDecision::Redirect("/zh-CN/".into()));
    }

    #[test]
    fn api_prefix_matches_like_the_matcher() {
        let config = RoutingConfig::default();
        assert!(config.is_excluded("/apiary"));
        assert!(!config.is_excluded("/docs/api-guide"));
    }
}
