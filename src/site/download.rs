use std::collections::BTreeMap;

use serde::Serialize;

pub const RELEASES_URL: &str = "https://github.com/DearVa/Everywhere/releases";

const WINDOWS_SETUP_URL: &str =
    "https://ghproxy.sylinko.com/download?product=everywhere&os=win-x64&type=setup&version=latest";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Windows,
    MacOs,
    Linux,
}

impl Os {
    pub fn id(&self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::MacOs => "macos",
            Os::Linux => "linux",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Os::Windows => "Windows",
            Os::MacOs => "macOS",
            Os::Linux => "Linux",
        }
    }
}

/// Guesses the visitor's OS from a user-agent string. Checks run in order,
/// so "Windows" wins over anything mentioning "mac" later in the string.
pub fn detect_os(user_agent: &str) -> Option<Os> {
    let ua = user_agent.to_lowercase();
    if ua.contains("win") {
        Some(Os::Windows)
    } else if ua.contains("mac") {
        Some(Os::MacOs)
    } else if ua.contains("linux") || ua.contains("x11") {
        Some(Os::Linux)
    } else {
        None
    }
}

/// Package kinds a download link can point at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Setup,
    Portable,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Setup, Variant::Portable];
}

/// OS → variant → URL, with a catch-all releases page.
#[derive(Clone, Debug, Serialize)]
pub struct DownloadTable {
    links: BTreeMap<Os, BTreeMap<Variant, String>>,
    fallback: String,
}

impl Default for DownloadTable {
    fn default() -> Self {
        Self::new(RELEASES_URL).with_link(Os::Windows, Variant::Setup, WINDOWS_SETUP_URL)
    }
}

impl DownloadTable {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            links: BTreeMap::new(),
            fallback: fallback.into(),
        }
    }

    pub fn with_link(mut self, os: Os, variant: Variant, url: impl Into<String>) -> Self {
        self.links.entry(os).or_default().insert(variant, url.into());
        self
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Link for `variant` on `os`, or the fallback when there is none.
    pub fn link(&self, os: Os, variant: Variant) -> &str {
        self.links
            .get(&os)
            .and_then(|variants| variants.get(&variant))
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    /// Link of the first variant listed for `os` (installer before portable).
    pub fn primary(&self, os: Os) -> &str {
        self.links
            .get(&os)
            .and_then(|variants| variants.values().next())
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }
}
