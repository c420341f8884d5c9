pub mod short;

use std::fmt::Display;

use once_cell::sync::Lazy;
use regex::Regex;

pub use self::short::ShortLinkResolver;

/// Supported source platforms, in extraction priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    TikTok,
    Shopee,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::TikTok, Platform::Shopee];

    pub fn name(&self) -> &'static str {
        match self {
            Self::TikTok => "TikTok",
            Self::Shopee => "Shopee",
        }
    }

    fn patterns(&self) -> &'static [Regex] {
        match self {
            Self::TikTok => TIKTOK_RE.as_slice(),
            Self::Shopee => SHOPEE_RE.as_slice(),
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Order matters: the first pattern that matches anywhere in the text wins
static TIKTOK_PATTERNS: &[&str] = &[
    r"https?://(?:www\.)?tiktok\.com/@[\w.-]+/video/\d+",
    r"https?://(?:vm|vt)\.tiktok\.com/[\w]+",
    r"https?://(?:www\.)?tiktok\.com/t/[\w]+",
];

static SHOPEE_PATTERNS: &[&str] = &[
    r"https?://(?:shopee\.com\.br|shopee\.com\.mx|shopee\.cl|shopee\.co|shp\.ee)/[\w./-]+",
    r"https?://(?:video|vod)\.shopee\.com\.br/[\w./-]+",
    r"https?://s\.shopee\.(?:com\.br|com\.mx|cl|co)/[\w./-]+",
];

static TIKTOK_RE: Lazy<Vec<Regex>> = Lazy::new(|| compile(TIKTOK_PATTERNS).unwrap());
static SHOPEE_RE: Lazy<Vec<Regex>> = Lazy::new(|| compile(SHOPEE_PATTERNS).unwrap());

fn compile(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}

/// A recognized link, tagged with exactly one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformLink {
    platform: Platform,
    original_text: Box<str>,
    canonical_url: Box<str>,
}

impl PlatformLink {
    pub fn new(platform: Platform, original_text: &str, canonical_url: &str) -> Self {
        Self {
            platform,
            original_text: original_text.into(),
            canonical_url: canonical_url.into(),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn canonical_url(&self) -> &str {
        &self.canonical_url
    }
}

#[derive(Debug, Clone)]
pub struct LinkExtractor {
    tables: Vec<(Platform, Vec<Regex>)>,
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self {
            tables: Platform::ALL
                .iter()
                .map(|p| (*p, p.patterns().to_vec()))
                .collect(),
        }
    }
}

impl LinkExtractor {
    /// Replace the pattern list used for `platform`
    pub fn with_patterns(
        mut self,
        platform: Platform,
        patterns: &[&str],
    ) -> Result<Self, regex::Error> {
        let compiled = compile(patterns)?;
        if let Some((_, table)) = self.tables.iter_mut().find(|(p, _)| *p == platform) {
            *table = compiled;
        }
        Ok(self)
    }

    /// Find the first supported link in `text`. Platforms are checked in priority order, so a
    /// TikTok link wins over a Shopee link even if it appears later in the text.
    pub fn extract(&self, text: &str) -> Option<PlatformLink> {
        self.tables.iter().find_map(|(platform, patterns)| {
            patterns
                .iter()
                .find_map(|re| re.find(text))
                .map(|m| PlatformLink::new(*platform, text, m.as_str()))
        })
    }
}
