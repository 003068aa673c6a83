//! Built-in accessibility style sheets and the immutable tables the rewriter
//! reads them from.

use crate::domain::model::{Profile, DEFAULT_GRADIENT};
use crate::utils::error::{PreviewError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

const LOW_VISION_CSS: &str = r#"
html, body {
    font-size: 18px !important;
}
p, li, a, span, input, button, label {
    font-size: 1.05em !important;
    line-height: 1.8 !important;
}
body {
    filter: contrast(1.15);
}
a {
    text-decoration: underline !important;
}
a, button {
    padding-top: 2px !important;
    padding-bottom: 2px !important;
}
*:focus {
    outline: 3px solid #facc15 !important;
    outline-offset: 3px !important;
}
"#;

const DYSLEXIA_CSS: &str = r#"
* {
    font-family: Arial, Verdana, sans-serif !important;
}
p, li {
    letter-spacing: 0.06em !important;
    word-spacing: 0.12em !important;
    line-height: 1.8 !important;
}
p {
    max-width: 60ch !important;
}
body {
    background-color: #f3f4f6 !important;
    color: #111827 !important;
}
"#;

const ADHD_CSS: &str = r#"
* {
    animation: none !important;
    transition: none !important;
}
body {
    background-color: #ffffff !important;
    color: #111827 !important;
}
[class*="banner"],
[class*="promo"],
[class*="carousel"],
[class*="slider"],
[class*="ads"],
[id*="ad"],
iframe {
    display: none !important;
}
main, article, section {
    max-width: 70rem !important;
    margin-inline: auto !important;
}
"#;

const AUTISM_CSS: &str = r#"
* {
    animation: none !important;
    transition: none !important;
}
body {
    filter: saturate(0.75) brightness(1.02);
}
[class*="banner"],
[class*="promo"],
[class*="carousel"],
[class*="slider"] {
    display: none !important;
}
section, article, main, nav {
    margin-bottom: 1.6rem !important;
}
p, li {
    line-height: 1.9 !important;
}
"#;

const MOTOR_CSS: &str = r#"
a, button,
input[type="button"],
input[type="submit"],
input[type="reset"] {
    min-height: 44px !important;
    padding: 10px 18px !important;
    font-size: 1.05em !important;
    display: inline-flex !important;
    align-items: center !important;
    justify-content: center !important;
}
a + a, button + button {
    margin-left: 8px !important;
}
*:focus {
    outline: 3px solid #2563eb !important;
    outline-offset: 3px !important;
}
"#;

const ELDER_CSS: &str = r#"
html, body {
    font-size: 19px !important;
}
body {
    background-color: #fdf6e3 !important;
    color: #111827 !important;
}
p, li {
    line-height: 1.9 !important;
}
h1, h2, h3 {
    font-weight: 700 !important;
    margin-top: 1.2em !important;
}
a {
    text-decoration: underline !important;
}
"#;

const PHOTOSENSITIVE_CSS: &str = r#"
*, *::before, *::after {
    animation: none !important;
    transition: none !important;
}
video[autoplay],
[class*="video-autoplay"],
[data-autoplay="true"] {
    autoplay: false !important;
}
img[src$=".gif"],
[class*="gif"],
[class*="marquee"] {
    animation: none !important;
}
"#;

/// Shared sheet for the body-class style mode; every rule is scoped by a
/// `body.profile-*` selector.
pub const SHARED_PROFILES_CSS: &str = include_str!("../../assets/profiles.css");

const GRADIENTS: [(&str, &str); 4] = [
    (
        "green-blue",
        "linear-gradient(135deg, #16a34a 0%, #0d9488 50%, #2563eb 100%)",
    ),
    (
        "purple-pink",
        "linear-gradient(135deg, #7c3aed 0%, #c026d3 50%, #db2777 100%)",
    ),
    (
        "orange-red",
        "linear-gradient(135deg, #f97316 0%, #ea580c 50%, #dc2626 100%)",
    ),
    (
        "mono-dark",
        "linear-gradient(135deg, #111827 0%, #1f2937 50%, #374151 100%)",
    ),
];

/// Profiles whose pages lose every `<script>` element.
pub const DEFAULT_SCRIPT_FREE_PROFILES: [&str; 2] = ["adhd", "photosensitive"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleMode {
    /// One static sheet per profile, looked up by key.
    #[default]
    PerProfile,
    /// A single shared sheet plus a `profile-*` class on `<body>`.
    SharedClass,
}

impl StyleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleMode::PerProfile => "per_profile",
            StyleMode::SharedClass => "shared_class",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProfileTable {
    sheets: HashMap<String, String>,
}

impl ProfileTable {
    pub fn built_in() -> Self {
        let sheets = [
            (Profile::LowVision, LOW_VISION_CSS),
            (Profile::Dyslexia, DYSLEXIA_CSS),
            (Profile::Adhd, ADHD_CSS),
            (Profile::Autism, AUTISM_CSS),
            (Profile::Motor, MOTOR_CSS),
            (Profile::Elder, ELDER_CSS),
            (Profile::Photosensitive, PHOTOSENSITIVE_CSS),
        ]
        .into_iter()
        .map(|(profile, css)| (profile.key().to_string(), css.to_string()))
        .collect();

        Self { sheets }
    }

    /// Built-in sheets with `overrides` replacing or adding entries.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut table = Self::built_in();
        for (key, css) in overrides {
            table
                .sheets
                .insert(Profile::parse(key).key().to_string(), css.clone());
        }
        table
    }

    /// Sheet for `profile`, or an empty string for unknown keys.
    pub fn css_for(&self, profile: &Profile) -> &str {
        self.sheets
            .get(profile.key())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn contains(&self, profile: &Profile) -> bool {
        self.sheets.contains_key(profile.key())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::built_in()
    }
}

#[derive(Debug, Clone)]
pub struct GradientTable {
    gradients: HashMap<String, String>,
    fallback: String,
}

impl GradientTable {
    pub fn built_in() -> Self {
        let gradients: HashMap<String, String> = GRADIENTS
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        let fallback = gradients
            .get(DEFAULT_GRADIENT)
            .cloned()
            .unwrap_or_default();

        Self {
            gradients,
            fallback,
        }
    }

    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut table = Self::built_in();
        for (key, value) in overrides {
            table.gradients.insert(key.clone(), value.clone());
        }
        if let Some(fallback) = table.gradients.get(DEFAULT_GRADIENT) {
            table.fallback = fallback.clone();
        }
        table
    }

    /// Gradient for `key`, falling back to the green-blue gradient.
    pub fn resolve(&self, key: &str) -> &str {
        self.gradients
            .get(key.trim())
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }
}

impl Default for GradientTable {
    fn default() -> Self {
        Self::built_in()
    }
}

/// Everything the rewriter needs, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct RewriteConfig {
    pub mode: StyleMode,
    pub profiles: ProfileTable,
    pub gradients: GradientTable,
    pub shared_css: String,
    pub script_free_profiles: BTreeSet<String>,
}

impl RewriteConfig {
    pub fn new(mode: StyleMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// 從設定檔的 `[rewrite]` 區段建立
    pub fn from_settings(settings: &crate::config::toml_config::RewriteSettings) -> Result<Self> {
        let shared_css = match &settings.shared_css_path {
            Some(path) => load_shared_css(path)?,
            None => SHARED_PROFILES_CSS.to_string(),
        };

        let script_free_profiles = settings
            .script_free_profiles
            .iter()
            .map(|key| Profile::parse(key).key().to_string())
            .collect();

        Ok(Self {
            mode: settings.style_mode,
            profiles: ProfileTable::with_overrides(&settings.profiles),
            gradients: GradientTable::with_overrides(&settings.gradients),
            shared_css,
            script_free_profiles,
        })
    }

    pub fn strips_scripts(&self, profile: &Profile) -> bool {
        self.script_free_profiles.contains(profile.key())
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            mode: StyleMode::default(),
            profiles: ProfileTable::built_in(),
            gradients: GradientTable::built_in(),
            shared_css: SHARED_PROFILES_CSS.to_string(),
            script_free_profiles: DEFAULT_SCRIPT_FREE_PROFILES
                .iter()
                .map(|key| key.to_string())
                .collect(),
        }
    }
}

fn load_shared_css(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| PreviewError::ConfigError {
        message: format!("Failed to read shared CSS '{}': {}", path.display(), e),
    })
}
