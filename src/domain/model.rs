use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

pub const DEFAULT_FONT_SIZE: &str = "18px";
pub const DEFAULT_FONT_FAMILY: &str = "system-ui";
pub const DEFAULT_GRADIENT: &str = "green-blue";

/// Class prefix used when a profile is expressed as a body class.
pub const PROFILE_CLASS_PREFIX: &str = "profile-";

/// An accessibility adaptation selected by the user.
///
/// Keys that do not match a known profile are kept as [`Profile::Other`] so they
/// can still be looked up in a configured table or used as a body class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Profile {
    LowVision,
    Dyslexia,
    Adhd,
    Autism,
    Motor,
    Elder,
    Photosensitive,
    Custom,
    Other(String),
}

impl Profile {
    pub const BUILT_IN: [Profile; 8] = [
        Profile::LowVision,
        Profile::Dyslexia,
        Profile::Adhd,
        Profile::Autism,
        Profile::Motor,
        Profile::Elder,
        Profile::Photosensitive,
        Profile::Custom,
    ];

    /// Parses a profile key. Case and `-`/`_` are ignored, and the
    /// `profile-` class spelling is accepted.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        let key = normalized.strip_prefix("profile_").unwrap_or(&normalized);

        match key {
            "low_vision" => Profile::LowVision,
            "dyslexia" | "dyslexic" => Profile::Dyslexia,
            "adhd" => Profile::Adhd,
            "autism" => Profile::Autism,
            "motor" => Profile::Motor,
            "elder" => Profile::Elder,
            "photosensitive" => Profile::Photosensitive,
            "custom" => Profile::Custom,
            // 保持成單一 class token
            _ => Profile::Other(
                raw.to_ascii_lowercase()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join("_"),
            ),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Profile::LowVision => "low_vision",
            Profile::Dyslexia => "dyslexia",
            Profile::Adhd => "adhd",
            Profile::Autism => "autism",
            Profile::Motor => "motor",
            Profile::Elder => "elder",
            Profile::Photosensitive => "photosensitive",
            Profile::Custom => "custom",
            Profile::Other(key) => key,
        }
    }

    /// Body class for the shared-sheet style mode, `None` for an empty key.
    pub fn class_name(&self) -> Option<String> {
        let key = self.key();
        if key.is_empty() {
            None
        } else if key.starts_with(PROFILE_CLASS_PREFIX) {
            Some(key.to_string())
        } else {
            Some(format!("{}{}", PROFILE_CLASS_PREFIX, key))
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Profile::Custom)
    }
}

impl Default for Profile {
    fn default() -> Self {
        Profile::Other(String::new())
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomStyleParams {
    pub font_size: String,
    pub font_family: String,
    pub gradient: String,
}

impl CustomStyleParams {
    /// Builds parameters from optional form fields; blank values fall back to defaults.
    pub fn from_fields(
        font_size: Option<&str>,
        font_family: Option<&str>,
        gradient: Option<&str>,
    ) -> Self {
        fn pick(value: Option<&str>, default: &str) -> String {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        }

        Self {
            font_size: pick(font_size, DEFAULT_FONT_SIZE),
            font_family: pick(font_family, DEFAULT_FONT_FAMILY),
            gradient: pick(gradient, DEFAULT_GRADIENT),
        }
    }
}

impl Default for CustomStyleParams {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            gradient: DEFAULT_GRADIENT.to_string(),
        }
    }
}

/// A page as returned by the target site.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    /// Effective URL after redirects; relative resources resolve against it.
    pub final_url: Url,
    pub status: u16,
}

#[derive(Debug, Clone)]
pub struct RewrittenDocument {
    pub html: String,
    pub profile: Profile,
}

#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub url: Url,
    pub profile: Profile,
    pub custom: CustomStyleParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_parse_variants() {
        assert_eq!(Profile::parse("dyslexia"), Profile::Dyslexia);
        assert_eq!(Profile::parse("profile-dyslexic"), Profile::Dyslexia);
        assert_eq!(Profile::parse("Low-Vision"), Profile::LowVision);
        assert_eq!(Profile::parse(" ADHD "), Profile::Adhd);
        assert_eq!(
            Profile::parse("high_contrast"),
            Profile::Other("high_contrast".to_string())
        );
    }

    #[test]
    fn test_profile_keys_round_trip_for_built_ins() {
        for profile in Profile::BUILT_IN.iter() {
            assert_eq!(&Profile::parse(profile.key()), profile);
        }
    }

    #[test]
    fn test_class_name() {
        assert_eq!(Profile::Motor.class_name().as_deref(), Some("profile-motor"));
        assert_eq!(
            Profile::Other("profile-zen".to_string()).class_name().as_deref(),
            Some("profile-zen")
        );
        assert_eq!(Profile::default().class_name(), None);
    }

    #[test]
    fn test_unknown_key_with_whitespace_is_a_single_class() {
        let profile = Profile::parse("  High   Contrast ");
        assert_eq!(profile, Profile::Other("high_contrast".to_string()));
        assert_eq!(profile.class_name().as_deref(), Some("profile-high_contrast"));
    }

    #[test]
    fn test_custom_params_blank_fields_use_defaults() {
        let params = CustomStyleParams::from_fields(Some(""), Some("Georgia, serif"), None);
        assert_eq!(params.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(params.font_family, "Georgia, serif");
        assert_eq!(params.gradient, DEFAULT_GRADIENT);
    }
}
