//! Social-media links resolved from the environment.
//!
//! Each link has a literal default and an environment variable that
//! overrides it when set to a non-empty value. Resolution happens once at
//! start-up; the resulting [`SocialLinks`] is immutable and shared by `Arc`.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A named external link with its override variable and fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkEntry {
    pub name: &'static str,
    pub env_var: &'static str,
    pub default: &'static str,
}

pub const LINKS: [LinkEntry; 8] = [
    LinkEntry {
        name: "github",
        env_var: "SOCIAL_GITHUB_URL",
        default: "https://github.com/Lovest99/",
    },
    LinkEntry {
        name: "linkedin",
        env_var: "SOCIAL_LINKEDIN_URL",
        default: "https://www.linkedin.com/in/lovest99/",
    },
    LinkEntry {
        name: "twitter",
        env_var: "SOCIAL_TWITTER_URL",
        default: "https://twitter.com/Lovest99",
    },
    LinkEntry {
        name: "instagram",
        env_var: "SOCIAL_INSTAGRAM_URL",
        default: "https://www.instagram.com/lovest99/",
    },
    LinkEntry {
        name: "whatsapp",
        env_var: "SOCIAL_WHATSAPP_URL",
        default: "https://wa.me/",
    },
    LinkEntry {
        name: "youtube",
        env_var: "SOCIAL_YOUTUBE_URL",
        default: "https://www.youtube.com/@lovest99",
    },
    LinkEntry {
        name: "threads",
        env_var: "SOCIAL_THREADS_URL",
        default: "https://www.threads.net/@lovest99",
    },
    LinkEntry {
        name: "facebook",
        env_var: "SOCIAL_FACEBOOK_URL",
        default: "https://www.facebook.com/lovest99",
    },
];

/// Resolved links, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLinks {
    resolved: Vec<(&'static str, String)>,
}

impl SocialLinks {
    /// Resolve every link against the process environment.
    pub fn from_env() -> Self {
        Self::resolve_with(|var| std::env::var(var).ok())
    }

    /// Resolve every link using `lookup` for environment variables.
    pub fn resolve_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolved = LINKS
            .iter()
            .map(|entry| {
                let value = match lookup(entry.env_var) {
                    Some(v) if !v.is_empty() => {
                        tracing::debug!(link = entry.name, env = entry.env_var, "Link overridden");
                        v
                    }
                    _ => entry.default.to_string(),
                };
                (entry.name, value)
            })
            .collect();
        Self { resolved }
    }

    /// The resolved URL for `name`, or `None` for unknown names.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.resolved
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, url)| url.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.resolved.iter().map(|(n, url)| (*n, url.as_str()))
    }
}

impl Serialize for SocialLinks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.resolved.len()))?;
        for (name, url) in &self.resolved {
            map.serialize_entry(name, url)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let links = SocialLinks::resolve_with(|_| None);
        assert_eq!(links.resolve("github"), Some("https://github.com/Lovest99/"));
        for entry in LINKS {
            assert_eq!(links.resolve(entry.name), Some(entry.default));
        }
    }

    #[test]
    fn test_override_wins_unless_empty() {
        let env: HashMap<&str, &str> = [
            ("SOCIAL_GITHUB_URL", "https://github.com/someone-else"),
            ("SOCIAL_YOUTUBE_URL", ""),
        ]
        .into_iter()
        .collect();
        let links = SocialLinks::resolve_with(|var| env.get(var).map(|v| v.to_string()));

        assert_eq!(links.resolve("github"), Some("https://github.com/someone-else"));
        assert_eq!(links.resolve("youtube"), Some("https://www.youtube.com/@lovest99"));
    }

    #[test]
    fn test_unknown_name() {
        let links = SocialLinks::resolve_with(|_| None);
        assert_eq!(links.resolve("myspace"), None);
    }

    #[test]
    fn test_names_are_unique_and_ordered() {
        let links = SocialLinks::resolve_with(|_| None);
        let names: Vec<&str> = links.iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "github", "linkedin", "twitter", "instagram", "whatsapp", "youtube", "threads",
                "facebook"
            ]
        );
    }

    #[test]
    fn test_serializes_as_object() {
        let links = SocialLinks::resolve_with(|_| None);
        let value = serde_json::to_value(&links).unwrap();
        assert_eq!(value["whatsapp"], "https://wa.me/");
    }
}
