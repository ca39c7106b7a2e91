//! Content identity resolution.
//!
//! Classifies a media URL into a `(provider, id)` pair. Providers are
//! matched by domain substring against an ordered table; ids are extracted
//! with the provider's ordered regex patterns. URLs that match no provider
//! resolve to the generic provider with a freshly generated opaque id.

use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

/// Provider name used when no table entry matches the URL.
pub const GENERIC_PROVIDER: &str = "generic";

/// The `(provider, id)` pair all storage keys for one piece of media derive from.
///
/// Ids for recognized providers are re-derivable from the URL, so repeated
/// requests converge on the same storage keys. A `generic` identity gets a
/// fresh UUID every call: idempotency does not apply to unrecognized
/// providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentIdentity {
    pub provider: String,
    pub id: String,
}

struct ProviderRules {
    name: &'static str,
    domains: &'static [&'static str],
    patterns: Vec<Regex>,
}

// Table order is significant: earlier entries win when domains are ambiguous.
static PROVIDER_TABLE: LazyLock<Vec<ProviderRules>> = LazyLock::new(|| {
    vec![
        ProviderRules {
            name: "youtube",
            domains: &["youtube.com", "youtu.be", "m.youtube.com", "www.youtube.com"],
            patterns: compile(&[
                r"(?:v=|/v/|/embed/|youtu\.be/)([a-zA-Z0-9_-]{11})",
                r"(?:watch\?|&)v=([a-zA-Z0-9_-]{11})",
                r"(?:shorts/)([a-zA-Z0-9_-]{11})",
            ]),
        },
        ProviderRules {
            name: "tiktok",
            domains: &[
                "tiktok.com",
                "vm.tiktok.com",
                "vt.tiktok.com",
                "www.tiktok.com",
                "m.tiktok.com",
            ],
            patterns: compile(&[
                r"/video/(\d+)",
                r"vm\.tiktok\.com/(\w+)",
                r"vt\.tiktok\.com/(\w+)",
            ]),
        },
    ]
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("provider pattern must compile"))
        .collect()
}

/// Resolve a URL to its content identity. Never fails; unrecognized or
/// malformed URLs resolve to the generic provider with a random id.
pub fn resolve(url: &str) -> ContentIdentity {
    for rules in PROVIDER_TABLE.iter() {
        if rules.domains.iter().any(|domain| url.contains(domain)) {
            let id = rules
                .patterns
                .iter()
                .find_map(|pattern| {
                    pattern
                        .captures(url)
                        .and_then(|caps| caps.get(1))
                        .map(|m| m.as_str().to_string())
                })
                .unwrap_or_else(opaque_id);
            return ContentIdentity {
                provider: rules.name.to_string(),
                id,
            };
        }
    }

    ContentIdentity {
        provider: GENERIC_PROVIDER.to_string(),
        id: opaque_id(),
    }
}

fn opaque_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_watch_url_extracts_video_id() {
        let identity = resolve("https://www.youtube.com/watch?v=abc12345678");
        assert_eq!(identity.provider, "youtube");
        assert_eq!(identity.id, "abc12345678");
    }

    #[test]
    fn youtube_short_link_extracts_video_id() {
        let identity = resolve("https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(identity.provider, "youtube");
        assert_eq!(identity.id, "dQw4w9WgXcQ");
    }

    #[test]
    fn youtube_shorts_url_extracts_video_id() {
        let identity = resolve("https://www.youtube.com/shorts/XyZ_1234-ab");
        assert_eq!(identity.provider, "youtube");
        assert_eq!(identity.id, "XyZ_1234-ab");
    }

    #[test]
    fn tiktok_short_code_extracts_id() {
        let identity = resolve("https://vt.tiktok.com/ZPabcdef/");
        assert_eq!(identity.provider, "tiktok");
        assert_eq!(identity.id, "ZPabcdef");
    }

    #[test]
    fn tiktok_video_path_extracts_numeric_id() {
        let identity = resolve("https://www.tiktok.com/@user/video/7301234567890123456");
        assert_eq!(identity.provider, "tiktok");
        assert_eq!(identity.id, "7301234567890123456");
    }

    #[test]
    fn unknown_domain_resolves_generic_with_distinct_ids() {
        let first = resolve("https://example.com/watch?v=xyz");
        let second = resolve("https://example.com/watch?v=xyz");
        assert_eq!(first.provider, GENERIC_PROVIDER);
        assert!(!first.id.is_empty());
        // Generic ids are random, not derived from the URL.
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn empty_url_still_resolves() {
        let identity = resolve("");
        assert_eq!(identity.provider, GENERIC_PROVIDER);
        assert!(!identity.id.is_empty());
    }

    #[test]
    fn recognized_provider_without_pattern_match_gets_random_id() {
        let first = resolve("https://www.youtube.com/feed/trending");
        let second = resolve("https://www.youtube.com/feed/trending");
        assert_eq!(first.provider, "youtube");
        assert_ne!(first.id, second.id);
    }
}
