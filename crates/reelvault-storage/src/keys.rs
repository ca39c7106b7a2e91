//! Artifact key scheme shared by all storage backends.
//!
//! Pure functions from a content identity to storage keys. Quality
//! participates in the key only for the media kind, so the same content at
//! different quality tiers never aliases.

use reelvault_core::Quality;

/// Kind of artifact stored for one piece of media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Media,
    Info,
    Subtitle,
}

impl ArtifactKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Media => "mp4",
            ArtifactKind::Info => "json",
            ArtifactKind::Subtitle => "vtt",
        }
    }
}

/// Storage key for an artifact: `{provider}/{id}-{quality}.mp4` for media
/// with a quality tier, `{provider}/{id}.{ext}` otherwise.
pub fn object_key(provider: &str, id: &str, kind: ArtifactKind, quality: Option<Quality>) -> String {
    match (kind, quality) {
        (ArtifactKind::Media, Some(quality)) => {
            format!("{}/{}-{}.{}", provider, id, quality, kind.extension())
        }
        _ => format!("{}/{}.{}", provider, id, kind.extension()),
    }
}

/// Join a configured base URL and a key into a public URL.
pub fn join_public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}
