//! Quality tiers and their extractor format selectors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse resolution bucket controlling the upper bound of fetched media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    High,
    Max,
}

/// Unknown quality token, carrying the offending value and the valid options.
#[derive(Debug, thiserror::Error)]
#[error("Invalid format: {value}. Valid options are: low, medium, high, max")]
pub struct InvalidQuality {
    pub value: String,
}

impl Quality {
    /// All tiers, in ascending resolution order.
    pub const ALL: [Quality; 4] = [Quality::Low, Quality::Medium, Quality::High, Quality::Max];

    /// Height ceiling in pixels; `None` means unconstrained.
    pub fn height_ceiling(&self) -> Option<u32> {
        match self {
            Quality::Low => Some(480),
            Quality::Medium => Some(720),
            Quality::High => Some(1080),
            Quality::Max => None,
        }
    }

    /// yt-dlp format selector: best video+audio not exceeding the ceiling,
    /// else best available under it; `max` is unconstrained.
    pub fn format_selector(&self) -> &'static str {
        match self {
            Quality::Low => "bestvideo[height<=480]+bestaudio/best[height<=480]",
            Quality::Medium => "bestvideo[height<=720]+bestaudio/best[height<=720]",
            Quality::High => "bestvideo[height<=1080]+bestaudio/best[height<=1080]",
            Quality::Max => "bestvideo+bestaudio/best",
        }
    }

    /// Bucket a vertical resolution into its tier.
    pub fn bucket_for_height(height: u32) -> Quality {
        match height {
            0..=480 => Quality::Low,
            481..=720 => Quality::Medium,
            721..=1080 => Quality::High,
            _ => Quality::Max,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
            Quality::Max => "max",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = InvalidQuality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Quality::Low),
            "medium" => Ok(Quality::Medium),
            "high" => Ok(Quality::High),
            "max" => Ok(Quality::Max),
            other => Err(InvalidQuality {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_embeds_height_ceiling() {
        assert_eq!(
            Quality::Low.format_selector(),
            "bestvideo[height<=480]+bestaudio/best[height<=480]"
        );
        assert_eq!(Quality::Max.format_selector(), "bestvideo+bestaudio/best");
        assert_eq!(Quality::Max.height_ceiling(), None);
    }

    #[test]
    fn heights_bucket_into_tiers() {
        assert_eq!(Quality::bucket_for_height(144), Quality::Low);
        assert_eq!(Quality::bucket_for_height(480), Quality::Low);
        assert_eq!(Quality::bucket_for_height(481), Quality::Medium);
        assert_eq!(Quality::bucket_for_height(720), Quality::Medium);
        assert_eq!(Quality::bucket_for_height(1080), Quality::High);
        assert_eq!(Quality::bucket_for_height(2160), Quality::Max);
    }

    #[test]
    fn parse_rejects_unknown_token_naming_it() {
        let err = "ultra".parse::<Quality>().unwrap_err();
        assert!(err.to_string().contains("ultra"));
        assert!(err.to_string().contains("low, medium, high, max"));
        assert_eq!("medium".parse::<Quality>().unwrap(), Quality::Medium);
    }

    #[test]
    fn serde_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&Quality::High).unwrap(), "\"high\"");
        let q: Quality = serde_json::from_str("\"max\"").unwrap();
        assert_eq!(q, Quality::Max);
    }
}
