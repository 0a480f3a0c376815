//! Radio channel plan, access categories and 802.11 generation limits.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 5 GHz channels usable at 20 MHz, followed by the 4.9 GHz band.
const PLAN_20MHZ: &[u8] = &[
    36, 40, 44, 48, 52, 56, 60, 64, 100, 104, 108, 112, 116, 120, 124, 128, 132, 136, 140, 144,
    149, 153, 157, 161, 165, 169, 173, 184, 188, 192, 196, 8, 12, 16,
];
const PLAN_40MHZ: &[u8] = &[38, 46, 54, 62, 102, 110, 118, 126, 134, 142, 151, 159];
const PLAN_80MHZ: &[u8] = &[42, 58, 106, 122, 138, 155];
const PLAN_160MHZ: &[u8] = &[50, 114];

/// Channel widths supported by the plan, in MHz.
pub const SUPPORTED_WIDTHS_MHZ: [u16; 4] = [20, 40, 80, 160];

/// Full channel list for a channel width, or `None` for an unsupported width.
pub fn channel_plan(width_mhz: u16) -> Option<&'static [u8]> {
    match width_mhz {
        20 => Some(PLAN_20MHZ),
        40 => Some(PLAN_40MHZ),
        80 => Some(PLAN_80MHZ),
        160 => Some(PLAN_160MHZ),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// AccessCategory
// ---------------------------------------------------------------------------

/// EDCA access category. Aggregation limits always cover all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessCategory {
    /// Video.
    Vi,
    /// Voice.
    Vo,
    /// Best effort.
    Be,
    /// Background.
    Bk,
}

impl AccessCategory {
    /// Every category, in the order pushed to devices.
    pub const ALL: [AccessCategory; 4] = [Self::Vi, Self::Vo, Self::Be, Self::Bk];
}

impl fmt::Display for AccessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Vi => "VI",
            Self::Vo => "VO",
            Self::Be => "BE",
            Self::Bk => "BK",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// WifiStandard
// ---------------------------------------------------------------------------

/// 802.11 generation of the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WifiStandard {
    /// 802.11n (HT).
    Dot11n,
    /// 802.11ac (VHT).
    #[default]
    Dot11ac,
}

impl WifiStandard {
    /// Largest A-MPDU ceiling this generation accepts, in bytes.
    pub fn max_ampdu_size(self) -> u32 {
        match self {
            Self::Dot11n | Self::Dot11ac => 65_535,
        }
    }
}

impl fmt::Display for WifiStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dot11n => write!(f, "802.11n"),
            Self::Dot11ac => write!(f, "802.11ac"),
        }
    }
}

// ---------------------------------------------------------------------------
// ChannelStrategy
// ---------------------------------------------------------------------------

/// Who decides a station's channel after it leaves an AP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStrategy {
    /// The controller pushes the channel of the nearest AP.
    #[default]
    ControllerAssigned,
    /// The radio scans and picks its own channel.
    RadioScanning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_sizes_per_width() {
        assert_eq!(channel_plan(20).map(<[u8]>::len), Some(34));
        assert_eq!(channel_plan(40).map(<[u8]>::len), Some(12));
        assert_eq!(channel_plan(80).map(<[u8]>::len), Some(6));
        assert_eq!(channel_plan(160), Some(&[50u8, 114][..]));
        assert_eq!(channel_plan(60), None);
    }

    #[test]
    fn plan_starts_in_unii_1() {
        assert_eq!(&channel_plan(20).unwrap()[..4], &[36, 40, 44, 48]);
    }

    #[test]
    fn access_categories_are_complete() {
        let names: Vec<String> = AccessCategory::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, ["VI", "VO", "BE", "BK"]);
    }

    #[test]
    fn standard_limits() {
        assert_eq!(WifiStandard::Dot11n.max_ampdu_size(), 65_535);
        assert_eq!(WifiStandard::Dot11ac.max_ampdu_size(), 65_535);
    }
}
