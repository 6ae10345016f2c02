//! Personal share of a shared expense
//!
//! An expense can be split with another person. The caller's portion is one
//! of a small closed set of percentages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The caller's share of an expense, in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Share {
    /// 100% - paid alone
    #[default]
    Full,
    /// 50% - split between two
    Half,
    /// 33% - split between three
    Third,
    /// 25% - split between four
    Quarter,
}

impl Share {
    /// All shares, largest first
    pub const ALL: [Share; 4] = [Share::Full, Share::Half, Share::Third, Share::Quarter];

    /// The share as an integer percentage
    pub const fn percent(&self) -> u8 {
        match self {
            Share::Full => 100,
            Share::Half => 50,
            Share::Third => 33,
            Share::Quarter => 25,
        }
    }

    /// Look up the share for an integer percentage
    pub fn from_percent(percent: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.percent() == percent)
    }

    /// Whether the expense is shared with someone
    pub fn is_partial(&self) -> bool {
        *self != Share::Full
    }
}

impl TryFrom<u8> for Share {
    type Error = InvalidShare;

    fn try_from(percent: u8) -> Result<Self, Self::Error> {
        Self::from_percent(percent).ok_or(InvalidShare(percent))
    }
}

impl From<Share> for u8 {
    fn from(share: Share) -> u8 {
        share.percent()
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// A percentage outside the allowed set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidShare(pub u8);

impl fmt::Display for InvalidShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "share must be one of 100, 50, 33, 25 (got {})",
            self.0
        )
    }
}

impl std::error::Error for InvalidShare {}
