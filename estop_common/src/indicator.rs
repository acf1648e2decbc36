//! Indicator channel types.
//!
//! Two physical output bits communicate system state: one driven by the
//! foreground loop, one by the periodic annunciator. Each channel has
//! exactly one writer; the combined visual (both on at once) is a
//! property of the hardware, not of this software.

use serde::{Deserialize, Serialize};

/// Identifier of one physical indicator output bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub u8);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ch{}", self.0)
    }
}

/// Output level of an indicator channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Level {
    /// Indicator dark.
    #[default]
    Off = 0,
    /// Indicator lit.
    On = 1,
}

impl Level {
    /// Level mirroring a latch value: asserted → `On`.
    #[inline]
    pub const fn from_asserted(asserted: bool) -> Self {
        if asserted { Self::On } else { Self::Off }
    }

    #[inline]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// Raw encoding for atomic storage.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode from atomic storage. Any non-zero value reads as `On`.
    #[inline]
    pub const fn from_u8(raw: u8) -> Self {
        if raw == 0 { Self::Off } else { Self::On }
    }
}

/// One indicator output bit plus the last level driven onto it.
///
/// Owned and mutated exclusively by its driving component — no other
/// component may write it, so no synchronization is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorChannel {
    id: ChannelId,
    level: Level,
}

impl IndicatorChannel {
    /// Create a channel in the `Off` state.
    pub const fn new(id: ChannelId) -> Self {
        Self {
            id,
            level: Level::Off,
        }
    }

    #[inline]
    pub const fn id(&self) -> ChannelId {
        self.id
    }

    /// Last level driven onto this channel.
    #[inline]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Record the level just driven onto the output.
    #[inline]
    pub fn set(&mut self, level: Level) {
        self.level = level;
    }
}
