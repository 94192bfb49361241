//! Feed palette
//!
//! Colors are plain RGBA arrays, the same representation the config layer
//! uses, so a drawing backend can convert them however it likes.

use super::SegmentRole;

pub type Rgba = [u8; 4];

/// `[HH:MM]` tag
#[inline]
pub fn timestamp() -> Rgba {
    [235, 235, 235, 255]
}

#[inline]
pub fn killer() -> Rgba {
    [95, 245, 135, 255]
}

#[inline]
pub fn verb() -> Rgba {
    [255, 255, 255, 255]
}

#[inline]
pub fn victim() -> Rgba {
    [255, 125, 125, 255]
}

/// Verb of a self-inflicted death
#[inline]
pub fn self_verb() -> Rgba {
    [255, 200, 90, 255]
}

/// Bubble background at the given opacity
#[inline]
pub fn bubble(alpha: u8) -> Rgba {
    [0, 0, 0, alpha]
}

/// Text color for a segment role
pub fn for_role(role: SegmentRole) -> Rgba {
    match role {
        SegmentRole::Timestamp => timestamp(),
        SegmentRole::Killer => killer(),
        SegmentRole::Verb => verb(),
        SegmentRole::SelfVerb => self_verb(),
        SegmentRole::Victim => victim(),
    }
}
