use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the replica that authored a [`crate::position::Position`] level.
///
/// Wire-compatible with a plain signed integer so the patch codec round-trips
/// byte-for-byte with the reference implementation, which encodes sites as
/// plain JSON integers (including the sentinel `-1`).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct SiteId(pub i64);

impl SiteId {
    /// Value outside the replica-ID space, used to bracket the document with
    /// the left/right sentinel characters.
    pub const SENTINEL: SiteId = SiteId(-1);

    pub fn new(id: i64) -> Self {
        SiteId(id)
    }

    pub fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SiteId {
    fn from(v: i64) -> Self {
        SiteId(v)
    }
}
