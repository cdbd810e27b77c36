use crate::character::Character;
use crate::error::{Error, MalformedPatch};
use crate::id::SiteId;
use crate::position::Position;
use serde::{Deserialize, Serialize};

/// Insert or delete, as it appears on the wire (`"i"` / `"d"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Op {
    #[serde(rename = "d")]
    Delete,
    #[serde(rename = "i")]
    Insert,
}

/// An encoded insert or delete operation: the atomic unit of replication.
///
/// Fields are declared in the canonical key order (`char`, `clock`, `op`,
/// `pos`, `sites`) so that `serde_json`, which preserves struct field
/// declaration order, emits the same canonical text the reference
/// implementation produces with `json.dumps(..., sort_keys=True)` — the
/// five field names already sort alphabetically in this order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Patch {
    pub char: String,
    pub clock: u64,
    pub op: Op,
    pub pos: Vec<u32>,
    pub sites: Vec<SiteId>,
}

impl Patch {
    pub fn insert(character: &Character) -> Self {
        Self {
            char: character.glyph.clone(),
            clock: character.clock,
            op: Op::Insert,
            pos: character.position.digits.clone(),
            sites: character.position.sites.clone(),
        }
    }

    pub fn delete(character: &Character) -> Self {
        Self {
            char: character.glyph.clone(),
            clock: character.clock,
            op: Op::Delete,
            pos: character.position.digits.clone(),
            sites: character.position.sites.clone(),
        }
    }

    /// Encode this patch as canonical UTF-8 text: no trailing whitespace,
    /// keys sorted, numeric values with no leading zeros. `encode` is the
    /// inverse of `decode`, and byte-equal for equal patches.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("Patch serializes without error")
    }

    /// Decode a patch from its canonical wire text, rejecting anything that
    /// would let a malformed patch mutate a `Document`: invalid JSON, a
    /// wrong-shaped object, or a `pos`/`sites` length mismatch (digit-bound
    /// validation needs `base_bits`, which isn't on the wire, so that check
    /// happens in [`Patch::to_character`] once a `Document` attaches it).
    pub fn decode(raw: &str) -> Result<Self, Error> {
        let patch: Self = serde_json::from_str(raw).map_err(|source| Error::MalformedPatch {
            reason: source.to_string(),
        })?;

        if patch.pos.len() != patch.sites.len() {
            return MalformedPatch {
                reason: format!(
                    "pos has {} digits but sites has {} entries",
                    patch.pos.len(),
                    patch.sites.len()
                ),
            }
            .fail();
        }

        Ok(patch)
    }

    pub fn to_character(&self, base_bits: u32) -> Result<Character, Error> {
        let position = Position::validated(self.pos.clone(), self.sites.clone(), base_bits)?;
        Ok(Character::new(self.char.clone(), position, self.clock))
    }
}
