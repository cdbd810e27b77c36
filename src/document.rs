use crate::allocator::Allocator;
use crate::character::Character;
use crate::error::{Error, IndexOutOfRange, SiteAlreadyEditing};
use crate::id::SiteId;
use crate::patch::{Op, Patch};
use crate::position::{Position, DEFAULT_BASE_BITS};
use snafu::ensure;
use std::collections::BTreeSet;
use tracing::instrument;

/// An ordered multiset of [`Character`]s, sorted by `Position`'s total
/// order, bracketed by two sentinel characters that are never deleted.
///
/// Kept as a plain sorted `Vec`: `O(log n)` position lookup via binary
/// search, `O(n)` insert/remove. Acceptable for the document sizes this
/// engine targets; a balanced tree or skip list would trade that `O(n)`
/// for `O(log n)` insert at the cost of more code, and nothing in this
/// crate's test corpus needs it yet.
#[derive(Debug)]
pub struct Document {
    characters: Vec<Character>,
    site: SiteId,
    allocator: Allocator,
    clock: u64,
    base_bits: u32,
    has_edited: bool,
}

impl Document {
    /// Create a new document authored by `site`, using the default
    /// `base_bits` (5) and a non-deterministic allocator RNG.
    pub fn new(site: SiteId) -> Self {
        Self::with_base_bits(site, DEFAULT_BASE_BITS)
    }

    pub fn with_base_bits(site: SiteId, base_bits: u32) -> Self {
        Self::build(site, base_bits, Allocator::new(site))
    }

    /// Construct a document whose allocator RNG is seeded, for
    /// deterministic tests.
    pub fn with_seed(site: SiteId, base_bits: u32, seed: u64) -> Self {
        Self::build(site, base_bits, Allocator::with_seed(site, seed))
    }

    fn build(site: SiteId, base_bits: u32, allocator: Allocator) -> Self {
        let left = Character::new(
            String::new(),
            Position::new(vec![0], vec![SiteId::SENTINEL], base_bits),
            0,
        );
        let right = Character::new(
            String::new(),
            Position::new(
                vec![(1u32 << base_bits) - 1],
                vec![SiteId::SENTINEL],
                base_bits,
            ),
            0,
        );

        Self {
            characters: vec![left, right],
            site,
            allocator,
            clock: 0,
            base_bits,
            has_edited: false,
        }
    }

    /// Number of visible (non-sentinel) characters.
    pub fn visible_len(&self) -> usize {
        self.characters.len() - 2
    }

    /// Reassign the local site id, resetting the allocator's strategy map.
    /// Forbidden once a local edit has been made.
    pub fn set_site(&mut self, site: SiteId) -> Result<(), Error> {
        ensure!(!self.has_edited, SiteAlreadyEditing);
        self.site = site;
        self.allocator = Allocator::new(site);
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    pub fn insert(&mut self, index: usize, ch: char) -> Result<Patch, Error> {
        ensure!(
            index <= self.visible_len(),
            IndexOutOfRange {
                index,
                len: self.visible_len(),
            }
        );

        self.clock += 1;

        let p = self.characters[index].position.clone();
        let q = self.characters[index + 1].position.clone();
        let position = self.allocator.allocate(&p, &q)?;
        self.has_edited = true;

        let character = Character::new(ch.to_string(), position, self.clock);
        let patch = Patch::insert(&character);
        self.characters.insert(index + 1, character);

        Ok(patch)
    }

    #[instrument(level = "info", skip(self))]
    pub fn delete(&mut self, index: usize) -> Result<Patch, Error> {
        ensure!(
            index < self.visible_len(),
            IndexOutOfRange {
                index,
                len: self.visible_len(),
            }
        );

        self.clock += 1;
        self.has_edited = true;

        let removed = self.characters.remove(index + 1);
        Ok(Patch::delete(&removed))
    }

    /// Decode and apply a remote patch. Idempotent: applying the same
    /// insert twice, or deleting an identifier that is no longer present,
    /// is a no-op.
    #[instrument(level = "info", skip(self, patch))]
    pub fn apply(&mut self, patch: &Patch) -> Result<(), Error> {
        match patch.op {
            Op::Insert => {
                let already_present = self
                    .characters
                    .iter()
                    .any(|c| c.matches_identity(&patch.pos, &patch.sites, patch.clock));
                if already_present {
                    return Ok(());
                }
                let character = patch.to_character(self.base_bits)?;
                let at = self
                    .characters
                    .binary_search_by(|c| c.position.cmp(&character.position))
                    .unwrap_or_else(|insert_at| insert_at);
                self.characters.insert(at, character);
            }
            Op::Delete => {
                if let Some(at) = self
                    .characters
                    .iter()
                    .position(|c| c.matches_identity(&patch.pos, &patch.sites, patch.clock))
                {
                    self.characters.remove(at);
                }
            }
        }
        Ok(())
    }

    /// The visible index of the character a patch refers to, or `None` if
    /// it is not (or no longer) present.
    pub fn locate(&self, patch: &Patch) -> Option<usize> {
        self.characters
            .iter()
            .position(|c| c.matches_identity(&patch.pos, &patch.sites, patch.clock))
            .and_then(|at| at.checked_sub(1))
            .filter(|&visible| visible < self.visible_len())
    }

    /// Concatenation of non-sentinel glyphs in position order.
    pub fn text(&self) -> String {
        self.characters.iter().map(|c| c.glyph.as_str()).collect()
    }

    /// Author of every character, sentinels included, in position order.
    pub fn authors(&self) -> Vec<SiteId> {
        self.characters.iter().map(Character::author).collect()
    }

    /// Every non-sentinel character's insert patch, encoded — sufficient
    /// to rehydrate this document on a fresh replica.
    pub fn patch_set(&self) -> BTreeSet<String> {
        self.characters[1..self.characters.len() - 1]
            .iter()
            .map(|c| Patch::insert(c).encode())
            .collect()
    }

    pub fn site(&self) -> SiteId {
        self.site
    }

    /// All positions currently in the document, sentinels included, in
    /// their total order. Exposed for tests and for hosts that need to map
    /// between visible indices and identifiers directly.
    pub fn positions(&self) -> Vec<Position> {
        self.characters.iter().map(|c| c.position.clone()).collect()
    }
}
