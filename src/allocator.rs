use crate::error::{DepthExhausted, EqualBounds, Error};
use crate::id::SiteId;
use crate::position::Position;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use snafu::OptionExt;

/// Maximum allocation step: keeps fresh identifiers within a few slots of
/// whichever edge was chosen, so a later insert at the opposite edge does
/// not force the tree to deepen immediately.
pub const BOUNDARY: u32 = 5;

/// Produces a fresh [`Position`] strictly between two given ones.
///
/// Owned per `Document`; its strategy map (boundary+ / boundary- per depth)
/// is fixed the first time a depth is allocated at and then reused for
/// every later allocation at that depth, which is what gives identifier
/// growth its amortised logarithmic shape.
#[derive(Debug)]
pub struct Allocator {
    site: SiteId,
    strategy: Vec<Option<bool>>,
    rng: StdRng,
}

impl Allocator {
    pub fn new(site: SiteId) -> Self {
        Self::with_rng(site, StdRng::from_entropy())
    }

    /// Construct an allocator with a seeded RNG, for deterministic tests.
    pub fn with_seed(site: SiteId, seed: u64) -> Self {
        Self::with_rng(site, StdRng::seed_from_u64(seed))
    }

    fn with_rng(site: SiteId, rng: StdRng) -> Self {
        Self {
            site,
            strategy: Vec::new(),
            rng,
        }
    }

    fn max_depth(base_bits: u32) -> u32 {
        32 - base_bits
    }

    /// `true` = boundary+, `false` = boundary-. Picks and memoises a fair
    /// coin flip the first time `depth` is consulted.
    fn strategy_for(&mut self, depth: usize) -> bool {
        if self.strategy.len() < depth {
            self.strategy.resize(depth, None);
        }
        if self.strategy[depth - 1].is_none() {
            self.strategy[depth - 1] = Some(self.rng.gen());
        }
        self.strategy[depth - 1].unwrap()
    }

    /// Allocate a fresh position `r` with `p < r < q`.
    pub fn allocate(&mut self, p: &Position, q: &Position) -> Result<Position, Error> {
        if p.digits == q.digits && p.sites == q.sites {
            return EqualBounds.fail();
        }

        let max_depth = Self::max_depth(p.base_bits);
        let mut depth = 0usize;
        let mut free_slots: i128 = 0;
        let mut is_equal_prefix = false;

        loop {
            depth += 1;
            if depth as u32 > max_depth {
                return DepthExhausted { max_depth }.fail();
            }
            let (free, equal) = p
                .interval(q, depth)
                .context(DepthExhausted { max_depth })?;
            free_slots = free;
            is_equal_prefix = equal;
            if free_slots >= 1 {
                break;
            }
            // free_slots <= 0 at this depth (the two positions project to
            // the same or adjacent integers): not enough room yet, keep
            // deepening rather than treating this as depth-exhaustion.
        }

        let step_bound = std::cmp::min(BOUNDARY as i128, free_slots);
        let alloc_step = self.rng.gen_range(1i128, step_bound + 1) as u128;

        let boundary_plus = self.strategy_for(depth);
        let r = if boundary_plus || is_equal_prefix {
            p.to_int(depth)
                .context(DepthExhausted { max_depth })?
                + alloc_step
        } else {
            q.to_int(depth)
                .context(DepthExhausted { max_depth })?
                - alloc_step
        };

        let mut sites = p.sites.clone();
        sites.resize(depth, self.site);
        *sites.last_mut().expect("depth >= 1") = self.site;

        Ok(Position::from_int(r, depth, sites, p.base_bits))
    }
}
