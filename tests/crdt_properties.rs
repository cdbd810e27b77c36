// tests/crdt_properties.rs
//! Property tests for the six invariants named in the document engine's
//! specification: uniqueness of allocated positions, ordering preservation,
//! convergence under arbitrary delivery order, idempotence of `apply`,
//! round-tripping of the patch codec, and totality of the position order.

use docengine::document::Document;
use docengine::id::SiteId;
use docengine::patch::Patch;
use docengine::position::{Position, DEFAULT_BASE_BITS};
use proptest::prelude::*;
use std::cmp::Ordering;

fn printable_ascii() -> impl Strategy<Value = char> {
    (0x20u8..0x7e).prop_map(|b| b as char)
}

fn small_position() -> impl Strategy<Value = Position> {
    prop::collection::vec((0u32..16, -1i64..4), 1..4).prop_map(|levels| {
        let digits = levels.iter().map(|(d, _)| *d).collect();
        let sites = levels.iter().map(|(_, s)| SiteId::new(*s)).collect();
        Position::new(digits, sites, DEFAULT_BASE_BITS)
    })
}

proptest! {
    #[test]
    fn local_inserts_produce_pairwise_distinct_positions(
        chars in prop::collection::vec(printable_ascii(), 1..40),
        seed in any::<u64>(),
    ) {
        let mut doc = Document::with_seed(SiteId::new(0), 5, seed);
        let mut positions = Vec::new();
        for (i, ch) in chars.iter().enumerate() {
            let index = (i * 7) % (doc.visible_len() + 1);
            let patch = doc.insert(index, *ch).unwrap();
            if let Patch { pos, sites, .. } = &patch {
                positions.push((pos.clone(), sites.clone()));
            }
        }
        let unique: std::collections::HashSet<_> = positions.iter().cloned().collect();
        prop_assert_eq!(unique.len(), positions.len());
    }

    #[test]
    fn newly_issued_position_lies_strictly_between_its_neighbours(
        index_seed in 0usize..20,
        seed in any::<u64>(),
    ) {
        let mut doc = Document::with_seed(SiteId::new(0), 5, seed);
        for i in 0..10 {
            doc.insert(i.min(doc.visible_len()), 'a').unwrap();
        }

        let index = index_seed % (doc.visible_len() + 1);
        let before = doc.positions();
        let lower = before[index].clone();
        let upper = before[index + 1].clone();

        doc.insert(index, 'z').unwrap();

        let after = doc.positions();
        let inserted = after[index + 1].clone();
        prop_assert!(lower < inserted);
        prop_assert!(inserted < upper);
    }

    #[test]
    fn two_replicas_converge_under_any_interleaving(
        a_chars in prop::collection::vec(printable_ascii(), 0..15),
        b_chars in prop::collection::vec(printable_ascii(), 0..15),
        seed_a in any::<u64>(),
        seed_b in any::<u64>(),
    ) {
        let mut a = Document::with_seed(SiteId::new(0), 5, seed_a);
        let mut b = Document::with_seed(SiteId::new(1), 5, seed_b);

        let mut patches = Vec::new();
        for ch in &a_chars {
            patches.push(a.insert(0, *ch).unwrap());
        }
        for ch in &b_chars {
            patches.push(b.insert(0, *ch).unwrap());
        }

        // Deliver every patch to both replicas, once forwards and once
        // backwards, with a duplicate delivery thrown in to exercise
        // idempotence at the same time.
        for patch in patches.iter() {
            a.apply(patch).unwrap();
            a.apply(patch).unwrap();
        }
        for patch in patches.iter().rev() {
            b.apply(patch).unwrap();
            b.apply(patch).unwrap();
        }

        prop_assert_eq!(a.text(), b.text());
        prop_assert_eq!(a.patch_set(), b.patch_set());
    }

    #[test]
    fn apply_is_idempotent(ch in printable_ascii(), seed in any::<u64>()) {
        let mut origin = Document::with_seed(SiteId::new(0), 5, seed);
        let patch = origin.insert(0, ch).unwrap();

        let mut replica = Document::with_seed(SiteId::new(1), 5, seed.wrapping_add(1));
        replica.apply(&patch).unwrap();
        let once = replica.text();
        replica.apply(&patch).unwrap();
        let twice = replica.text();

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn patch_codec_round_trips(ch in printable_ascii(), seed in any::<u64>()) {
        let mut doc = Document::with_seed(SiteId::new(0), 5, seed);
        let patch = doc.insert(0, ch).unwrap();
        let encoded = patch.encode();
        let decoded = Patch::decode(&encoded).unwrap();
        prop_assert_eq!(patch, decoded.clone());
        prop_assert_eq!(decoded.encode(), encoded);
    }

    #[test]
    fn position_order_is_strict_and_total(
        a in small_position(), b in small_position(), c in small_position(),
    ) {
        // Irreflexive.
        prop_assert_eq!(a.cmp(&a), Ordering::Equal);
        // Antisymmetric.
        if a.cmp(&b) == Ordering::Less {
            prop_assert_eq!(b.cmp(&a), Ordering::Greater);
        }
        // Total: exactly one of <, ==, > holds.
        let orderings = [a.cmp(&b), b.cmp(&a)];
        prop_assert!(orderings[0] != Ordering::Equal || orderings[1] == Ordering::Equal);
        // Transitive, when the premises hold.
        if a.cmp(&b) == Ordering::Less && b.cmp(&c) == Ordering::Less {
            prop_assert_eq!(a.cmp(&c), Ordering::Less);
        }
    }
}
