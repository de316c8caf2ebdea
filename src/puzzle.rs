//! Base-pairing minigame opened from gene platforms.
//!
//! A puzzle is a row of required bases plus a shuffled pool holding exactly one
//! Watson-Crick complement per slot. The player arms one candidate at a time and
//! drops it on a slot; a wrong pairing just disarms. Once every slot is paired the
//! base counts of the required row decide which buffs are granted.

use rand::Rng;
use rand::seq::SliceRandom;

pub const MAX_DIFFICULTY: u8 = 5;
const MAX_SEQUENCE_LEN: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Base {
    A,
    T,
    G,
    C,
}

impl Base {
    pub const ALL: [Base; 4] = [Base::A, Base::T, Base::G, Base::C];

    pub fn complement(self) -> Base {
        match self {
            Base::A => Base::T,
            Base::T => Base::A,
            Base::G => Base::C,
            Base::C => Base::G,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Base::A => 'A',
            Base::T => 'T',
            Base::G => 'G',
            Base::C => 'C',
        }
    }

    pub fn from_letter(c: char) -> Option<Base> {
        match c.to_ascii_uppercase() {
            'A' => Some(Base::A),
            'T' => Some(Base::T),
            'G' => Some(Base::G),
            'C' => Some(Base::C),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Slot position in the required row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotId(pub usize);

/// Candidate identity, stable across removals from the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CandidateId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub id: SlotId,
    pub base: Base,
    pub paired: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub id: CandidateId,
    pub base: Base,
}

/// Buffs unlocked by a completed puzzle. `None`/`false` means "keep what you have".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rewards {
    pub jump_multiplier: Option<f64>,
    pub speed_multiplier: Option<f64>,
    pub shield: bool,
}

impl Rewards {
    pub fn is_empty(&self) -> bool {
        self.jump_multiplier.is_none() && self.speed_multiplier.is_none() && !self.shield
    }

    /// Display names, in HUD order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.jump_multiplier.is_some() {
            names.push("Enhanced Jump");
        }
        if self.speed_multiplier.is_some() {
            names.push("Speed Boost");
        }
        if self.shield {
            names.push("DNA Shield");
        }
        names
    }
}

pub fn sequence_len(difficulty: u8) -> usize {
    (4 + difficulty as usize).min(MAX_SEQUENCE_LEN)
}

#[derive(Clone, Debug)]
pub struct GenePuzzle {
    difficulty: u8,
    slots: Vec<Slot>,
    pool: Vec<Candidate>,
    armed: Option<CandidateId>,
    matches: usize,
    complete: bool,
}

impl GenePuzzle {
    /// Random row of `min(4 + difficulty, 8)` bases with a shuffled complement pool.
    pub fn generate<R: Rng + ?Sized>(difficulty: u8, rng: &mut R) -> Self {
        let bases: Vec<Base> = (0..sequence_len(difficulty))
            .map(|_| Base::ALL[rng.gen_range(0..Base::ALL.len())])
            .collect();
        let mut puzzle = Self::with_sequence(&bases, rng);
        puzzle.difficulty = difficulty;
        log::debug!(
            "gene puzzle generated: {}",
            bases.iter().map(|b| b.letter()).collect::<String>()
        );
        puzzle
    }

    /// Build a puzzle around a known row; only the pool order is random.
    pub fn with_sequence<R: Rng + ?Sized>(bases: &[Base], rng: &mut R) -> Self {
        let slots = bases
            .iter()
            .enumerate()
            .map(|(i, &base)| Slot { id: SlotId(i), base, paired: false })
            .collect();
        let mut pool: Vec<Candidate> = bases
            .iter()
            .enumerate()
            .map(|(i, b)| Candidate { id: CandidateId(i), base: b.complement() })
            .collect();
        pool.shuffle(rng);
        Self {
            difficulty: bases.len().saturating_sub(4).min(u8::MAX as usize) as u8,
            slots,
            pool,
            armed: None,
            matches: 0,
            complete: false,
        }
    }

    /// Discard progress and deal a new puzzle.
    pub fn reset<R: Rng + ?Sized>(&mut self, difficulty: u8, rng: &mut R) {
        *self = Self::generate(difficulty, rng);
    }

    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn pool(&self) -> &[Candidate] {
        &self.pool
    }

    pub fn armed(&self) -> Option<Candidate> {
        let id = self.armed?;
        self.pool.iter().copied().find(|c| c.id == id)
    }

    pub fn matches(&self) -> usize {
        self.matches
    }

    pub fn progress(&self) -> (usize, usize) {
        (self.matches, self.slots.len())
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Arm a pool candidate, replacing any previous selection. Unknown ids are ignored.
    pub fn select(&mut self, id: CandidateId) -> bool {
        if self.pool.iter().any(|c| c.id == id) {
            self.armed = Some(id);
            true
        } else {
            false
        }
    }

    /// Drop the armed candidate on an unpaired `slot`. The attempt disarms whether
    /// or not the bases pair.
    pub fn attempt_pair(&mut self, slot: SlotId) -> bool {
        let Some(candidate) = self.armed() else {
            return false;
        };
        let Some(target) = self.slots.get_mut(slot.0) else {
            return false;
        };
        if target.paired {
            return false;
        }
        self.armed = None;
        if target.base.complement() != candidate.base {
            log::debug!("rejected {} on slot {}", candidate.base.letter(), slot.0);
            return false;
        }
        target.paired = true;
        self.pool.retain(|c| c.id != candidate.id);
        self.matches += 1;
        if self.matches == self.slots.len() {
            self.complete = true;
        }
        true
    }

    /// Occurrences of A, T, G, C in the required row.
    pub fn base_counts(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for slot in &self.slots {
            counts[slot.base.index()] += 1;
        }
        counts
    }

    /// Buffs for a completed puzzle; `None` until every slot is paired.
    pub fn compute_rewards(&self) -> Option<Rewards> {
        if !self.complete {
            return None;
        }
        let [a, t, g, c] = self.base_counts();
        Some(Rewards {
            jump_multiplier: (a >= 2).then_some(1.5),
            speed_multiplier: (t >= 2).then_some(1.3),
            shield: g >= 2 && c >= 2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn seq(s: &str) -> Vec<Base> {
        s.chars().filter_map(Base::from_letter).collect()
    }

    /// Pair every slot correctly, picking any matching candidate from the pool.
    fn solve(p: &mut GenePuzzle) {
        for i in 0..p.slots().len() {
            let want = p.slots()[i].base.complement();
            let cand = p.pool().iter().find(|c| c.base == want).unwrap().id;
            assert!(p.select(cand));
            assert!(p.attempt_pair(SlotId(i)));
        }
    }

    #[test]
    fn complement_is_an_involution() {
        for b in Base::ALL {
            assert_ne!(b.complement(), b);
            assert_eq!(b.complement().complement(), b);
        }
    }

    #[test]
    fn length_follows_difficulty_with_cap() {
        let mut r = rng();
        for d in 1..=MAX_DIFFICULTY {
            let p = GenePuzzle::generate(d, &mut r);
            assert_eq!(p.slots().len(), (4 + d as usize).min(8));
            assert_eq!(p.pool().len(), p.slots().len());
            assert_eq!(p.matches(), 0);
            assert!(!p.is_complete());
        }
        assert_eq!(sequence_len(9), 8);
    }

    #[test]
    fn pool_is_multiset_of_complements() {
        let mut r = rng();
        let p = GenePuzzle::generate(3, &mut r);
        let mut want: Vec<char> = p.slots().iter().map(|s| s.base.complement().letter()).collect();
        let mut got: Vec<char> = p.pool().iter().map(|c| c.base.letter()).collect();
        want.sort_unstable();
        got.sort_unstable();
        assert_eq!(want, got);
    }

    #[test]
    fn arming_replaces_previous_selection() {
        let mut p = GenePuzzle::with_sequence(&seq("ATGC"), &mut rng());
        let ids: Vec<CandidateId> = p.pool().iter().map(|c| c.id).collect();
        assert!(p.select(ids[0]));
        assert!(p.select(ids[1]));
        assert_eq!(p.armed().map(|c| c.id), Some(ids[1]));
        assert!(!p.select(CandidateId(99)));
        assert_eq!(p.armed().map(|c| c.id), Some(ids[1]));
    }

    #[test]
    fn wrong_pair_disarms_and_changes_nothing_else() {
        let mut p = GenePuzzle::with_sequence(&seq("AG"), &mut rng());
        assert!(!p.attempt_pair(SlotId(0))); // nothing armed

        let wrong = p.pool().iter().find(|c| c.base == Base::C).unwrap().id; // pairs with G, not A
        p.select(wrong);
        let before_pool = p.pool().to_vec();
        let before_slots = p.slots().to_vec();
        assert!(!p.attempt_pair(SlotId(0)));
        assert_eq!(p.armed(), None);
        assert_eq!(p.pool(), before_pool.as_slice());
        assert_eq!(p.slots(), before_slots.as_slice());
        assert_eq!(p.matches(), 0);
    }

    #[test]
    fn good_pair_consumes_candidate() {
        let mut p = GenePuzzle::with_sequence(&seq("GC"), &mut rng());
        let c = p.pool().iter().find(|c| c.base == Base::C).unwrap().id;
        p.select(c);
        assert!(p.attempt_pair(SlotId(0)));
        assert_eq!(p.matches(), 1);
        assert!(p.slots()[0].paired);
        assert!(p.pool().iter().all(|x| x.id != c));
        assert_eq!(p.armed(), None);
    }

    #[test]
    fn paired_slot_rejects_further_attempts() {
        let mut p = GenePuzzle::with_sequence(&seq("AA"), &mut rng());
        let ids: Vec<CandidateId> = p.pool().iter().map(|c| c.id).collect();
        p.select(ids[0]);
        assert!(p.attempt_pair(SlotId(0)));
        p.select(ids[1]);
        assert!(!p.attempt_pair(SlotId(0)));
        assert_eq!(p.matches(), 1);
        assert_eq!(p.pool().len(), 1);
        assert!(!p.attempt_pair(SlotId(7)));
    }

    #[test]
    fn completion_and_rewards_for_aatgc() {
        let mut p = GenePuzzle::with_sequence(&seq("AATGC"), &mut rng());
        assert_eq!(p.compute_rewards(), None);
        solve(&mut p);
        assert!(p.is_complete());
        assert_eq!(p.progress(), (5, 5));
        let r = p.compute_rewards().unwrap();
        assert_eq!(r, Rewards { jump_multiplier: Some(1.5), speed_multiplier: None, shield: false });
        assert_eq!(r.names(), vec!["Enhanced Jump"]);
    }

    #[test]
    fn single_a_grants_no_jump() {
        let mut p = GenePuzzle::with_sequence(&seq("ATTGC"), &mut rng());
        solve(&mut p);
        let r = p.compute_rewards().unwrap();
        assert_eq!(r.jump_multiplier, None);
        assert_eq!(r.speed_multiplier, Some(1.3));
    }

    #[test]
    fn shield_needs_two_g_and_two_c() {
        let mut p = GenePuzzle::with_sequence(&seq("GGCCA"), &mut rng());
        solve(&mut p);
        assert!(p.compute_rewards().unwrap().shield);

        let mut q = GenePuzzle::with_sequence(&seq("GGGCA"), &mut rng());
        solve(&mut q);
        let r = q.compute_rewards().unwrap();
        assert!(!r.shield);
        assert!(r.is_empty());
    }

    #[test]
    fn reset_deals_fresh_puzzle() {
        let mut r = rng();
        let mut p = GenePuzzle::generate(1, &mut r);
        let first = p.pool()[0].id;
        p.select(first);
        p.reset(4, &mut r);
        assert_eq!(p.slots().len(), 8);
        assert_eq!(p.difficulty(), 4);
        assert_eq!(p.armed(), None);
        assert_eq!(p.matches(), 0);
    }
}
