//! Random sources for the simulation.
//!
//! Every roll in the engine goes through [`RandomSource`]. Live sessions draw
//! from an [`RngBundle`] of per-domain deterministic streams; tests feed
//! [`ScriptedRolls`] to pin exact die results.

use std::cell::{RefCell, RefMut};
use std::collections::VecDeque;

use hmac::{Hmac, Mac};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

/// Probability draw returned by [`ScriptedRolls`] once its chance queue is empty.
///
/// High enough that no scripted probability check fires by accident.
pub const UNSCRIPTED_CHANCE: f64 = 0.999;

/// Uniform die rolls and probability draws.
pub trait RandomSource {
    /// Roll one die with `sides` faces, returning `1..=sides` (0 for a zero-sided die).
    fn roll_die(&mut self, sides: u32) -> u32;

    /// Uniform integer in `min..=max`.
    fn range(&mut self, min: u32, max: u32) -> u32;

    /// Uniform probability draw in `[0, 1)`.
    fn chance(&mut self) -> f64;

    /// Sum of `count` dice with `sides` faces each.
    fn roll_dice(&mut self, count: u32, sides: u32) -> u32 {
        (0..count).map(|_| self.roll_die(sides)).sum()
    }

    /// Draw once and report whether it landed under `probability`.
    fn succeeds(&mut self, probability: f64) -> bool {
        self.chance() < probability
    }

    /// Uniform index into a collection of `len` items (0 when empty).
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let upper = u32::try_from(len - 1).unwrap_or(u32::MAX);
        usize::try_from(self.range(0, upper)).unwrap_or(0)
    }
}

/// Choose one element uniformly.
pub fn pick<'a, T, R>(rng: &mut R, items: &'a [T]) -> Option<&'a T>
where
    R: RandomSource + ?Sized,
{
    if items.is_empty() {
        return None;
    }
    items.get(rng.pick_index(items.len()))
}

/// Deterministic bundle of RNG streams segregated by simulation domain.
#[derive(Debug, Clone)]
pub struct RngBundle {
    actions: RefCell<CountingRng<ChaCha20Rng>>,
    night: RefCell<CountingRng<ChaCha20Rng>>,
    discovery: RefCell<CountingRng<ChaCha20Rng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            actions: RefCell::new(CountingRng::seeded(derive_stream_seed(seed, b"actions"))),
            night: RefCell::new(CountingRng::seeded(derive_stream_seed(seed, b"night"))),
            discovery: RefCell::new(CountingRng::seeded(derive_stream_seed(seed, b"discovery"))),
        }
    }

    /// Access the stream used by day actions and trading.
    #[must_use]
    pub fn actions(&self) -> RefMut<'_, CountingRng<ChaCha20Rng>> {
        self.actions.borrow_mut()
    }

    /// Access the stream used by night effects, hazards and encounters.
    #[must_use]
    pub fn night(&self) -> RefMut<'_, CountingRng<ChaCha20Rng>> {
        self.night.borrow_mut()
    }

    /// Access the stream used by morning discoveries.
    #[must_use]
    pub fn discovery(&self) -> RefMut<'_, CountingRng<ChaCha20Rng>> {
        self.discovery.borrow_mut()
    }

    /// Total draws across every stream.
    #[must_use]
    pub fn total_draws(&self) -> u64 {
        self.actions
            .borrow()
            .draws()
            .saturating_add(self.night.borrow().draws())
            .saturating_add(self.discovery.borrow().draws())
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha20Rng> {
    /// Seeded stream, independent of any bundle.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

impl<R: rand::RngCore> RandomSource for CountingRng<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        self.gen_range(1..=sides)
    }

    fn range(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.gen_range(min..=max)
    }

    fn chance(&mut self) -> f64 {
        self.gen_range(0.0..1.0)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Replayable random source fed with explicit results.
///
/// Integer draws (`roll_die`, `range`, `pick_index`) consume the roll queue and
/// are clamped into the requested interval; an empty queue yields the lowest
/// legal value. Probability draws consume the chance queue and fall back to
/// [`UNSCRIPTED_CHANCE`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    rolls: VecDeque<u32>,
    chances: VecDeque<f64>,
}

impl ScriptedRolls {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = u32>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    #[must_use]
    pub fn with_chances(mut self, chances: impl IntoIterator<Item = f64>) -> Self {
        self.chances.extend(chances);
        self
    }

    pub fn push_roll(&mut self, roll: u32) {
        self.rolls.push_back(roll);
    }

    pub fn push_chance(&mut self, chance: f64) {
        self.chances.push_back(chance);
    }

    /// Scripted integer rolls not yet consumed.
    #[must_use]
    pub fn rolls_remaining(&self) -> usize {
        self.rolls.len()
    }

    /// Scripted probability draws not yet consumed.
    #[must_use]
    pub fn chances_remaining(&self) -> usize {
        self.chances.len()
    }
}

impl RandomSource for ScriptedRolls {
    fn roll_die(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        self.rolls.pop_front().map_or(1, |roll| roll.clamp(1, sides))
    }

    fn range(&mut self, min: u32, max: u32) -> u32 {
        let max = max.max(min);
        self.rolls
            .pop_front()
            .map_or(min, |roll| roll.clamp(min, max))
    }

    fn chance(&mut self) -> f64 {
        self.chances
            .pop_front()
            .map_or(UNSCRIPTED_CHANCE, |value| value.clamp(0.0, UNSCRIPTED_CHANCE))
    }
}
