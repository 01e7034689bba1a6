//! Per-packet identifier generation.
//!
//! The decoder never reaches for global randomness itself; callers hand it an
//! [`IdGenerator`] so that tests and reproducible runs can use deterministic
//! ids.

use rand::rngs::{StdRng, ThreadRng};
use rand::{RngCore, SeedableRng};

/// Source of unique packet identifiers.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_id(&mut self) -> String {
        (**self).next_id()
    }
}

/// Random ids: two random 32-bit words rendered in base 36 and concatenated.
///
/// # Examples
/// ```
/// use packetrain_core::{IdGenerator, RandomIds};
///
/// let mut ids = RandomIds::seeded(7);
/// let first = ids.next_id();
/// assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
/// assert_eq!(first, RandomIds::seeded(7).next_id());
/// ```
#[derive(Debug, Clone)]
pub struct RandomIds<R> {
    rng: R,
}

impl RandomIds<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomIds<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomIds<StdRng> {
    /// Reproducible ids from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: RngCore> IdGenerator for RandomIds<R> {
    fn next_id(&mut self) -> String {
        let mut id = to_base36(self.rng.next_u32());
        id.push_str(&to_base36(self.rng.next_u32()));
        id
    }
}

/// Deterministic ids: `{prefix}{n}` with `n` counting up from zero.
///
/// # Examples
/// ```
/// use packetrain_core::{IdGenerator, SequentialIds};
///
/// let mut ids = SequentialIds::new("pkt-");
/// assert_eq!(ids.next_id(), "pkt-0");
/// assert_eq!(ids.next_id(), "pkt-1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}
