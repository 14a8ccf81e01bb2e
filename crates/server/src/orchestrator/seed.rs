//! Match seed sources.

/// Supplies the RNG seed for each new match.
pub trait SeedSource: Send {
    fn next_seed(&mut self) -> u64;
}

/// Wall-clock milliseconds, as announced to both players in `MATCHED`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClockSeed;

impl SeedSource for ClockSeed {
    fn next_seed(&mut self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Hands out `start`, `start + 1`, ... Used to replay matches exactly.
#[derive(Clone, Copy, Debug)]
pub struct FixedSeed {
    next: u64,
}

impl FixedSeed {
    pub fn new(start: u64) -> Self {
        Self { next: start }
    }
}

impl SeedSource for FixedSeed {
    fn next_seed(&mut self) -> u64 {
        let seed = self.next;
        self.next = self.next.wrapping_add(1);
        seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_seed_counts_up() {
        let mut seeds = FixedSeed::new(41);
        assert_eq!(seeds.next_seed(), 41);
        assert_eq!(seeds.next_seed(), 42);
    }
}
