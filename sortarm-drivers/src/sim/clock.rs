//! Virtual clock

/// Virtual time, advanced only by the simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimClock {
    now_ns: u64,
}

impl SimClock {
    pub const fn new() -> Self {
        Self { now_ns: 0 }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ns / 1_000_000
    }

    pub fn advance_ms(&mut self, ms: u32) {
        self.now_ns += u64::from(ms) * 1_000_000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance() {
        let mut clock = SimClock::new();
        clock.advance_ms(50);
        clock.advance_ms(20);
        assert_eq!(clock.now_ms(), 70);
    }
}
