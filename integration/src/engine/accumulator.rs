use parking_lot::Mutex;

/// A running sum shared by the threads of one engine invocation.
///
/// Every addition happens under an exclusive lock; the total is read once,
/// after the accumulator is no longer shared.
#[derive(Debug, Default)]
pub struct Accumulator {
    sum: Mutex<f64>,
}

impl Accumulator {
    /// Creates a new accumulator starting at `0.0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a partial area to the running sum.
    pub fn add(&self, area: f64) {
        *self.sum.lock() += area;
    }

    /// Consumes the accumulator returning the final sum.
    pub fn into_inner(self) -> f64 {
        self.sum.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn concurrent_additions_are_not_lost() {
        let acc = Accumulator::new();

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..1000 {
                        acc.add(1.0);
                    }
                });
            }
        });

        assert_eq!(acc.into_inner(), 8000.0);
    }
}
