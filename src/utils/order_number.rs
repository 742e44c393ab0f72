use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Issues `ORD-<unix millis>-<seq>` order numbers.
///
/// The sequence is an in-process atomic counter seeded from the number of
/// stored orders, so concurrent checkouts in one process never share a value.
#[derive(Debug, Default)]
pub struct OrderNumberGenerator {
    last: AtomicU64,
}

impl OrderNumberGenerator {
    pub fn starting_after(count: u64) -> Self {
        Self {
            last: AtomicU64::new(count),
        }
    }

    pub fn next(&self, now: DateTime<Utc>) -> String {
        let seq = self.last.fetch_add(1, Ordering::SeqCst) + 1;
        format!("ORD-{}-{:04}", now.timestamp_millis(), seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_format() {
        let generator = OrderNumberGenerator::starting_after(41);
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(generator.next(now), "ORD-1700000000123-0042");
        assert_eq!(generator.next(now), "ORD-1700000000123-0043");
    }

    #[test]
    fn test_concurrent_numbers_are_unique() {
        let generator = Arc::new(OrderNumberGenerator::default());
        let now = Utc::now();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = generator.clone();
                std::thread::spawn(move || (0..100).map(|_| generator.next(now)).collect::<Vec<_>>())
            })
            .collect();
        let mut seen = HashSet::new();
        for handle in handles {
            for number in handle.join().unwrap() {
                assert!(seen.insert(number));
            }
        }
        assert_eq!(seen.len(), 800);
    }
}
