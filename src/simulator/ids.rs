//! Payment id generation
//!
//! Ids have the shape `pay_<base36 millisecond timestamp><9 random base36 chars>`.
//! The timestamp component comes from a process-wide clock that never repeats
//! a value, so two ids minted in the same process differ even when their
//! random suffixes collide.

use crate::types::simulated::PAYMENT_ID_PREFIX;
use chrono::Utc;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

static LAST_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh payment id
pub fn generate_payment_id() -> String {
    let millis = next_millis(Utc::now().timestamp_millis().max(0) as u64);

    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!("{}{}{}", PAYMENT_ID_PREFIX, to_base36(millis), suffix)
}

/// Strictly increasing millisecond counter seeded by the wall clock
fn next_millis(now: u64) -> u64 {
    let mut last = LAST_MILLIS.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_MILLIS.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

/// Lower-case base-36 rendering of `value`
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn test_id_shape() {
        let id = generate_payment_id();
        let body = id.strip_prefix("pay_").expect("id must carry the pay_ prefix");

        assert!(body.len() > SUFFIX_LEN);
        assert!(body
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_ids_unique_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| (0..500).map(|_| generate_payment_id()).collect::<Vec<_>>()))
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate payment id generated");
            }
        }
        assert_eq!(seen.len(), 4000);
    }

    #[test]
    fn test_clock_never_repeats() {
        let a = next_millis(5);
        let b = next_millis(5);
        assert!(b > a);
    }
}
