use crate::domain::ports::{Clock, ReferenceGenerator};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Produces references of the form `TX-<millis>-<sequence>`, both base-36.
///
/// The per-process sequence makes references unique even when two are issued
/// in the same millisecond.
#[derive(Debug, Default)]
pub struct SequentialReferenceGenerator {
    sequence: AtomicU64,
}

impl SequentialReferenceGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReferenceGenerator for SequentialReferenceGenerator {
    fn next_reference(&self, now: DateTime<Utc>) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        format!("TX-{}-{:0>4}", base36(millis), base36(seq))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

fn base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn test_base36() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "Z");
        assert_eq!(base36(36), "10");
    }

    #[test]
    fn test_references_unique_within_same_millisecond() {
        let generator = SequentialReferenceGenerator::new();
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let refs: HashSet<String> = (0..1000).map(|_| generator.next_reference(now)).collect();
        assert_eq!(refs.len(), 1000);
    }

    #[test]
    fn test_reference_format() {
        let generator = SequentialReferenceGenerator::new();
        let now = Utc.timestamp_millis_opt(36).unwrap();
        assert_eq!(generator.next_reference(now), "TX-10-0000");
        assert_eq!(generator.next_reference(now), "TX-10-0001");
    }
}
