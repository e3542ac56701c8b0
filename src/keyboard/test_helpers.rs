//! Shared test utilities for keyboard modules

use super::{KeyId, KeyReport, REPORT_LEN};

/// Builds a report from a modifier byte and key ids in slot order.
pub fn report(modifiers: u8, keys: &[u8]) -> KeyReport {
    KeyReport::new(modifiers, keys)
}

/// Raw bytes for the same report.
pub fn report_bytes(modifiers: u8, keys: &[u8]) -> [u8; REPORT_LEN] {
    report(modifiers, keys).to_bytes()
}

/// Wraps raw ids.
pub fn ids(keys: &[u8]) -> Vec<KeyId> {
    keys.iter().map(|&k| KeyId(k)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_bytes_layout() {
        assert_eq!(report_bytes(0x02, &[0x04]), [0x02, 0, 0x04, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn ids_wraps_in_order() {
        assert_eq!(ids(&[5, 4]), vec![KeyId(5), KeyId(4)]);
    }
}
