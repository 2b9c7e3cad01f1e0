// The "Name: amount, Name: amount" payment-ledger micro-format.
//
// Weekly records store each payment category as one of these strings,
// preserved verbatim from the legacy data. There is no escaping: names
// containing ',' or ':' are outside the format and will not survive a
// round trip. Decoding is lenient and skips anything unparseable.

use serde::{Deserialize, Serialize};

/// One named payment inside a ledger string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub name: String,
    pub amount: f64,
}

impl LedgerEntry {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self { name: name.into(), amount }
    }
}

/// Encode entries as `"Name: amount"` pairs joined with `", "`.
/// Zero amounts are omitted; no qualifying entries yields the empty
/// string.
pub fn encode(entries: &[LedgerEntry]) -> String {
    let mut parts = Vec::new();

    for entry in entries {
        if entry.amount == 0.0 {
            continue;
        }
        parts.push(format!("{}: {}", entry.name, entry.amount));
    }

    parts.join(", ")
}

/// Decode a ledger string. Splits on ',', then each segment on its first
/// ':'; both halves are trimmed and the amount parsed as a float.
/// Segments without a colon or with an unparseable amount are skipped
/// silently, in entry order.
pub fn decode(raw: &str) -> Vec<LedgerEntry> {
    let mut entries = Vec::new();

    for segment in raw.split(',') {
        let Some((name, amount)) = segment.split_once(':') else {
            continue;
        };
        let Ok(amount) = amount.trim().parse::<f64>() else {
            continue;
        };
        entries.push(LedgerEntry::new(name.trim(), amount));
    }

    entries
}

/// Sum of all decodable amounts in a ledger string.
pub fn sum(raw: &str) -> f64 {
    decode(raw).iter().map(|entry| entry.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_legacy_form() {
        let entries = decode("Alice: 5000, Bob: 3000");
        assert_eq!(
            entries,
            vec![
                LedgerEntry::new("Alice", 5000.0),
                LedgerEntry::new("Bob", 3000.0),
            ]
        );
    }

    #[test]
    fn encode_then_decode_preserves_entries() {
        let entries = vec![
            LedgerEntry::new("Alice", 5000.0),
            LedgerEntry::new("Bob", 12.5),
        ];
        assert_eq!(decode(&encode(&entries)), entries);
    }

    #[test]
    fn integer_amounts_render_without_a_decimal_point() {
        let encoded = encode(&[LedgerEntry::new("Alice", 5000.0)]);
        assert_eq!(encoded, "Alice: 5000");

        let encoded = encode(&[LedgerEntry::new("Bob", 12.5)]);
        assert_eq!(encoded, "Bob: 12.5");
    }

    #[test]
    fn zero_amounts_are_omitted_from_encoding() {
        let entries = vec![
            LedgerEntry::new("Alice", 0.0),
            LedgerEntry::new("Bob", 200.0),
            LedgerEntry::new("Carol", 0.0),
        ];
        assert_eq!(encode(&entries), "Bob: 200");
    }

    #[test]
    fn empty_inputs_are_empty() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode(""), vec![]);
        assert_eq!(sum(""), 0.0);
    }

    #[test]
    fn unparseable_segments_are_skipped() {
        // No colon, bad amount, then a good entry
        let entries = decode("garbage, Bob: lots, Carol: 70");
        assert_eq!(entries, vec![LedgerEntry::new("Carol", 70.0)]);
    }

    #[test]
    fn names_and_amounts_are_trimmed() {
        let entries = decode("  Alice  :  150.25  ");
        assert_eq!(entries, vec![LedgerEntry::new("Alice", 150.25)]);
    }

    #[test]
    fn split_happens_on_the_first_colon() {
        // The remainder after the first colon fails to parse, so the
        // whole segment is dropped rather than mangled.
        assert_eq!(decode("Mary: Ann: 5"), vec![]);
    }

    #[test]
    fn duplicate_names_are_kept_and_summed() {
        let raw = "Alice: 10, Alice: 15";
        assert_eq!(decode(raw).len(), 2);
        assert_eq!(sum(raw), 25.0);
    }

    #[test]
    fn sums_negative_and_fractional_amounts() {
        assert_eq!(sum("A: 10.5, B: -0.5"), 10.0);
    }
}
