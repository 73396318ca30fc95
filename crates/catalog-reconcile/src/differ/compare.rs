use crate::access::FieldValue;

/// Floating-point epsilon for numeric field comparisons (§4.4, reusing the
/// `1e-9` epsilon this codebase's diff engine uses for numeric comparisons
/// generally).
pub(super) const NUMERIC_EPSILON: f64 = 1e-9;

/// Returns `true` if two field values are semantically equal under the
/// differ's rules: numeric fields compare with epsilon, date fields compare
/// as calendar-day equality (already exact for [`chrono::NaiveDate`]),
/// sequence fields compare order-sensitively, everything else structurally.
pub(super) fn values_equal(a: &FieldValue, b: &FieldValue) -> bool {
    match (a, b) {
        (FieldValue::F64(x), FieldValue::F64(y)) => (x - y).abs() < NUMERIC_EPSILON,
        _ => a == b,
    }
}
