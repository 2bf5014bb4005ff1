use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds half away from zero to `dp` places and drops trailing zeros.
pub(crate) fn round(value: Decimal, dp: u32) -> String {
    value
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

/// Like `round`, with an explicit leading `+` for non-negative values.
pub(crate) fn signed(value: Decimal, dp: u32) -> String {
    let rounded = round(value, dp);
    if rounded.starts_with('-') {
        rounded
    } else {
        format!("+{rounded}")
    }
}

/// Groups thousands with commas, e.g. `3000` becomes `3,000`.
pub(crate) fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
