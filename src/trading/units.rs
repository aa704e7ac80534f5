/// Decimal <-> base-unit conversions
///
/// Amounts are exact integers in the token's smallest unit. A human amount
/// like "1.5" at 18 decimals is 1_500_000_000_000_000_000.
use crate::errors::UnitsError;

/// Base-unit scale of trade amounts
pub const AMOUNT_DECIMALS: u32 = 18;

fn pow10(exp: u32) -> Option<u128> {
    10u128.checked_pow(exp)
}

/// Parse a human decimal string into base units
///
/// Digits beyond `decimals` are rounded half-up. Signs, exponents and
/// separators are rejected.
pub fn parse_units(amount: &str, decimals: u32) -> Result<u128, UnitsError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(UnitsError::Empty);
    }

    let invalid = || UnitsError::Invalid(amount.to_string());
    let overflow = || UnitsError::Overflow(amount.to_string());

    let (int_part, frac_part) = match amount.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (amount, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let scale = pow10(decimals).ok_or_else(overflow)?;

    let int_value: u128 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| overflow())?
    };

    let keep = (decimals as usize).min(frac_part.len());
    let (kept, rest) = frac_part.split_at(keep);
    let mut frac_value: u128 = 0;
    for digit in kept.bytes() {
        frac_value = frac_value * 10 + u128::from(digit - b'0');
    }
    let frac_value = frac_value * pow10(decimals - keep as u32).ok_or_else(overflow)?;
    let round_up = rest.bytes().next().map_or(false, |digit| digit >= b'5');

    int_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_value))
        .and_then(|v| v.checked_add(u128::from(round_up)))
        .ok_or_else(overflow)
}

/// Render base units as a decimal string without trailing zeros
pub fn format_units(value: u128, decimals: u8) -> String {
    let scale = match pow10(u32::from(decimals)) {
        Some(scale) => scale,
        None => return value.to_string(),
    };
    let int_part = value / scale;
    let frac_part = value % scale;
    if frac_part == 0 {
        return int_part.to_string();
    }

    let frac = format!("{:0width$}", frac_part, width = decimals as usize);
    format!("{}.{}", int_part, frac.trim_end_matches('0'))
}

/// Render base units with exactly `places` decimals, rounding half-up
pub fn format_fixed(value: u128, decimals: u8, places: usize) -> String {
    let decimals = u32::from(decimals);
    let places_u32 = places as u32;

    // Value expressed in units of 10^-places
    let scaled = if places_u32 >= decimals {
        pow10(places_u32 - decimals).and_then(|factor| value.checked_mul(factor))
    } else {
        pow10(decimals - places_u32).map(|divisor| {
            let quotient = value / divisor;
            let remainder = value % divisor;
            if remainder >= divisor - remainder {
                quotient + 1
            } else {
                quotient
            }
        })
    };

    let (scaled, unit) = match (scaled, pow10(places_u32)) {
        (Some(scaled), Some(unit)) => (scaled, unit),
        _ => return format_units(value, decimals as u8),
    };

    let int_part = scaled / unit;
    if places == 0 {
        return int_part.to_string();
    }
    format!("{}.{:0width$}", int_part, scaled % unit, width = places)
}
