//! Per-instrument and per-date coverage views derived from the matrix.
//!
//! Both summarizers read the matrix independently and never mutate it.
//! Their coverage ratios use different denominators: an
//! instrument's ratio is relative to its own active span, a date's ratio is
//! relative to the whole ticker universe.

pub mod date;
pub mod export;
pub mod instrument;

pub use date::{DateSummarizer, DateSummary};
pub use export::{write_date_summary_csv, write_instrument_summary_csv};
pub use instrument::{type_breakdown, InstrumentSummarizer, InstrumentSummary};

use std::cmp::Ordering;

/// Decimal places kept in every persisted coverage ratio.
pub const RATIO_DECIMALS: u32 = 4;

/// `numerator / denominator` rounded to [`RATIO_DECIMALS`]; 0 when the
/// denominator is 0.
///
/// Rounds the `f64` quotient correctly: a quotient that sits exactly on a
/// midpoint goes to the even digit, and a midpoint that `f64` cannot hold
/// goes whichever way the stored quotient lies.
pub fn coverage_ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let scale = 10u128.pow(RATIO_DECIMALS);
    let scaled = numerator as u128 * scale;
    let den = denominator as u128;
    let (mut steps, rem) = (scaled / den, scaled % den);

    let round_up = match (2 * rem).cmp(&den) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => {
            let quotient = numerator as f64 / denominator as f64;
            match compare_exact(quotient, 2 * steps + 1, 2 * scale) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Less) => false,
                _ => steps % 2 == 1,
            }
        }
    };
    if round_up {
        steps += 1;
    }
    steps as f64 / scale as f64
}

/// Exact comparison of a positive finite `x` with `p / s`, `None` when the
/// operands do not fit in `u128`.
fn compare_exact(x: f64, p: u128, s: u128) -> Option<Ordering> {
    let bits = x.to_bits();
    let biased_exp = ((bits >> 52) & 0x7ff) as i32;
    if biased_exp == 0 || biased_exp == 0x7ff {
        return None;
    }
    // x = mantissa * 2^exp
    let mantissa = u128::from((bits & ((1u64 << 52) - 1)) | (1u64 << 52));
    let exp = biased_exp - 1075;
    if exp >= 0 {
        return None;
    }
    let shift = exp.unsigned_abs();
    if shift >= p.leading_zeros() {
        return None;
    }
    let lhs = mantissa.checked_mul(s)?;
    Some(lhs.cmp(&(p << shift)))
}
