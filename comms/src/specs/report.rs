use std::{fmt, io};

use bytemuck::{Pod, Zeroable};
use serde::Serialize;

use super::{FuncId, Query};
use crate::Frame;

/// The outcome of evaluating one `Query`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Report {
    pub func_id: FuncId,
    pub start: f64,
    pub end: f64,
    pub value: f64,
}

impl Report {
    /// Creates the report of `query` evaluated to `value`.
    pub fn new(query: &Query, value: f64) -> Self {
        Self {
            func_id: query.func_id(),
            start: query.start(),
            end: query.end(),
            value,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The integral of function {} in range {} to {} is {}",
            self.func_id,
            general(self.start, BOUND_DIGITS),
            general(self.end, BOUND_DIGITS),
            general(self.value, VALUE_DIGITS)
        )
    }
}

const BOUND_DIGITS: usize = 6;
const VALUE_DIGITS: usize = 10;

/// Renders `value` with `digits` significant digits, in positional notation
/// when its decimal exponent lies in `[-4, digits)` and in scientific notation
/// otherwise. Trailing fractional zeros are dropped.
///
/// # Arguments
/// * `value` - The number to render.
/// * `digits` - The amount of significant digits, at least 1.
fn general(value: f64, digits: usize) -> String {
    if !value.is_finite() || value == 0.0 {
        return value.to_string();
    }

    let digits = digits.max(1);
    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        );
    }

    let decimals = (digits as i32 - 1 - exponent) as usize;
    trim_fraction(&format!("{value:.decimals$}")).to_string()
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Wire layout of a `Report`: `[func_id: u64][start: f64][end: f64][value: f64]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ReportFrame {
    pub func_id: u64,
    pub start: f64,
    pub end: f64,
    pub value: f64,
}

impl Frame for Report {
    type Raw = ReportFrame;

    fn to_raw(&self) -> ReportFrame {
        ReportFrame {
            func_id: self.func_id.id(),
            start: self.start,
            end: self.end,
            value: self.value,
        }
    }

    fn from_raw(raw: ReportFrame) -> io::Result<Self> {
        Ok(Self {
            func_id: FuncId::try_from(raw.func_id)?,
            start: raw.start,
            end: raw.end,
            value: raw.value,
        })
    }
}
