use crate::domain::transaction::DebtRejection;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Largest magnitude a single amount may carry, well inside the range a stored
/// balance can hold.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Optional sign on either side of the `$` marker, then either a plain digit run
/// or comma-grouped thousands, with an optional fractional part.
static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<lead>-)?\$?(?P<trail>-)?(?P<number>(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?|\.\d+)$",
    )
    .expect("amount pattern is a valid regex")
});

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AmountError {
    #[error("`{0}` is not a valid amount")]
    NoMatch(String),
    #[error("`{0}` exceeds the supported precision")]
    Precision(String),
    #[error("`{0}` is larger than the accepted maximum")]
    OutOfRange(String),
}

/// Parses a signed chip amount such as `$1,234.50`, `-5` or `.25`.
///
/// Separators and the currency marker are stripped and the remainder is parsed
/// exactly; anything that cannot be represented without rounding, or whose
/// magnitude is above [`MAX_AMOUNT`], is rejected.
pub fn parse_amount(raw: &str) -> Result<Decimal, AmountError> {
    let raw = raw.trim();
    let captures = AMOUNT_PATTERN
        .captures(raw)
        .ok_or_else(|| AmountError::NoMatch(raw.to_string()))?;

    let leading = captures.name("lead").is_some();
    let trailing = captures.name("trail").is_some();
    if leading && trailing {
        return Err(AmountError::NoMatch(raw.to_string()));
    }

    let mut digits = captures["number"].replace(',', "");
    if digits.starts_with('.') {
        digits.insert(0, '0');
    }

    let value = Decimal::from_str_exact(&digits)
        .map_err(|_| AmountError::Precision(raw.to_string()))?;
    if value > MAX_AMOUNT {
        return Err(AmountError::OutOfRange(raw.to_string()));
    }

    if leading || trailing {
        Ok(-value)
    } else {
        Ok(value)
    }
}

/// A strictly positive number of chips.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, DebtRejection> {
        if value < Decimal::ZERO {
            Err(DebtRejection::Negative)
        } else if value.is_zero() {
            Err(DebtRejection::Zero)
        } else {
            Ok(Self(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}
