use crate::{Error, ProviderError};
use std::{
    fmt::{self, Display},
    ops::RangeInclusive,
    str::FromStr,
};

/// Abstract operators the engine asks a dialect to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Concat,
    Trim,
    LTrim,
    RTrim,
    Upper,
    Lower,
    Length,
    Abs,
    Coalesce,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Random,
    Now,
    Ilike,
    RegexpLike,
}

/// Which side(s) a trim operator strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimSide {
    Both,
    Leading,
    Trailing,
}

/// Field extracted by the date part operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl DatePart {
    pub const fn name(&self) -> &'static str {
        match self {
            DatePart::Year => "YEAR",
            DatePart::Month => "MONTH",
            DatePart::Day => "DAY",
            DatePart::Hour => "HOUR",
            DatePart::Minute => "MINUTE",
            DatePart::Second => "SECOND",
        }
    }
}

impl Operator {
    pub const fn name(&self) -> &'static str {
        match self {
            Operator::Concat => "CONCAT",
            Operator::Trim => "TRIM",
            Operator::LTrim => "LTRIM",
            Operator::RTrim => "RTRIM",
            Operator::Upper => "UPPER",
            Operator::Lower => "LOWER",
            Operator::Length => "LENGTH",
            Operator::Abs => "ABS",
            Operator::Coalesce => "COALESCE",
            Operator::Year => "YEAR",
            Operator::Month => "MONTH",
            Operator::Day => "DAY",
            Operator::Hour => "HOUR",
            Operator::Minute => "MINUTE",
            Operator::Second => "SECOND",
            Operator::Random => "RANDOM",
            Operator::Now => "NOW",
            Operator::Ilike => "ILIKE",
            Operator::RegexpLike => "REGEXP_LIKE",
        }
    }

    /// Accepted number of operands.
    pub const fn arity(&self) -> RangeInclusive<usize> {
        match self {
            Operator::Concat | Operator::Coalesce => 1..=usize::MAX,
            Operator::Trim | Operator::LTrim | Operator::RTrim => 1..=2,
            Operator::Random | Operator::Now => 0..=0,
            Operator::Ilike | Operator::RegexpLike => 2..=2,
            _ => 1..=1,
        }
    }

    pub const fn trim_side(&self) -> Option<TrimSide> {
        match self {
            Operator::Trim => Some(TrimSide::Both),
            Operator::LTrim => Some(TrimSide::Leading),
            Operator::RTrim => Some(TrimSide::Trailing),
            _ => None,
        }
    }

    pub const fn date_part(&self) -> Option<DatePart> {
        match self {
            Operator::Year => Some(DatePart::Year),
            Operator::Month => Some(DatePart::Month),
            Operator::Day => Some(DatePart::Day),
            Operator::Hour => Some(DatePart::Hour),
            Operator::Minute => Some(DatePart::Minute),
            Operator::Second => Some(DatePart::Second),
            _ => None,
        }
    }

    pub(crate) fn check_arity(&self, received: usize) -> Result<(), ProviderError> {
        let arity = self.arity();
        if arity.contains(&received) {
            return Ok(());
        }
        let expected = match (arity.start(), arity.end()) {
            (0, 0) => "no",
            (1, 1) => "exactly 1",
            (2, 2) => "exactly 2",
            (1, 2) => "1 or 2",
            _ => "at least 1",
        };
        Err(ProviderError::Arity {
            operator: self.name().into(),
            expected,
            received,
        })
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.to_ascii_uppercase().as_str() {
            "CONCAT" => Operator::Concat,
            "TRIM" => Operator::Trim,
            "LTRIM" => Operator::LTrim,
            "RTRIM" => Operator::RTrim,
            "UPPER" => Operator::Upper,
            "LOWER" => Operator::Lower,
            "LENGTH" => Operator::Length,
            "ABS" => Operator::Abs,
            "COALESCE" => Operator::Coalesce,
            "YEAR" => Operator::Year,
            "MONTH" => Operator::Month,
            "DAY" => Operator::Day,
            "HOUR" => Operator::Hour,
            "MINUTE" => Operator::Minute,
            "SECOND" => Operator::Second,
            "RANDOM" => Operator::Random,
            "NOW" => Operator::Now,
            "ILIKE" => Operator::Ilike,
            "REGEXP_LIKE" => Operator::RegexpLike,
            _ => return Err(Error::new(ProviderError::unsupported(value, "keel"))),
        })
    }
}
