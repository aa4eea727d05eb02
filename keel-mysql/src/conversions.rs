use keel_core::{ProviderError, Result};
use mysql_async::Value as WireValue;
use time::{Date, Duration, Month, PrimitiveDateTime, Time};

const MICROS_DIGITS: usize = 6;

fn invalid(text: &str, target: &'static str, reason: impl Into<String>) -> ProviderError {
    ProviderError::conversion(text, target, reason)
}

/// Parses the textual datetime form sent by the server.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and up to six fractional
/// digits, `T` may replace the space. A shorter fraction is padded with
/// zeros so `.5` means half a second.
pub fn str_to_datetime(text: &str) -> Result<PrimitiveDateTime> {
    const TARGET: &str = "DATETIME";
    let trimmed = text.trim();
    let mut padded = trimmed.to_owned();
    let len = padded.len();
    if 19 < len && len < 26 {
        padded.extend(std::iter::repeat_n('0', 26 - len));
    }
    let fields = padded
        .split(['-', ':', '.', 'T', ' '])
        .filter(|v| !v.is_empty())
        .map(|v| v.parse::<u32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| invalid(text, TARGET, e.to_string()))?;
    if !matches!(fields.len(), 3 | 5 | 6 | 7) {
        return Err(invalid(text, TARGET, "unexpected number of fields").into());
    }
    let field = |i: usize| fields.get(i).copied().unwrap_or(0);
    let year = i32::try_from(field(0)).map_err(|e| invalid(text, TARGET, e.to_string()))?;
    let month = u8::try_from(field(1))
        .ok()
        .and_then(|v| Month::try_from(v).ok())
        .ok_or_else(|| invalid(text, TARGET, "month out of range"))?;
    let day = u8::try_from(field(2)).map_err(|e| invalid(text, TARGET, e.to_string()))?;
    let date = Date::from_calendar_date(year, month, day)
        .map_err(|e| invalid(text, TARGET, e.to_string()))?;
    let small =
        |i: usize| u8::try_from(field(i)).map_err(|e| invalid(text, TARGET, e.to_string()));
    let time = Time::from_hms_micro(small(3)?, small(4)?, small(5)?, field(6))
        .map_err(|e| invalid(text, TARGET, e.to_string()))?;
    Ok(PrimitiveDateTime::new(date, time))
}

/// Parses the textual `TIME` form `[-]H:MM:SS[.ffffff]`.
///
/// The hours may exceed 24. A leading minus negates the whole duration,
/// `-00:30:00` included.
pub fn str_to_duration(text: &str) -> Result<Duration> {
    const TARGET: &str = "TIME";
    let trimmed = text.trim();
    let (main, fraction) = match trimmed.split_once('.') {
        Some((main, fraction)) => (main, fraction),
        None => (trimmed, ""),
    };
    if !fraction.bytes().all(|v| v.is_ascii_digit()) {
        return Err(invalid(text, TARGET, "fractional seconds must be digits").into());
    }
    let micros = format!("{:0<width$.width$}", fraction, width = MICROS_DIGITS)
        .parse::<i64>()
        .map_err(|e| invalid(text, TARGET, e.to_string()))?;
    let mut parts = main.split(':');
    let (Some(hours), Some(minutes), Some(seconds), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid(text, TARGET, "expected H:MM:SS").into());
    };
    let (negative, hours) = match hours.strip_prefix('-') {
        Some(v) => (true, v),
        None => (false, hours),
    };
    let hours = hours
        .parse::<u32>()
        .map_err(|e| invalid(text, TARGET, e.to_string()))?;
    let number = |v: &str| {
        v.parse::<i64>()
            .map_err(|e| invalid(text, TARGET, e.to_string()))
    };
    let (minutes, seconds) = (number(minutes)?, number(seconds)?);
    if !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return Err(invalid(text, TARGET, "minutes and seconds must be in 0..60").into());
    }
    let total = Duration::hours(hours as i64)
        + Duration::minutes(minutes)
        + Duration::seconds(seconds)
        + Duration::microseconds(micros);
    Ok(if negative { -total } else { total })
}

/// Drops the sub-second digits beyond `precision`.
pub(crate) fn truncate_micros(micros: u32, precision: u8) -> u32 {
    let precision = precision.min(MICROS_DIGITS as u8);
    let unit = 10u32.pow((MICROS_DIGITS as u32) - precision as u32);
    micros - micros % unit
}

fn wire_year(value: Date) -> Result<u16> {
    u16::try_from(value.year())
        .ok()
        .filter(|v| *v <= 9999)
        .ok_or_else(|| invalid(&value.to_string(), "DATE", "year out of range 0..=9999").into())
}

pub(crate) fn date_to_wire(value: Date) -> Result<WireValue> {
    Ok(WireValue::Date(
        wire_year(value)?,
        value.month() as u8,
        value.day(),
        0,
        0,
        0,
        0,
    ))
}

pub(crate) fn datetime_to_wire(value: PrimitiveDateTime, precision: u8) -> Result<WireValue> {
    Ok(WireValue::Date(
        wire_year(value.date())?,
        value.month() as u8,
        value.day(),
        value.hour(),
        value.minute(),
        value.second(),
        truncate_micros(value.microsecond(), precision),
    ))
}

pub(crate) fn duration_to_wire(value: Duration, precision: u8) -> Result<WireValue> {
    let negative = value.is_negative();
    let value = value.abs();
    let days = u32::try_from(value.whole_days())
        .map_err(|e| invalid(&value.to_string(), "TIME", e.to_string()))?;
    let micros = (value.subsec_microseconds() as u32) % 1_000_000;
    Ok(WireValue::Time(
        negative,
        days,
        (value.whole_hours() % 24) as u8,
        (value.whole_minutes() % 60) as u8,
        (value.whole_seconds() % 60) as u8,
        truncate_micros(micros, precision),
    ))
}

pub(crate) fn wire_to_date(raw: WireValue) -> Result<Date> {
    match raw {
        WireValue::Date(year, month, day, ..) => {
            let shown = format!("{year:04}-{month:02}-{day:02}");
            let month =
                Month::try_from(month).map_err(|e| invalid(&shown, "DATE", e.to_string()))?;
            Date::from_calendar_date(year as i32, month, day)
                .map_err(|e| invalid(&shown, "DATE", e.to_string()).into())
        }
        WireValue::Bytes(v) => str_to_datetime(&text(&v, "DATE")?).map(|v| v.date()),
        v => Err(invalid(&format!("{v:?}"), "DATE", "unexpected wire value").into()),
    }
}

pub(crate) fn wire_to_datetime(raw: WireValue) -> Result<PrimitiveDateTime> {
    match raw {
        WireValue::Date(year, month, day, hour, minute, second, micros) => {
            let shown = format!(
                "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{micros:06}"
            );
            let date = wire_to_date(WireValue::Date(year, month, day, 0, 0, 0, 0))?;
            let time = Time::from_hms_micro(hour, minute, second, micros)
                .map_err(|e| invalid(&shown, "DATETIME", e.to_string()))?;
            Ok(PrimitiveDateTime::new(date, time))
        }
        WireValue::Bytes(v) => str_to_datetime(&text(&v, "DATETIME")?),
        v => Err(invalid(&format!("{v:?}"), "DATETIME", "unexpected wire value").into()),
    }
}

pub(crate) fn wire_to_duration(raw: WireValue) -> Result<Duration> {
    match raw {
        WireValue::Time(negative, days, hours, minutes, seconds, micros) => {
            let total = Duration::days(days as i64)
                + Duration::hours(hours as i64)
                + Duration::minutes(minutes as i64)
                + Duration::seconds(seconds as i64)
                + Duration::microseconds(micros as i64);
            Ok(if negative { -total } else { total })
        }
        WireValue::Bytes(v) => str_to_duration(&text(&v, "TIME")?),
        v => Err(invalid(&format!("{v:?}"), "TIME", "unexpected wire value").into()),
    }
}

/// Renders a typed binary protocol value the way the text protocol sends it.
///
/// Returns `None` for `NULL` and for raw bytes, which are already text.
pub(crate) fn wire_to_text(raw: &WireValue) -> Option<String> {
    let fraction = |micros: u32| match micros {
        0 => String::new(),
        v => format!(".{v:06}"),
    };
    Some(match raw {
        WireValue::NULL | WireValue::Bytes(..) => return None,
        WireValue::Int(v) => v.to_string(),
        WireValue::UInt(v) => v.to_string(),
        WireValue::Float(v) => v.to_string(),
        WireValue::Double(v) => v.to_string(),
        WireValue::Date(year, month, day, hour, minute, second, micros) => format!(
            "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}{}",
            fraction(*micros)
        ),
        WireValue::Time(negative, days, hours, minutes, seconds, micros) => format!(
            "{}{:02}:{minutes:02}:{seconds:02}{}",
            if *negative { "-" } else { "" },
            *days as u64 * 24 + *hours as u64,
            fraction(*micros)
        ),
    })
}

/// UTF-8 view of text protocol bytes.
pub(crate) fn text(raw: &[u8], target: &'static str) -> Result<String> {
    String::from_utf8(raw.to_vec()).map_err(|e| {
        invalid(&String::from_utf8_lossy(raw), target, e.to_string()).into()
    })
}
