//! Statement date normalization.
//!
//! Banks print dates in whatever shape their statement generator likes.
//! Everything is read day-first: `01/02/2024` is 1 February.

use chrono::NaiveDate;

/// 3-letter month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// All-numeric layouts with a four-digit year, as (format, separator,
/// field widths). A string with one of these shapes is read with that
/// format only.
const NUMERIC_FORMATS: &[(&str, char, [usize; 3])] = &[
    ("%Y-%m-%d", '-', [4, 2, 2]), // 2024-02-01
    ("%d/%m/%Y", '/', [2, 2, 4]), // 01/02/2024
    ("%d-%m-%Y", '-', [2, 2, 4]), // 01-02-2024
];

/// `01-Feb-2024`. Only tried when the year has four digits, since `%Y`
/// would read `24` as year 24.
const MONTH_NAME_FORMAT: &str = "%d-%b-%Y";

/// Month number (1-based) for a 3-letter month name, ignoring case.
pub fn month_from_name(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name.trim()))
        .map(|i| i as u32 + 1)
}

/// Two-digit years below 50 are this century, the rest the last one.
/// chrono's `%y` pivots at 70, so short years are expanded here.
pub fn expand_two_digit_year(year: i32) -> i32 {
    if year < 50 {
        2000 + year
    } else {
        1900 + year
    }
}

/// Parses a statement date. Returns `None` for anything unrecognised or
/// for a calendar-invalid date such as `31/02/2024`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for &(format, sep, widths) in NUMERIC_FORMATS {
        if has_numeric_shape(s, sep, widths) {
            return NaiveDate::parse_from_str(s, format).ok();
        }
    }

    if s.rsplit('-').next().is_some_and(is_four_digit_year) {
        if let Ok(date) = NaiveDate::parse_from_str(s, MONTH_NAME_FORMAT) {
            return Some(date);
        }
    }

    // Two-digit years (`01/02/24`) and unpadded fields end up here.
    let parts: Vec<&str> = s.split(['-', '/']).collect();
    day_month_year(&parts)
}

/// [`parse_date`], plus space-separated dates such as `01 Feb 2024`.
///
/// Used everywhere a ledger's own rows are read (ordering, balance
/// inference, range filtering).
pub fn parse_date_tolerant(s: &str) -> Option<NaiveDate> {
    parse_date(s).or_else(|| {
        let parts: Vec<&str> = s.split_whitespace().collect();
        day_month_year(&parts)
    })
}

fn has_numeric_shape(s: &str, sep: char, widths: [usize; 3]) -> bool {
    let parts: Vec<&str> = s.split(sep).collect();
    parts.len() == 3
        && parts
            .iter()
            .zip(widths)
            .all(|(part, width)| part.len() == width && part.bytes().all(|b| b.is_ascii_digit()))
}

fn is_four_digit_year(part: &str) -> bool {
    part.len() == 4 && part.bytes().all(|b| b.is_ascii_digit())
}

/// `day, month, year` where month is a name or a number.
fn day_month_year(parts: &[&str]) -> Option<NaiveDate> {
    let [day, month, year] = parts else {
        return None;
    };
    let (day, month, year) = (day.trim(), month.trim(), year.trim());

    let day: u32 = day.parse().ok()?;
    let month = match month_from_name(month) {
        Some(m) => m,
        None => month.parse().ok()?,
    };
    let mut year_num: i32 = year.parse().ok()?;
    if year.len() == 2 {
        year_num = expand_two_digit_year(year_num);
    }
    NaiveDate::from_ymd_opt(year_num, month, day)
}
