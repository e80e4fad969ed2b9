//! Date-token directory formatting.
//!
//! The directory name format is a small token language applied to the
//! current wall-clock date, so two invocations in the same calendar bucket
//! share a directory. Recognized tokens (longest match wins):
//!
//! | token  | meaning               | example |
//! |--------|-----------------------|---------|
//! | `yyyy` | 4-digit year          | `2026`  |
//! | `yy`   | 2-digit year          | `26`    |
//! | `mmmm` | full month name       | `August`|
//! | `mmm`  | abbreviated month name| `Aug`   |
//! | `mm`   | zero-padded month     | `08`    |
//! | `m`    | month                 | `8`     |
//! | `dd`   | zero-padded day       | `09`    |
//! | `d`    | day                   | `9`     |
//!
//! Any other character is copied through literally, so the default
//! `yyyy/mmm/d` yields a nested directory like `2026/Aug/29`.

use chrono::{Datelike, NaiveDate};

const MONTHS_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHS_FULL: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Apply the token format to a date, producing a relative directory path.
pub fn format_dir(format: &str, date: NaiveDate) -> String {
    let month = date.month() as usize;
    let mut out = String::with_capacity(format.len() + 8);
    let mut rest = format;

    while !rest.is_empty() {
        let (token_len, rendered) = if rest.starts_with("yyyy") {
            (4, format!("{:04}", date.year()))
        } else if rest.starts_with("yy") {
            (2, format!("{:02}", date.year() % 100))
        } else if rest.starts_with("mmmm") {
            (4, MONTHS_FULL[month - 1].to_string())
        } else if rest.starts_with("mmm") {
            (3, MONTHS_ABBR[month - 1].to_string())
        } else if rest.starts_with("mm") {
            (2, format!("{:02}", month))
        } else if rest.starts_with('m') {
            (1, month.to_string())
        } else if rest.starts_with("dd") {
            (2, format!("{:02}", date.day()))
        } else if rest.starts_with('d') {
            (1, date.day().to_string())
        } else {
            match rest.chars().next() {
                Some(c) => (c.len_utf8(), c.to_string()),
                None => break,
            }
        };
        out.push_str(&rendered);
        rest = &rest[token_len..];
    }

    out
}
