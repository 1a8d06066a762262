//! Cell values produced by row field accessors.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A typed value read from a row field.
///
/// Search and facet filtering compare against the [`Display`](fmt::Display)
/// form. Sorting uses [`CellValue::compare`], which orders numbers
/// numerically, dates chronologically and text case-insensitively.
///
/// # Example
///
/// ```
/// use tailor_ui::CellValue;
///
/// let status = CellValue::from("Present");
/// let hours = CellValue::from(8i64);
/// assert_eq!(status.to_string(), "Present");
/// assert_eq!(hours.to_string(), "8");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing or empty value.
    #[default]
    Empty,
    /// Free text.
    Text(String),
    /// Whole number.
    Int(i64),
    /// Decimal amount (money, hours).
    Decimal(Decimal),
    /// Boolean flag.
    Bool(bool),
    /// Calendar date.
    Date(NaiveDate),
}

impl CellValue {
    /// Returns `true` for [`CellValue::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Total ordering used for column sorting.
    ///
    /// Values of the same kind compare naturally. Integers and decimals
    /// compare numerically with each other. Empty sorts after everything
    /// else; mismatched kinds fall back to comparing their string forms.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Empty, Self::Empty) => Ordering::Equal,
            (Self::Empty, _) => Ordering::Greater,
            (_, Self::Empty) => Ordering::Less,
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Decimal(a), Self::Decimal(b)) => a.cmp(b),
            (Self::Int(a), Self::Decimal(b)) => Decimal::from(*a).cmp(b),
            (Self::Decimal(a), Self::Int(b)) => a.cmp(&Decimal::from(*b)),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => compare_text(a, b),
            (a, b) => compare_text(&a.to_string(), &b.to_string()),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{}", n),
            Self::Decimal(d) => write!(f, "{}", d),
            Self::Bool(b) => f.write_str(if *b { "Yes" } else { "No" }),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::from(true).to_string(), "Yes");
        assert_eq!(
            CellValue::from(Decimal::new(12550, 2)).to_string(),
            "125.50"
        );
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(CellValue::from(date).to_string(), "2024-03-09");
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(
            CellValue::from(9i64).compare(&CellValue::from(10i64)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::from(10i64).compare(&CellValue::from(Decimal::new(95, 1))),
            Ordering::Greater
        );
    }

    #[test]
    fn test_empty_sorts_last() {
        assert_eq!(
            CellValue::Empty.compare(&CellValue::from("a")),
            Ordering::Greater
        );
        assert_eq!(
            CellValue::from("a").compare(&CellValue::Empty),
            Ordering::Less
        );
    }

    #[test]
    fn test_text_compare_ignores_case() {
        assert_eq!(
            CellValue::from("apple").compare(&CellValue::from("Banana")),
            Ordering::Less
        );
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(CellValue::from(None::<String>), CellValue::Empty);
        assert_eq!(CellValue::from(Some("x")), CellValue::from("x"));
    }
}
