//! Cell reference and column-letter conversion

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// Convert a 1-based column position to letters (1 = A, 26 = Z, 27 = AA, etc.)
///
/// This is bijective base-26: there is no zero digit, so `Z` is followed by
/// `AA` rather than `BA`. Position 0 has no letters and yields an empty string.
///
/// # Examples
/// ```
/// use ritstaat_core::column_to_letters;
///
/// assert_eq!(column_to_letters(1), "A");
/// assert_eq!(column_to_letters(27), "AA");
/// assert_eq!(column_to_letters(703), "AAA");
/// ```
pub fn column_to_letters(position: u32) -> String {
    let mut result = String::new();
    let mut n = position;

    while n > 0 {
        let c = (((n - 1) % 26) as u8 + b'A') as char;
        result.insert(0, c);
        n = (n - 1) / 26;
    }

    result
}

/// Convert column letters to a 1-based position (A = 1, Z = 26, AA = 27, etc.)
pub fn letters_to_column(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::InvalidCellReference("empty column letters".into()));
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidCellReference(format!(
                "invalid column letter '{}'",
                c
            )));
        }
        col = col
            .saturating_mul(26)
            .saturating_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }

    if col > MAX_COLS {
        return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
    }

    Ok(col)
}

/// A reference to one cell of a generated worksheet (e.g., "G7", "$O$5")
///
/// Both column and row are 1-based, as they appear in spreadsheet notation.
/// The optional `$` prefix makes a coordinate absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    /// Column position (1-based, A=1)
    pub column: u32,
    /// Row number (1-based)
    pub row: u32,
    /// Whether the column coordinate is absolute ($)
    pub column_absolute: bool,
    /// Whether the row coordinate is absolute ($)
    pub row_absolute: bool,
}

impl CellRef {
    /// Create a relative reference (`G7` style)
    pub fn new(column: u32, row: u32) -> Self {
        Self {
            column,
            row,
            column_absolute: false,
            row_absolute: false,
        }
    }

    /// Create an absolute reference (`$O$5` style)
    pub fn absolute(column: u32, row: u32) -> Self {
        Self {
            column,
            row,
            column_absolute: true,
            row_absolute: true,
        }
    }

    /// Parse a reference from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use ritstaat_core::CellRef;
    ///
    /// let cell = CellRef::parse("G7").unwrap();
    /// assert_eq!(cell.column, 7);
    /// assert_eq!(cell.row, 7);
    ///
    /// let cell = CellRef::parse("$O$5").unwrap();
    /// assert!(cell.column_absolute && cell.row_absolute);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidCellReference("empty reference".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        let column_absolute = if bytes.get(pos) == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        if pos == col_start {
            return Err(Error::InvalidCellReference(format!(
                "no column letters in '{}'",
                s
            )));
        }
        let column = letters_to_column(&s[col_start..pos])?;

        let row_absolute = if bytes.get(pos) == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidCellReference(format!(
                "no row number in '{}'",
                s
            )));
        }
        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidCellReference(format!("invalid row number in '{}'", s)))?;

        if row == 0 || row > MAX_ROWS {
            return Err(Error::InvalidCellReference(format!(
                "row number out of range in '{}'",
                s
            )));
        }

        Ok(Self {
            column,
            row,
            column_absolute,
            row_absolute,
        })
    }

    /// Column letters of this reference
    pub fn column_letters(&self) -> String {
        column_to_letters(self.column)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        let mut result = String::new();

        if self.column_absolute {
            result.push('$');
        }
        result.push_str(&self.column_letters());

        if self.row_absolute {
            result.push('$');
        }
        result.push_str(&self.row.to_string());

        result
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Serialized in A1 notation
#[cfg(feature = "serde")]
impl serde::Serialize for CellRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CellRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(column_to_letters(1), "A");
        assert_eq!(column_to_letters(2), "B");
        assert_eq!(column_to_letters(26), "Z");
        assert_eq!(column_to_letters(27), "AA");
        assert_eq!(column_to_letters(52), "AZ");
        assert_eq!(column_to_letters(53), "BA");
        assert_eq!(column_to_letters(702), "ZZ");
        assert_eq!(column_to_letters(703), "AAA");
        assert_eq!(column_to_letters(16384), "XFD"); // Max spreadsheet column
    }

    #[test]
    fn test_column_zero_has_no_letters() {
        assert_eq!(column_to_letters(0), "");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(letters_to_column("A").unwrap(), 1);
        assert_eq!(letters_to_column("Z").unwrap(), 26);
        assert_eq!(letters_to_column("AA").unwrap(), 27);
        assert_eq!(letters_to_column("AZ").unwrap(), 52);
        assert_eq!(letters_to_column("BA").unwrap(), 53);
        assert_eq!(letters_to_column("ZZ").unwrap(), 702);
        assert_eq!(letters_to_column("AAA").unwrap(), 703);

        // Case insensitive
        assert_eq!(letters_to_column("g").unwrap(), 7);

        assert!(letters_to_column("").is_err());
        assert!(letters_to_column("A1").is_err());
        assert_eq!(
            letters_to_column("XFE"),
            Err(Error::ColumnOutOfBounds(16385, MAX_COLS))
        );
    }

    #[test]
    fn test_cell_ref_parse() {
        let cell = CellRef::parse("G7").unwrap();
        assert_eq!(cell, CellRef::new(7, 7));

        let cell = CellRef::parse("$O$5").unwrap();
        assert_eq!(cell, CellRef::absolute(15, 5));

        let cell = CellRef::parse("$A1").unwrap();
        assert!(cell.column_absolute);
        assert!(!cell.row_absolute);

        let cell = CellRef::parse("A$1").unwrap();
        assert!(!cell.column_absolute);
        assert!(cell.row_absolute);
    }

    #[test]
    fn test_cell_ref_parse_errors() {
        assert!(CellRef::parse("").is_err());
        assert!(CellRef::parse("A").is_err());
        assert!(CellRef::parse("7").is_err());
        assert!(CellRef::parse("A0").is_err());
        assert!(CellRef::parse("A1048577").is_err());
    }

    #[test]
    fn test_cell_ref_display() {
        assert_eq!(CellRef::new(7, 7).to_string(), "G7");
        assert_eq!(CellRef::new(28, 100).to_string(), "AB100");
        assert_eq!(CellRef::absolute(15, 5).to_string(), "$O$5");
    }
}
