use std::fmt;

/// Zero-based cell coordinate rendered in A1 notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub row: u32,
    pub col: u16,
}

impl CellRef {
    pub const fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parses `B17`-style references. Absolute markers (`$`) are accepted and ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let cleaned: String = text.trim().chars().filter(|ch| *ch != '$').collect();
        let split = cleaned.find(|ch: char| ch.is_ascii_digit())?;
        let (letters, digits) = cleaned.split_at(split);
        if letters.is_empty() || !letters.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return None;
        }

        let mut col: u32 = 0;
        for ch in letters.chars() {
            col = col * 26 + (ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            if col > u16::MAX as u32 {
                return None;
            }
        }
        let row: u32 = digits.parse().ok()?;
        if row == 0 || col == 0 {
            return None;
        }
        Some(Self::new(row - 1, (col - 1) as u16))
    }

    /// One-based row number as shown by spreadsheet software.
    pub fn display_row(&self) -> u32 {
        self.row + 1
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.col), self.row + 1)
    }
}

/// Inclusive rectangular range, usually a single column of category rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeRef {
    pub start: CellRef,
    pub end: CellRef,
}

impl RangeRef {
    pub const fn new(start: CellRef, end: CellRef) -> Self {
        Self { start, end }
    }

    pub fn rows(&self) -> u32 {
        self.end.row - self.start.row + 1
    }
}

impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Inclusive span of zero-based rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub first: u32,
    pub last: u32,
}

impl RowSpan {
    pub fn count(&self) -> usize {
        (self.last - self.first + 1) as usize
    }

    pub fn contains(&self, row: u32) -> bool {
        (self.first..=self.last).contains(&row)
    }

    pub fn column(&self, col: u16) -> RangeRef {
        RangeRef::new(CellRef::new(self.first, col), CellRef::new(self.last, col))
    }
}

/// Converts a zero-based column index to letters (0 = A, 25 = Z, 26 = AA).
pub fn column_letters(col: u16) -> String {
    let mut result = String::new();
    let mut n = col as u32;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Prefix used when a reference crosses into another worksheet.
pub fn sheet_prefix(name: &str) -> String {
    let plain = name
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if plain {
        format!("{name}!")
    } else {
        format!("'{}'!", name.replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_roll_over() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }

    #[test]
    fn parse_accepts_absolute_markers() {
        assert_eq!(CellRef::parse("B17"), Some(CellRef::new(16, 1)));
        assert_eq!(CellRef::parse("$AA$3"), Some(CellRef::new(2, 26)));
        assert_eq!(CellRef::parse("17"), None);
        assert_eq!(CellRef::parse("B0"), None);
        assert_eq!(CellRef::parse("B-1"), None);
    }

    #[test]
    fn range_renders_a1() {
        let span = RowSpan { first: 4, last: 15 };
        assert_eq!(span.column(1).to_string(), "B5:B16");
        assert_eq!(span.count(), 12);
    }

    #[test]
    fn sheet_prefix_quotes_names_with_spaces() {
        assert_eq!(sheet_prefix("Income"), "Income!");
        assert_eq!(sheet_prefix("Financial Flow"), "'Financial Flow'!");
    }
}
