//! Statement date decoded from a statement's file name.
//!
//! Statements are stored as `MMDDYY<anything>.pdf`; the year printed on
//! individual lines is not trusted, so this is the authoritative year.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementDate {
    pub month: u32,
    pub day: u32,
    pub year: i32,
}

impl StatementDate {
    /// Decode the `MMDDYY` fragment that follows the last path separator.
    pub fn from_path(path: &Path) -> Result<Self> {
        let unrecognized = || ConvertError::UnrecognizedFileName {
            path: path.to_path_buf(),
        };

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(unrecognized)?;

        let fragment = file_name.get(..6).ok_or_else(unrecognized)?;
        if !fragment.bytes().all(|b| b.is_ascii_digit()) {
            return Err(unrecognized());
        }

        let month: u32 = fragment[0..2].parse().map_err(|_| unrecognized())?;
        let day: u32 = fragment[2..4].parse().map_err(|_| unrecognized())?;
        let yy: i32 = fragment[4..6].parse().map_err(|_| unrecognized())?;

        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(unrecognized());
        }

        Ok(Self {
            month,
            day,
            year: 2000 + yy,
        })
    }

    pub fn is_january(&self) -> bool {
        self.month == 1
    }

    /// Calendar year of a transaction printed with `txn_month` on this statement.
    ///
    /// A December line on a January statement belongs to the previous year.
    pub fn year_for_month(&self, txn_month: u32) -> i32 {
        if self.is_january() && txn_month == 12 {
            self.year - 1
        } else {
            self.year
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_decodes_fragment_after_last_separator() {
        let d = StatementDate::from_path(&PathBuf::from("statements/2024/011524 WellsFargo.pdf"))
            .unwrap();
        assert_eq!(d, StatementDate { month: 1, day: 15, year: 2024 });
        assert!(d.is_january());
    }

    #[test]
    fn test_rejects_non_numeric_fragment() {
        let err = StatementDate::from_path(&PathBuf::from("in/Jan2024.pdf")).unwrap_err();
        assert!(matches!(err, ConvertError::UnrecognizedFileName { .. }));

        let err = StatementDate::from_path(&PathBuf::from("in/0115.pdf")).unwrap_err();
        assert!(matches!(err, ConvertError::UnrecognizedFileName { .. }));

        let err = StatementDate::from_path(&PathBuf::from("in/131524.pdf")).unwrap_err();
        assert!(matches!(err, ConvertError::UnrecognizedFileName { .. }));
    }

    #[test]
    fn test_year_rollover_only_for_december_in_january() {
        let jan = StatementDate { month: 1, day: 15, year: 2024 };
        assert_eq!(jan.year_for_month(12), 2023);
        assert_eq!(jan.year_for_month(1), 2024);
        assert_eq!(jan.year_for_month(11), 2024);

        let feb = StatementDate { month: 2, day: 15, year: 2024 };
        assert_eq!(feb.year_for_month(12), 2024);
    }
}
