//! Reading and writing patterns as text.

pub mod plaintext;
pub mod rle;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::domain::{CellState, LifeRule, Point, RuleError};

/// Result of parsing a pattern file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedPattern {
    pub cells: CellState,
    /// Rule from the RLE header, if the file names one
    pub rule: Option<LifeRule>,
    pub comments: Vec<String>,
}

/// Errors from parsing pattern text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("malformed {format} pattern: {message}")]
    Malformed {
        format: CellStateFormat,
        message: String,
    },
    #[error("invalid rule in header: {0}")]
    InvalidRule(#[source] RuleError),
    #[error("line {line}: cell coordinates exceed the 32-bit grid")]
    CoordinateOverflow { line: usize },
    #[error("cell ({x}, {y}) is outside the 32-bit grid")]
    OutOfRange { x: i64, y: i64 },
    #[error("Unknown pattern format '{0}', expected 'rle' or 'cells'")]
    UnknownFormat(String),
}

/// Maps a `ca_formats` reader error into [`FormatError::Malformed`]
fn malformed<E: fmt::Display>(format: CellStateFormat) -> impl Fn(E) -> FormatError {
    move |e| FormatError::Malformed {
        format,
        message: e.to_string(),
    }
}

/// Grid point for a position reported by a `ca_formats` reader
fn to_point((x, y): (i64, i64)) -> Result<Point, FormatError> {
    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) => Ok(Point::new(x, y)),
        _ => Err(FormatError::OutOfRange { x, y }),
    }
}

/// Supported pattern file formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CellStateFormat {
    Plaintext,
    #[default]
    RunLengthEncoded,
}

impl CellStateFormat {
    pub fn all() -> Vec<CellStateFormat> {
        vec![CellStateFormat::Plaintext, CellStateFormat::RunLengthEncoded]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            CellStateFormat::Plaintext => "cells",
            CellStateFormat::RunLengthEncoded => "rle",
        }
    }

    /// Format named by a file's extension
    pub fn from_path_extension(path: &Path) -> Option<CellStateFormat> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::all().into_iter().find(|f| f.extension() == ext)
    }

    /// Guess the format from content.
    /// Plaintext comments start with `!` and its rows only use `.O`,
    /// anything else is treated as RLE.
    pub fn detect(text: &str) -> CellStateFormat {
        let first = text.lines().map(str::trim).find(|l| !l.is_empty());
        match first {
            Some(line) if line.starts_with('!') => CellStateFormat::Plaintext,
            Some(line) if rle::is_header(line) || line.starts_with('#') => {
                CellStateFormat::RunLengthEncoded
            }
            Some(line) if line.chars().all(|c| matches!(c, '.' | 'O')) => {
                CellStateFormat::Plaintext
            }
            _ => CellStateFormat::RunLengthEncoded,
        }
    }

    pub fn parse(&self, text: &str) -> Result<ParsedPattern, FormatError> {
        match self {
            CellStateFormat::Plaintext => plaintext::parse(text),
            CellStateFormat::RunLengthEncoded => rle::parse(text),
        }
    }

    pub fn serialize(&self, state: &CellState, rule: &LifeRule, comments: &[String]) -> String {
        match self {
            CellStateFormat::Plaintext => plaintext::serialize(state, comments),
            CellStateFormat::RunLengthEncoded => rle::serialize(state, rule, comments),
        }
    }
}

impl FromStr for CellStateFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rle" => Ok(CellStateFormat::RunLengthEncoded),
            "cells" | "plaintext" | "txt" => Ok(CellStateFormat::Plaintext),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for CellStateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Parse pattern text in whichever format it appears to be
pub fn parse_cell_state(text: &str) -> Result<ParsedPattern, FormatError> {
    CellStateFormat::detect(text).parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::presets;

    #[test]
    fn test_detect() {
        assert_eq!(
            CellStateFormat::detect("!Name: x\n.O\n"),
            CellStateFormat::Plaintext
        );
        assert_eq!(CellStateFormat::detect("OO\nOO\n"), CellStateFormat::Plaintext);
        assert_eq!(
            CellStateFormat::detect("x = 2, y = 2\n2o$2o!"),
            CellStateFormat::RunLengthEncoded
        );
        assert_eq!(
            CellStateFormat::detect("#N Block\n2o$2o!"),
            CellStateFormat::RunLengthEncoded
        );
        assert_eq!(CellStateFormat::detect("2o$2o!"), CellStateFormat::RunLengthEncoded);
    }

    #[test]
    fn test_from_path_extension() {
        assert_eq!(
            CellStateFormat::from_path_extension(Path::new("gun.RLE")),
            Some(CellStateFormat::RunLengthEncoded)
        );
        assert_eq!(
            CellStateFormat::from_path_extension(Path::new("dir/glider.cells")),
            Some(CellStateFormat::Plaintext)
        );
        assert_eq!(CellStateFormat::from_path_extension(Path::new("glider")), None);
    }

    #[test]
    fn test_parse_cell_state_both_formats() {
        let glider = presets::glider().cells;
        assert_eq!(parse_cell_state(".O.\n..O\nOOO").unwrap().cells, glider);
        assert_eq!(parse_cell_state("bo$2bo$3o!").unwrap().cells, glider);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("RLE".parse::<CellStateFormat>(), Ok(CellStateFormat::RunLengthEncoded));
        assert_eq!("cells".parse::<CellStateFormat>(), Ok(CellStateFormat::Plaintext));
        assert!("mc".parse::<CellStateFormat>().is_err());
    }
}
