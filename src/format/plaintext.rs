//! Plaintext (`.cells`) patterns: `!` comment lines, `O` for alive and
//! `.` for dead, one text line per grid row.

use ca_formats::plaintext::Plaintext;

use super::{CellStateFormat, FormatError, ParsedPattern, malformed, to_point};
use crate::domain::{CellState, Point};

pub fn parse(text: &str) -> Result<ParsedPattern, FormatError> {
    let comments = text
        .lines()
        .filter_map(|line| line.strip_prefix('!'))
        .map(|comment| comment.trim().to_string())
        .collect();

    let cells = Plaintext::new(text)
        .map_err(malformed(CellStateFormat::Plaintext))?
        .map(|cell| {
            let cell = cell.map_err(malformed(CellStateFormat::Plaintext))?;
            to_point(cell)
        })
        .collect::<Result<CellState, FormatError>>()?;

    Ok(ParsedPattern {
        cells,
        rule: None,
        comments,
    })
}

/// Rows of the bounding box, normalized to the origin.
/// Trailing dead cells on each row are left out; an empty row is a lone `.`.
pub fn serialize(state: &CellState, comments: &[String]) -> String {
    let mut out = String::new();
    for comment in comments {
        out.push('!');
        out.push_str(comment);
        out.push('\n');
    }

    let Some(rect) = state.bounding_box() else {
        return out;
    };
    for y in rect.min.y..=rect.max.y {
        let mut row: String = (rect.min.x..=rect.max.x)
            .map(|x| if state.contains(Point::new(x, y)) { 'O' } else { '.' })
            .collect();
        row.truncate(row.trim_end_matches('.').len().max(1));
        out.push_str(&row);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::presets;

    #[test]
    fn test_parse_glider() {
        let text = "!Name: Glider\n!\n.O.\n..O\nOOO\n";
        let parsed = parse(text).unwrap();
        assert_eq!(parsed.cells, presets::glider().cells);
        assert_eq!(parsed.comments, vec!["Name: Glider".to_string(), String::new()]);
        assert!(parsed.rule.is_none());
    }

    #[test]
    fn test_dead_rows_count() {
        let parsed = parse("O\n.\nO").unwrap();
        assert_eq!(parsed.cells, CellState::from_coords(&[(0, 0), (0, 2)]));
    }

    #[test]
    fn test_rejects_unknown_characters() {
        assert!(matches!(
            parse("!comment\n.O.\n.X.\n"),
            Err(FormatError::Malformed {
                format: CellStateFormat::Plaintext,
                ..
            })
        ));
    }

    #[test]
    fn test_serialize_marks_empty_rows() {
        let state = CellState::from_coords(&[(0, 0), (0, 2)]);
        assert_eq!(serialize(&state, &[]), "O\n.\nO\n");
        assert_eq!(parse(&serialize(&state, &[])).unwrap().cells, state);
    }

    #[test]
    fn test_serialize_trims_and_normalizes() {
        let state = CellState::from_coords(&[(10, 10), (12, 11)]);
        assert_eq!(serialize(&state, &[]), "O\n..O\n");

        let comments = vec!["Name: Pair".to_string()];
        assert_eq!(serialize(&state, &comments), "!Name: Pair\nO\n..O\n");
    }

    #[test]
    fn test_serialized_presets_parse_back() {
        for pattern in presets::all_patterns() {
            let text = serialize(&pattern.cells, &[]);
            assert_eq!(
                parse(&text).unwrap().cells,
                pattern.cells.normalized(),
                "{}",
                pattern.name
            );
        }
    }
}
