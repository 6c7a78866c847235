//! Run-length encoded (`.rle`) patterns.
//!
//! ```text
//! #N Glider
//! x = 3, y = 3, rule = B3/S23
//! bo$2bo$3o!
//! ```
//!
//! `b` and `.` are dead runs, `o` and any other letter alive runs, `$` ends
//! a row and `!` ends the pattern. A count before a tag repeats it.

use ca_formats::rle::Rle;

use super::{CellStateFormat, FormatError, ParsedPattern, malformed, to_point};
use crate::domain::{CellState, LifeRule, Point};

/// Encoded lines are wrapped at this width
const MAX_LINE_LEN: usize = 70;

pub fn parse(text: &str) -> Result<ParsedPattern, FormatError> {
    check_extent(text)?;
    let comments = text
        .lines()
        .filter_map(|line| line.trim().strip_prefix('#'))
        .map(str::to_string)
        .collect();

    let rle = Rle::new(text).map_err(malformed(CellStateFormat::RunLengthEncoded))?;
    let rule = match rle.header_data().and_then(|header| header.rule.as_deref()) {
        Some(notation) => Some(
            notation
                .parse::<LifeRule>()
                .map_err(FormatError::InvalidRule)?,
        ),
        None => None,
    };
    let cells = rle
        .map(|cell| {
            let cell = cell.map_err(malformed(CellStateFormat::RunLengthEncoded))?;
            to_point(cell.position)
        })
        .collect::<Result<CellState, FormatError>>()?;

    Ok(ParsedPattern {
        cells,
        rule,
        comments,
    })
}

/// Walks the run counts and rejects any alive run that would end past the
/// `i32` grid, before a single cell is produced.
fn check_extent(text: &str) -> Result<(), FormatError> {
    const LIMIT: i64 = i32::MAX as i64;
    let mut x = 0i64;
    let mut y = 0i64;
    let mut run: Option<i64> = None;
    let mut seen_header = false;

    for (index, line) in text.lines().enumerate() {
        let overflow = FormatError::CoordinateOverflow { line: index + 1 };
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            continue;
        }
        if !seen_header && is_header(trimmed) {
            seen_header = true;
            continue;
        }

        for c in trimmed.chars() {
            match c {
                '0'..='9' => {
                    let digit = i64::from(c as u8 - b'0');
                    let count = run
                        .unwrap_or(0)
                        .checked_mul(10)
                        .and_then(|n| n.checked_add(digit))
                        .ok_or_else(|| overflow.clone())?;
                    run = Some(count);
                }
                '$' => {
                    y = y
                        .checked_add(run.take().unwrap_or(1))
                        .ok_or_else(|| overflow.clone())?;
                    x = 0;
                }
                '!' => return Ok(()),
                'b' | '.' => {
                    x = x
                        .checked_add(run.take().unwrap_or(1))
                        .ok_or_else(|| overflow.clone())?;
                }
                c if c.is_ascii_alphabetic() => {
                    let end = x
                        .checked_add(run.take().unwrap_or(1))
                        .ok_or_else(|| overflow.clone())?;
                    if end - 1 > LIMIT || y > LIMIT {
                        return Err(overflow);
                    }
                    x = end;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// `x = 3, y = 3` style line
pub(super) fn is_header(line: &str) -> bool {
    line.strip_prefix('x')
        .map(|rest| rest.trim_start().starts_with('='))
        .unwrap_or(false)
}

pub fn serialize(state: &CellState, rule: &LifeRule, comments: &[String]) -> String {
    let mut out = String::new();
    for comment in comments {
        out.push('#');
        out.push_str(comment);
        out.push('\n');
    }

    let Some(rect) = state.bounding_box() else {
        out.push_str(&format!("x = 0, y = 0, rule = {}\n!\n", rule.notation()));
        return out;
    };
    out.push_str(&format!(
        "x = {}, y = {}, rule = {}\n",
        rect.width(),
        rect.height(),
        rule.notation()
    ));

    let mut tokens = Vec::new();
    let mut pending_rows = 0u64;
    for y in rect.min.y..=rect.max.y {
        let row: Vec<bool> = (rect.min.x..=rect.max.x)
            .map(|x| state.contains(Point::new(x, y)))
            .collect();
        let Some(last_alive) = row.iter().rposition(|&alive| alive) else {
            pending_rows += 1;
            continue;
        };

        if y != rect.min.y {
            tokens.push(run_token(pending_rows + 1, '$'));
        }
        pending_rows = 0;

        let mut i = 0;
        while i <= last_alive {
            let alive = row[i];
            let len = row[i..=last_alive].iter().take_while(|&&a| a == alive).count();
            tokens.push(run_token(len as u64, if alive { 'o' } else { 'b' }));
            i += len;
        }
    }
    tokens.push("!".to_string());

    let mut line_len = 0;
    for token in tokens {
        if line_len + token.len() > MAX_LINE_LEN {
            out.push('\n');
            line_len = 0;
        }
        line_len += token.len();
        out.push_str(&token);
    }
    out.push('\n');
    out
}

fn run_token(count: u64, tag: char) -> String {
    if count == 1 {
        tag.to_string()
    } else {
        format!("{}{}", count, tag)
    }
}
