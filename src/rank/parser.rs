//! Rank extraction from the index page
//!
//! The index page is a plain HTML table. We do not parse HTML: we find the
//! language's name cell, walk back to the start of its row, and read the first
//! cell of that row, which holds the current rank.

use thiserror::Error;

/// Name cell identifying the Kotlin row
pub const LANGUAGE_MARKER: &str = "<td>Kotlin</td>";

/// Start of a table row whose first cell is the rank
pub const ROW_START: &str = "<tr><td>";

/// End of the rank cell text
const FIELD_END: char = '<';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("language marker {:?} not found", LANGUAGE_MARKER)]
    MarkerNotFound,
    #[error("no row start {:?} before the language marker", ROW_START)]
    RowStartNotFound,
    #[error("rank cell is not terminated")]
    DelimiterNotFound,
    #[error("rank cell {0:?} is not a positive integer")]
    InvalidRank(String),
}

/// Locate the text of the rank cell in the row containing the language marker.
pub fn find_rank_field(document: &str) -> Result<&str, ParseError> {
    let marker = document
        .find(LANGUAGE_MARKER)
        .ok_or(ParseError::MarkerNotFound)?;

    // A row start beginning at the marker itself still counts, so the search
    // window extends into the marker. The marker is ASCII and longer than
    // ROW_START, so the cut is in bounds and on a char boundary.
    let row = document[..marker + ROW_START.len()]
        .rfind(ROW_START)
        .ok_or(ParseError::RowStartNotFound)?;

    let field_start = row + ROW_START.len();
    let field_len = document[field_start..]
        .find(FIELD_END)
        .ok_or(ParseError::DelimiterNotFound)?;

    Ok(&document[field_start..field_start + field_len])
}

/// Extract the language's rank from the index page.
pub fn parse_rank(document: &str) -> Result<u32, ParseError> {
    let field = find_rank_field(document)?;
    match field.parse::<u32>() {
        Ok(rank) if rank > 0 => Ok(rank),
        _ => Err(ParseError::InvalidRank(field.to_string())),
    }
}
