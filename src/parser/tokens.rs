//! Small token scanners for strings embedded in condition and join input.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_till1},
    character::complete::{char, multispace1},
    sequence::{delimited, separated_pair},
    IResult,
};

/// Parse a symbolic comparison operator.
fn symbolic_comparison(input: &str) -> IResult<&str, &str> {
    alt((
        tag("<=>"),
        tag("!="),
        tag("<>"),
        tag(">="),
        tag("<="),
        tag("="),
        tag("<"),
        tag(">"),
    ))(input)
}

/// Parse a keyword comparison surrounded by whitespace (` LIKE `, ` IS `, ...).
fn keyword_comparison(input: &str) -> IResult<&str, &str> {
    delimited(
        multispace1,
        alt((
            tag_no_case("LIKE"),
            tag_no_case("BETWEEN"),
            tag_no_case("IS"),
            tag_no_case("IN"),
        )),
        multispace1,
    )(input)
}

/// Whether `input` contains a comparison token anywhere.
///
/// Used to tell a literal `on` expression (`a.id = b.a_id`) apart from a
/// bare column shorthand (`a_id`).
pub fn has_comparison(input: &str) -> bool {
    input
        .char_indices()
        .any(|(i, _)| alt((symbolic_comparison, keyword_comparison))(&input[i..]).is_ok())
}

/// Parse `table.column`.
fn qualified(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        take_till1(|c: char| c == '.'),
        char('.'),
        take_till1(|c: char| c == '.'),
    )(input)
}

/// Split a qualified reference into `(table, column)`.
///
/// Segments after the second are ignored.
pub fn split_qualified(input: &str) -> Option<(&str, &str)> {
    qualified(input).ok().map(|(_, parts)| parts)
}
