use thiserror::Error;
use tracing::debug;
use tracing::warn;

use crate::Offset;
use crate::parse_util;
use crate::parse_util::ParseError;

/// Metadata read from an RLE file. Live cells are handed to the callback of [`read_rle`] instead
/// of being collected here.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RleFile<'a> {
    pub name: Option<&'a [u8]>,
    pub author: Option<&'a [u8]>,

    /// Added to every cell, from a `#P` or `#R` line
    pub offset: Option<(Offset, Offset)>,

    /// Bounding box declared by the header line
    pub size: Option<(Offset, Offset)>,
}

#[derive(Debug, Error)]
pub enum RleError {
    #[error("Comment line error: {0}")]
    CommentLine(#[from] RleCommentLineError),

    #[error("Header line error: {0}")]
    HeaderLine(#[from] RleHeaderLineError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] RleEncodingError),
}

/// Only Life itself can be simulated, so any other rule is refused.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported rule \"{rule}\", only B3/S23 is available")]
pub struct UnsupportedRule {
    pub rule: String,
}

/// Parse the RLE file format, calling `f(x, y)` for every live cell. Row `y` grows downward.
///
/// See: https://conwaylife.com/wiki/Run_Length_Encoded
pub fn read_rle<F>(mut bytes: &'_ [u8], f: F) -> Result<RleFile<'_>, RleError>
where
    F: FnMut(Offset, Offset),
{
    let mut file = RleFile::default();

    // Parse as many comment lines as possible
    loop {
        let (line, rest) = read_line_comment(parse_util::take_ws(bytes))?;
        let Some(line) = line else { break };

        match line {
            RleCommentLine::Comment => {}
            RleCommentLine::Name { name } => {
                if file.name.is_some() {
                    warn!("RLE file name already defined. Using latest");
                }

                file.name = Some(name);
            }
            RleCommentLine::Author { author } => {
                if file.author.is_some() {
                    warn!("RLE author already defined. Using latest");
                }

                file.author = Some(author);
            }
            RleCommentLine::Offset { x, y } => {
                if file.offset.is_some() {
                    warn!("RLE offset already defined. Using latest");
                }

                file.offset = Some((x, y));
            }
            RleCommentLine::Rule => {}
        }

        bytes = rest;
    }

    bytes = parse_util::take_ws(bytes);

    // Parse header line, if it's present
    if let Some(b'x') = parse_util::peek_1(bytes) {
        let (RleHeaderLine { x, y }, rest) = read_line_header(bytes)?;

        file.size = Some((x, y));
        bytes = rest;
    }

    let count = read_encoding(bytes, file.offset.unwrap_or_default(), file.size, f)?;

    debug!(
        name = ?file.name.map(String::from_utf8_lossy),
        cells = count,
        "Read RLE pattern"
    );

    Ok(file)
}

enum RleCommentLine<'a> {
    Comment,
    Name { name: &'a [u8] },
    Author { author: &'a [u8] },
    Offset { x: Offset, y: Offset },
    Rule,
}

#[derive(Debug, Error)]
pub enum RleCommentLineError {
    #[error("No comment type")]
    NoType,

    #[error("Empty name line")]
    EmptyName,

    #[error("Empty author line")]
    EmptyAuthor,

    #[error("Invalid offset: {0}")]
    InvalidOffset(#[from] ParseError),

    #[error("{0}")]
    Rule(#[from] UnsupportedRule),

    #[error("Invalid comment type, found '{got}'")]
    InvalidType { got: char },
}

/// Attempt to parse a comment line, otherwise leaves `bytes` as-is.
fn read_line_comment(
    bytes: &'_ [u8],
) -> Result<(Option<RleCommentLine<'_>>, &'_ [u8]), RleCommentLineError> {
    let Ok(bytes) = parse_util::expect(b'#', bytes) else {
        return Ok((None, bytes));
    };

    let (Some(b), bytes) = parse_util::take_1(bytes) else {
        return Err(RleCommentLineError::NoType);
    };

    match b {
        // Comment line
        b'C' | b'c' => {
            let (_, bytes) = parse_util::take_line(bytes);

            Ok((Some(RleCommentLine::Comment), bytes))
        }

        // Pattern name
        b'N' => {
            let (name, bytes) = parse_util::take_line(parse_util::take_blank(bytes));
            if name.is_empty() {
                return Err(RleCommentLineError::EmptyName);
            }

            Ok((Some(RleCommentLine::Name { name }), bytes))
        }

        // Pattern author
        b'O' => {
            let (author, bytes) = parse_util::take_line(parse_util::take_blank(bytes));
            if author.is_empty() {
                return Err(RleCommentLineError::EmptyAuthor);
            }

            Ok((Some(RleCommentLine::Author { author }), bytes))
        }

        // Pattern offset
        b'P' | b'R' => {
            let (x, bytes) = parse_util::take_number(parse_util::take_blank(bytes))?;
            let (y, bytes) = parse_util::take_number(parse_util::take_blank(bytes))?;
            let (_, bytes) = parse_util::take_line(bytes);

            Ok((Some(RleCommentLine::Offset { x, y }), bytes))
        }

        // Pattern rule, written as 23/3
        b'r' => {
            let (rule, bytes) = parse_util::take_line(parse_util::take_blank(bytes));
            check_rule(rule)?;

            Ok((Some(RleCommentLine::Rule), bytes))
        }

        b => Err(RleCommentLineError::InvalidType { got: b as char }),
    }
}

struct RleHeaderLine {
    x: Offset,
    y: Offset,
}

#[derive(Debug, Error)]
pub enum RleHeaderLineError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Invalid token: expected ',' or '\\n', found '{got}'")]
    InvalidToken { got: char },

    #[error("{0}")]
    Rule(#[from] UnsupportedRule),
}

/// Parse `x = m, y = n` with an optional trailing `, rule = B3/S23`.
fn read_line_header(bytes: &[u8]) -> Result<(RleHeaderLine, &[u8]), RleHeaderLineError> {
    let (x, bytes) = read_assignment(b'x', bytes)?;

    let bytes = parse_util::expect(b',', parse_util::take_blank(bytes))?;
    let (y, bytes) = read_assignment(b'y', parse_util::take_blank(bytes))?;

    let (line, bytes) = parse_util::take_line(parse_util::take_blank(bytes));

    match parse_util::take_1(line) {
        (None, _) => {}
        (Some(b','), rule) => {
            let rule = strip_word(b"rule", parse_util::take_blank(rule))?;
            let rule = parse_util::expect(b'=', parse_util::take_blank(rule))?;

            check_rule(rule)?;
        }
        (Some(b), _) => return Err(RleHeaderLineError::InvalidToken { got: b as char }),
    }

    Ok((RleHeaderLine { x, y }, bytes))
}

/// Parse `name = number`
fn read_assignment(name: u8, bytes: &[u8]) -> Result<(Offset, &[u8]), ParseError> {
    let bytes = parse_util::expect(name, bytes)?;
    let bytes = parse_util::expect(b'=', parse_util::take_blank(bytes))?;

    parse_util::take_number(parse_util::take_blank(bytes))
}

fn strip_word<'a>(word: &[u8], bytes: &'a [u8]) -> Result<&'a [u8], ParseError> {
    word.iter().try_fold(bytes, |bytes, &b| parse_util::expect(b, bytes))
}

/// Accepts B3/S23 in either the `B3/S23` or the older `23/3` notation.
fn check_rule(rule: &[u8]) -> Result<(), UnsupportedRule> {
    let rule = rule.trim_ascii().to_ascii_lowercase();

    match rule.as_slice() {
        b"b3/s23" | b"23/3" => Ok(()),
        _ => Err(UnsupportedRule {
            rule: String::from_utf8_lossy(&rule).to_string(),
        }),
    }
}

#[derive(Debug, Error)]
pub enum RleEncodingError {
    #[error("Unexpected EOF, patterns end with '!'")]
    UnexpectedEof,

    #[error("Failed to convert run length: {0}")]
    RunLength(#[source] ParseError),

    #[error("Unrecognized byte: 0x{got:0X}")]
    UnrecognizedByte { got: u8 },

    #[error("Cell coordinates overflow")]
    Overflow,

    #[error("Cell ({x}, {y}) lies outside of the {width}x{height} box declared by the header")]
    OutsideHeader {
        x: Offset,
        y: Offset,
        width: Offset,
        height: Offset,
    },
}

/// Decode the pattern body, returning the number of live cells reported.
///
/// When the header declared a bounding box, a live run leaving it is rejected before any of its
/// cells reach `f`.
fn read_encoding<F>(
    mut bytes: &[u8],
    (dx, dy): (Offset, Offset),
    size: Option<(Offset, Offset)>,
    mut f: F,
) -> Result<usize, RleEncodingError>
where
    F: FnMut(Offset, Offset),
{
    let mut rep: Offset = 1;
    let mut count = 0;

    let (mut x, mut y): (Offset, Offset) = (0, 0);

    loop {
        let Some(b) = parse_util::peek_1(bytes) else {
            return Err(RleEncodingError::UnexpectedEof);
        };

        match b {
            // End of input
            b'!' => break,

            // Dead cells
            b'b' => {
                x = x.checked_add(rep).ok_or(RleEncodingError::Overflow)?;
                rep = 1;
            }

            // Live cells
            b'o' => {
                let end = x.checked_add(rep).ok_or(RleEncodingError::Overflow)?;

                if let Some((width, height)) = size {
                    if end > width || y >= height {
                        return Err(RleEncodingError::OutsideHeader {
                            x: if y >= height { x } else { x.max(width) },
                            y,
                            width,
                            height,
                        });
                    }
                }

                let (Some(ax), Some(ay)) = (dx.checked_add(x), dy.checked_add(y)) else {
                    return Err(RleEncodingError::Overflow);
                };

                // The last cell of the run must be representable too
                if rep > 0 && ax.checked_add(rep - 1).is_none() {
                    return Err(RleEncodingError::Overflow);
                }

                for i in 0..rep {
                    f(ax + i, ay);
                }

                count += rep as usize;
                x = end;
                rep = 1;
            }

            // End of row(s)
            b'$' => {
                y = y.checked_add(rep).ok_or(RleEncodingError::Overflow)?;
                x = 0;
                rep = 1;
            }

            n if n.is_ascii_digit() => {
                let (n, rest) =
                    parse_util::take_number(bytes).map_err(RleEncodingError::RunLength)?;

                rep = n;
                bytes = rest;

                continue;
            }

            w if w.is_ascii_whitespace() => {}

            b => return Err(RleEncodingError::UnrecognizedByte { got: b }),
        }

        let (_, rest) = parse_util::take_1(bytes);
        bytes = rest;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::RleEncodingError;
    use super::RleError;
    use super::RleHeaderLineError;

    fn cells(bytes: &[u8]) -> Vec<(i64, i64)> {
        let mut cells = Vec::new();
        super::read_rle(bytes, |x, y| cells.push((x, y))).unwrap();

        cells
    }

    #[test]
    fn read_header() {
        let bytes = b"x = 3, y = 2, rule = B3/S23\nbo!";
        let (header, rest) = super::read_line_header(bytes).unwrap();

        assert_eq!((header.x, header.y), (3, 2));
        assert_eq!(rest, b"bo!");
    }

    #[test]
    fn header_without_rule() {
        let (header, _) = super::read_line_header(b"x=12,y=7\r\n!").unwrap();

        assert_eq!((header.x, header.y), (12, 7));
    }

    #[test]
    fn glider() {
        let bytes = b"#N Glider\nx = 3, y = 3, rule = B3/S23\nbob$2bo$3o!\n";

        assert_eq!(cells(bytes), vec![(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    fn offset_and_blank_rows() {
        let bytes = b"#P 4 -1\no2$o!";

        assert_eq!(cells(bytes), vec![(4, -1), (4, 1)]);
    }

    #[test]
    fn run_lengths_span_line_breaks() {
        let bytes = b"x = 12, y = 1\n10b\n2o!";

        assert_eq!(cells(bytes), vec![(10, 0), (11, 0)]);
    }

    #[test]
    fn rejects_other_rules() {
        let err = super::read_rle(b"x = 1, y = 1, rule = B36/S23\no!", |_, _| {}).unwrap_err();

        assert!(matches!(
            err,
            RleError::HeaderLine(RleHeaderLineError::Rule(_))
        ));

        let err = super::read_rle(b"#r 34/34\no!", |_, _| {}).unwrap_err();
        assert!(matches!(err, RleError::CommentLine(_)));
    }

    #[test]
    fn accepts_nameless_life_rule() {
        assert_eq!(cells(b"#r 23/3\n2o!"), vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn missing_terminator() {
        let err = super::read_rle(b"x = 2, y = 1\n2o", |_, _| {}).unwrap_err();

        assert!(matches!(err, RleError::Encoding(_)));
    }

    #[test]
    fn unknown_byte() {
        let err = super::read_rle(b"2oA!", |_, _| {}).unwrap_err();

        assert!(err.to_string().contains("0x41"));
    }

    #[test]
    fn coordinates_that_overflow() {
        let inputs: [&[u8]; 4] = [
            b"9223372036854775807b2o!",
            b"#P 9223372036854775807 0\n2o!",
            b"#P 0 9223372036854775807\n$o!",
            b"9223372036854775807$2$o!",
        ];

        for bytes in inputs {
            let mut calls = 0;
            let err = super::read_rle(bytes, |_, _| calls += 1).unwrap_err();

            assert!(
                matches!(err, RleError::Encoding(RleEncodingError::Overflow)),
                "{err}"
            );
            assert_eq!(calls, 0);
        }
    }

    #[test]
    fn runs_must_stay_inside_the_header_box() {
        let mut calls = 0;
        let err = super::read_rle(b"x = 3, y = 1\n999999999999o!", |_, _| calls += 1)
            .unwrap_err();

        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::OutsideHeader {
                x: 3,
                y: 0,
                width: 3,
                height: 1
            })
        ));
        assert_eq!(calls, 0);

        let err = super::read_rle(b"x = 2, y = 1\n2o$o!", |_, _| {}).unwrap_err();
        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::OutsideHeader { x: 0, y: 1, .. })
        ));
    }

    #[test]
    fn trailing_dead_cells_may_leave_the_header_box() {
        assert_eq!(cells(b"x = 2, y = 1\n2o5b!"), vec![(0, 0), (1, 0)]);
    }
}
