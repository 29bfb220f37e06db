use std::str::FromStr;

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected end of file, expected '{exp}'")]
    UnexpectedEof { exp: char },

    #[error("Expected '{exp}', but got '{got}'")]
    UnexpectedToken { exp: char, got: char },

    #[error("Expected a number, but got \"{got}\"")]
    NotANumber { got: String },
}

/// Takes the next byte from the slice. If there is none, the slice is left as-is.
pub const fn take_1(bytes: &[u8]) -> (Option<u8>, &[u8]) {
    let [b, bytes @ ..] = bytes else {
        return (None, bytes);
    };

    (Some(*b), bytes)
}

/// Like `take_1`, but doesn't consume the byte
pub fn peek_1(bytes: &[u8]) -> Option<u8> {
    let [b, ..] = bytes else { return None };

    Some(*b)
}

/// Consumes ascii whitespace, line breaks included.
pub fn take_ws(bytes: &[u8]) -> &[u8] {
    let i = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());

    &bytes[i..]
}

/// Consumes spaces and tabs only, stopping at a line break.
pub fn take_blank(bytes: &[u8]) -> &[u8] {
    let i = bytes
        .iter()
        .position(|&b| b != b' ' && b != b'\t')
        .unwrap_or(bytes.len());

    &bytes[i..]
}

/// Expects the next byte in `bytes` to be `b`.
pub fn expect(b: u8, bytes: &[u8]) -> ParseResult<&[u8]> {
    let (Some(a), bytes) = take_1(bytes) else {
        return Err(ParseError::UnexpectedEof { exp: b as char });
    };

    if a != b {
        return Err(ParseError::UnexpectedToken {
            exp: b as char,
            got: a as char,
        });
    }

    Ok(bytes)
}

/// Splits off the longest prefix whose bytes all satisfy `P`. Returns `None` if that prefix is
/// empty.
pub fn take_while_fn<P>(p: P, bytes: &[u8]) -> (Option<&[u8]>, &[u8])
where
    P: Fn(u8) -> bool,
{
    let i = bytes.iter().position(|&b| !p(b)).unwrap_or(bytes.len());

    if i == 0 {
        return (None, bytes);
    }

    let (res, bytes) = bytes.split_at(i);

    (Some(res), bytes)
}

/// Takes the rest of the current line, consuming the line break (`\n` or `\r\n`) but not
/// returning it. The last line of the input need not end in a line break.
pub fn take_line(bytes: &[u8]) -> (&[u8], &[u8]) {
    let (line, rest) = match bytes.iter().position(|&b| b == b'\n') {
        Some(i) => (&bytes[..i], &bytes[i + 1..]),
        None => (bytes, &bytes[bytes.len()..]),
    };

    let line = line.strip_suffix(b"\r").unwrap_or(line);

    (line, rest)
}

/// Reads an optionally negative decimal integer.
pub fn take_number<T: FromStr>(bytes: &[u8]) -> ParseResult<(T, &[u8])> {
    let sign = match peek_1(bytes) {
        Some(b'-') => 1,
        _ => 0,
    };

    let (digits, _) = take_while_fn(|b| b.is_ascii_digit(), &bytes[sign..]);
    let n = sign + digits.map_or(0, <[u8]>::len);

    let (num, rest) = bytes.split_at(n);

    let Some(res) = convert(num) else {
        let got = &bytes[..bytes.len().min(8)];

        return Err(ParseError::NotANumber {
            got: String::from_utf8_lossy(got).to_string(),
        });
    };

    Ok((res, rest))
}

/// Converts `&[u8]` to `T` if `T: FromStr`.
pub fn convert<T: FromStr>(bytes: &[u8]) -> Option<T> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}
