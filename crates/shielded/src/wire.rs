//! Little-endian wire helpers shared by every encodable type.
//!
//! Encoding appends to a `Vec<u8>`. Decoding is a set of `nom` parsers over
//! complete input; [`finish`] turns a parser into a whole-buffer decoder that
//! rejects trailing bytes.

use nom::{
    Err as ParseFailure, IResult,
    bytes::complete::take,
    error::{Error as ParseError, ErrorKind},
};

use crate::error::{Result, TransactionError};

/// Parser result over a byte slice.
pub(crate) type ParseResult<'input, T> = IResult<&'input [u8], T>;

/// Take exactly `N` bytes as an array.
pub(crate) fn array<const N: usize>(input: &[u8]) -> ParseResult<'_, [u8; N]> {
    let (rem, bytes) = take(N)(input)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok((rem, out))
}

/// Lift a decoding failure into a parse error at `input`.
pub(crate) const fn reject<T>(input: &[u8]) -> ParseResult<'_, T> {
    Err(ParseFailure::Failure(ParseError {
        input,
        code: ErrorKind::Verify,
    }))
}

/// Run `parser` over all of `input`.
///
/// Truncated input, a failed field check, or leftover bytes are all
/// [`TransactionError::Malformed`] with `what` as context.
pub(crate) fn finish<'input, T>(
    input: &'input [u8],
    what: &'static str,
    parser: impl FnOnce(&'input [u8]) -> ParseResult<'input, T>,
) -> Result<T> {
    match parser(input) {
        Ok((rem, value)) if rem.is_empty() => Ok(value),
        Ok(_) => Err(TransactionError::Malformed("trailing bytes")),
        Err(_err) => Err(TransactionError::Malformed(what)),
    }
}
