//! Nom-based IRC line grammar.
//!
//! ```text
//! [':' prefix SPACE] verb *(SPACE middle) [SPACE ':' trailing]
//! ```
//!
//! `verb` is one or more ASCII letters or exactly three digits. A `middle`
//! parameter is a run of non-space characters that does not begin with `:`.
//! It may begin with `!` only when a letter or digit follows, as in an
//! RFC 2812 safe channel (`!ABCDEchan`). The trailing parameter runs to the
//! end of the line and may contain spaces. Anything left over after these
//! productions is a parse error.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1, take_while_m_n},
    character::complete::{alpha1, char, satisfy},
    combinator::{eof, opt, peek, recognize, rest},
    error::{context, VerboseError, VerboseErrorKind},
    multi::many0,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

use crate::error::MessageParseError;

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

/// One or more literal spaces. Tabs are not separators on the wire.
fn spaces(input: &str) -> ParseResult<&str, &str> {
    take_while1(|c| c == ' ')(input)
}

/// Parse message prefix (the part after `:` and before the first space).
fn parse_prefix(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing message prefix",
        terminated(preceded(char(':'), take_while1(|c| c != ' ')), spaces),
    )(input)
}

/// Parse the verb: letters, or a three-digit numeric reply.
fn parse_verb(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing IRC verb",
        terminated(
            alt((take_while_m_n(3, 3, |c: char| c.is_ascii_digit()), alpha1)),
            peek(alt((spaces, eof))),
        ),
    )(input)
}

fn parse_middle(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing middle parameter",
        alt((
            recognize(pair(
                satisfy(|c| c != ' ' && c != ':' && c != '!'),
                take_while(|c| c != ' '),
            )),
            recognize(tuple((
                char('!'),
                satisfy(|c| c.is_alphanumeric()),
                take_while(|c| c != ' '),
            ))),
        )),
    )(input)
}

fn parse_trailing(input: &str) -> ParseResult<&str, &str> {
    context("parsing trailing parameter", preceded(char(':'), rest))(input)
}

/// Parse a complete IRC line into its components.
pub fn parse_message(input: &str) -> ParseResult<&str, ParsedMessage<'_>> {
    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, verb) = parse_verb(input)?;
    let (input, mut params) = many0(preceded(spaces, parse_middle))(input)?;
    let (input, trailing) = opt(preceded(spaces, parse_trailing))(input)?;
    let (input, _) = context(
        "expecting end of line",
        terminated(take_while(|c| c == ' '), eof),
    )(input)?;

    params.extend(trailing);

    Ok((
        input,
        ParsedMessage {
            prefix,
            verb,
            params,
        },
    ))
}

/// A parsed IRC line with borrowed string slices.
///
/// This is the intermediate representation produced by the nom parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage<'a> {
    /// Raw prefix string (without the leading `:`), if present.
    pub prefix: Option<&'a str>,
    /// The verb exactly as it appeared on the wire.
    pub verb: &'a str,
    /// Middle parameters followed by the trailing parameter, if any.
    pub params: Vec<&'a str>,
}

impl<'a> ParsedMessage<'a> {
    /// Parse one line (without its CRLF terminator).
    pub fn parse(input: &'a str) -> Result<Self, MessageParseError> {
        match parse_message(input) {
            Ok((_remaining, msg)) => Ok(msg),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                // Report the innermost context that failed
                let mut context_info = "parsing IRC line";
                let mut position = input.len();

                for (error_input, error_kind) in &e.errors {
                    position = input.len() - error_input.len();
                    if let VerboseErrorKind::Context(ctx) = error_kind {
                        context_info = ctx;
                        break;
                    }
                }

                Err(MessageParseError::ParseContext {
                    position,
                    context: context_info.to_string(),
                })
            }
            Err(nom::Err::Incomplete(_)) => Err(MessageParseError::ParseContext {
                position: input.len(),
                context: "incomplete input".to_string(),
            }),
        }
    }
}
