//! Parser for the nginx stub status page.
//!
//! The page is a rigid four-line layout:
//!
//! ```text
//! Active connections: 291
//! server accepts handled requests
//!  16630948 16630948 31070465
//! Reading: 6 Writing: 179 Waiting: 106
//! ```
//!
//! Tokens are separated by ASCII whitespace. Labels must match exactly and
//! every line must carry exactly its expected tokens; anything else fails the
//! whole parse.

use crate::error::ParseError;
use std::fmt;

const LINE_COUNT: usize = 4;

/// Connection counters reported by one stub status page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StubStatus {
    /// Currently open client connections, including waiting ones
    pub active: u64,
    /// Accepted client connections since start
    pub accepted: u64,
    /// Handled client connections since start
    pub handled: u64,
    /// Client requests since start
    pub requests: u64,
    /// Connections reading the request header
    pub reading: u64,
    /// Connections writing the response
    pub writing: u64,
    /// Idle keep-alive connections
    pub waiting: u64,
}

impl fmt::Display for StubStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Active connections: {}", self.active)?;
        writeln!(f, "server accepts handled requests")?;
        writeln!(f, "{} {} {}", self.accepted, self.handled, self.requests)?;
        writeln!(
            f,
            "Reading: {} Writing: {} Waiting: {}",
            self.reading, self.writing, self.waiting
        )
    }
}

/// Parse a raw status body.
pub fn parse(body: &[u8]) -> Result<StubStatus, ParseError> {
    let text = std::str::from_utf8(body).map_err(|_| ParseError::Utf8)?;
    let text = text.strip_suffix('\n').unwrap_or(text);

    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.len() != LINE_COUNT {
        return Err(ParseError::LineCount {
            expected: LINE_COUNT,
            found: lines.len(),
        });
    }

    let active = tokens(lines[0], 1, 3)?;
    expect_token(&active, 0, 1, "Active")?;
    expect_token(&active, 1, 1, "connections:")?;
    let active = number(active[2], 1)?;

    let header = tokens(lines[1], 2, 4)?;
    expect_token(&header, 0, 2, "server")?;
    expect_token(&header, 1, 2, "accepts")?;
    expect_token(&header, 2, 2, "handled")?;
    expect_token(&header, 3, 2, "requests")?;

    let totals = tokens(lines[2], 3, 3)?;
    let accepted = number(totals[0], 3)?;
    let handled = number(totals[1], 3)?;
    let requests = number(totals[2], 3)?;

    let states = tokens(lines[3], 4, 6)?;
    expect_token(&states, 0, 4, "Reading:")?;
    expect_token(&states, 2, 4, "Writing:")?;
    expect_token(&states, 4, 4, "Waiting:")?;

    Ok(StubStatus {
        active,
        accepted,
        handled,
        requests,
        reading: number(states[1], 4)?,
        writing: number(states[3], 4)?,
        waiting: number(states[5], 4)?,
    })
}

fn tokens(line: &str, line_no: usize, expected: usize) -> Result<Vec<&str>, ParseError> {
    let tokens: Vec<&str> = line.split_ascii_whitespace().collect();
    if tokens.len() != expected {
        return Err(ParseError::TokenCount {
            line: line_no,
            expected,
            found: tokens.len(),
        });
    }
    Ok(tokens)
}

fn expect_token(
    tokens: &[&str],
    index: usize,
    line_no: usize,
    expected: &'static str,
) -> Result<(), ParseError> {
    if tokens[index] == expected {
        Ok(())
    } else {
        Err(ParseError::UnexpectedToken {
            line: line_no,
            expected,
            found: tokens[index].to_string(),
        })
    }
}

fn number(token: &str, line_no: usize) -> Result<u64, ParseError> {
    let invalid = || ParseError::InvalidNumber {
        line: line_no,
        token: token.to_string(),
    };
    // u64::from_str accepts a leading '+'
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    token.parse().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NGINX_BODY: &str = "Active connections: 291 \n\
                              server accepts handled requests\n \
                              16630948 16630948 31070465 \n\
                              Reading: 6 Writing: 179 Waiting: 106 \n";

    #[test]
    fn test_parse_real_nginx_output() {
        let status = parse(NGINX_BODY.as_bytes()).unwrap();
        assert_eq!(
            status,
            StubStatus {
                active: 291,
                accepted: 16630948,
                handled: 16630948,
                requests: 31070465,
                reading: 6,
                writing: 179,
                waiting: 106,
            }
        );
    }

    #[test]
    fn test_parse_reference_values() {
        let body = "Active connections: 5\n\
                    server accepts handled requests\n\
                    100 100 200\n\
                    Reading: 1 Writing: 2 Waiting: 3\n";
        let status = parse(body.as_bytes()).unwrap();
        assert_eq!(status.active, 5);
        assert_eq!(status.accepted, 100);
        assert_eq!(status.handled, 100);
        assert_eq!(status.requests, 200);
        assert_eq!(status.reading, 1);
        assert_eq!(status.writing, 2);
        assert_eq!(status.waiting, 3);
    }

    #[test]
    fn test_parse_without_trailing_newline_and_crlf() {
        let body = "Active connections: 1\r\n\
                    server accepts handled requests\r\n\
                    2 3 4\r\n\
                    Reading: 0 Writing: 1 Waiting: 0";
        let status = parse(body.as_bytes()).unwrap();
        assert_eq!(status.requests, 4);
        assert_eq!(status.writing, 1);
    }

    #[test]
    fn test_display_reparses_to_same_values() {
        let status = StubStatus {
            active: 7,
            accepted: u64::MAX,
            handled: 0,
            requests: 123456789,
            reading: 3,
            writing: 2,
            waiting: 1,
        };
        assert_eq!(parse(status.to_string().as_bytes()).unwrap(), status);
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(
            parse(b"").unwrap_err(),
            ParseError::LineCount {
                expected: 4,
                found: 1
            }
        );
    }

    #[test]
    fn test_truncated_body() {
        let body = "Active connections: 5\nserver accepts handled requests\n100 100 200\n";
        assert!(matches!(
            parse(body.as_bytes()),
            Err(ParseError::LineCount { found: 3, .. })
        ));
    }

    #[test]
    fn test_extra_line() {
        let body = "Active connections: 5\n\
                    server accepts handled requests\n\
                    100 100 200\n\
                    Reading: 1 Writing: 2 Waiting: 3\n\n";
        assert!(matches!(
            parse(body.as_bytes()),
            Err(ParseError::LineCount { found: 5, .. })
        ));
    }

    #[test]
    fn test_non_numeric_token() {
        let body = "Active connections: five\n\
                    server accepts handled requests\n\
                    100 100 200\n\
                    Reading: 1 Writing: 2 Waiting: 3\n";
        assert_eq!(
            parse(body.as_bytes()).unwrap_err(),
            ParseError::InvalidNumber {
                line: 1,
                token: "five".to_string()
            }
        );
    }

    #[test]
    fn test_signed_and_overflowing_numbers_rejected() {
        let signed = "Active connections: +5\n\
                      server accepts handled requests\n\
                      100 100 200\n\
                      Reading: 1 Writing: 2 Waiting: 3\n";
        assert!(matches!(
            parse(signed.as_bytes()),
            Err(ParseError::InvalidNumber { line: 1, .. })
        ));

        let overflow = "Active connections: 5\n\
                        server accepts handled requests\n\
                        100 100 99999999999999999999999\n\
                        Reading: 1 Writing: 2 Waiting: 3\n";
        assert!(matches!(
            parse(overflow.as_bytes()),
            Err(ParseError::InvalidNumber { line: 3, .. })
        ));
    }

    #[test]
    fn test_missing_counter() {
        let body = "Active connections: 5\n\
                    server accepts handled requests\n\
                    100 100\n\
                    Reading: 1 Writing: 2 Waiting: 3\n";
        assert_eq!(
            parse(body.as_bytes()).unwrap_err(),
            ParseError::TokenCount {
                line: 3,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_reordered_labels_rejected() {
        let body = "Active connections: 5\n\
                    server accepts handled requests\n\
                    100 100 200\n\
                    Writing: 2 Reading: 1 Waiting: 3\n";
        assert!(matches!(
            parse(body.as_bytes()),
            Err(ParseError::UnexpectedToken {
                line: 4,
                expected: "Reading:",
                ..
            })
        ));
    }

    #[test]
    fn test_wrong_header_line() {
        let body = "Active connections: 5\n\
                    server accepts requests handled\n\
                    100 100 200\n\
                    Reading: 1 Writing: 2 Waiting: 3\n";
        assert!(matches!(
            parse(body.as_bytes()),
            Err(ParseError::UnexpectedToken { line: 2, .. })
        ));
    }

    #[test]
    fn test_html_error_page() {
        let body = "<html><body><h1>502 Bad Gateway</h1></body></html>";
        assert!(parse(body.as_bytes()).is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(parse(&[0xff, 0xfe, 0x00]).unwrap_err(), ParseError::Utf8);
    }
}
