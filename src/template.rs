//! Line and token level scanning of Markdown templates.
//!
//! Two independent views of the same text:
//!
//! - [`parse_headers`] walks lines and extracts ATX headers (`#` … `######`)
//!   with their level and 1-based line number. Fenced code blocks are skipped
//!   so that shell snippets like `# reboot the hub` are not mistaken for
//!   headers.
//! - [`tokenize`] splits the text into literal runs and `{{identifier}}`
//!   placeholders. It never drops input: concatenating the `raw` text of every
//!   [`Segment`] reproduces the template byte for byte, which is what lets the
//!   renderer leave anything it doesn't understand untouched.

/// A Markdown ATX header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Number of leading `#` characters (1-6).
    pub level: usize,
    /// Header text with surrounding whitespace and any closing `#` run removed.
    pub text: String,
    /// 1-based line number.
    pub line: usize,
}

/// Why a `{{` run could not be read as a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    /// `{{` with no `}}` before the next `{{` or the end of the text.
    Unterminated,
    /// `{{…}}` whose inner text is not an identifier.
    InvalidName(String),
}

/// A piece of tokenized template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text between placeholders.
    Text(&'a str),
    /// A well-formed `{{name}}`.
    Placeholder {
        name: &'a str,
        raw: &'a str,
        line: usize,
    },
    /// Placeholder syntax that doesn't parse. `raw` is `{{` for an
    /// unterminated opener, or the full `{{…}}` for an invalid name.
    Malformed {
        raw: &'a str,
        line: usize,
        reason: Malformed,
    },
}

impl<'a> Segment<'a> {
    /// The exact source text this segment was cut from.
    pub fn raw(&self) -> &'a str {
        match self {
            Segment::Text(text) => *text,
            Segment::Placeholder { raw, .. } | Segment::Malformed { raw, .. } => *raw,
        }
    }
}

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Returns true if `name` is a valid placeholder identifier: non-empty,
/// ASCII letters, digits and underscores only.
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Parse a single line as an ATX header.
///
/// Requires 1-6 `#` followed by whitespace or end of line, so `#hashtag`
/// and `####### seven` are plain text.
fn parse_header_line(line: &str) -> Option<(usize, String)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    let mut text = rest.trim();
    // Optional closing sequence: `## Overview ##`
    let stripped = text.trim_end_matches('#');
    if stripped.len() != text.len() && (stripped.is_empty() || stripped.ends_with([' ', '\t'])) {
        text = stripped.trim_end();
    }
    Some((level, text.to_string()))
}

/// An open fenced code block: the fence character and the length of its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    ch: u8,
    len: usize,
}

/// Reads a run of three or more backticks or tildes at the start of a line.
/// Returns the fence and whatever follows the run (the info string).
fn fence_run(line: &str) -> Option<(Fence, &str)> {
    let trimmed = line.trim_start();
    let ch = match trimmed.bytes().next() {
        Some(b @ (b'`' | b'~')) => b,
        _ => return None,
    };
    let len = trimmed.bytes().take_while(|&b| b == ch).count();
    if len < 3 {
        return None;
    }
    Some((Fence { ch, len }, &trimmed[len..]))
}

/// Extract all headers in document order, skipping fenced code blocks.
///
/// A fence closes only on a bare run of the same character at least as long
/// as the opener, so a block opened with four backticks may contain
/// three-backtick lines.
pub fn parse_headers(text: &str) -> Vec<Header> {
    let mut headers = Vec::new();
    let mut open_fence: Option<Fence> = None;

    for (idx, line) in text.lines().enumerate() {
        if let Some(open) = open_fence {
            if let Some((fence, rest)) = fence_run(line) {
                if fence.ch == open.ch && fence.len >= open.len && rest.trim().is_empty() {
                    open_fence = None;
                }
            }
            continue;
        }
        if let Some((fence, _)) = fence_run(line) {
            open_fence = Some(fence);
            continue;
        }
        if let Some((level, text)) = parse_header_line(line) {
            headers.push(Header {
                level,
                text,
                line: idx + 1,
            });
        }
    }
    headers
}

/// Split template text into literal text and placeholder segments.
///
/// An opener is matched with the first `}}` after it, unless another `{{`
/// appears first, in which case the opener is unterminated and scanning
/// resumes at the inner `{{`.
pub fn tokenize(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut pos = 0;
    let mut line = 1;

    while let Some(offset) = text[pos..].find(OPEN) {
        let open = pos + offset;
        if open > pos {
            let literal = &text[pos..open];
            segments.push(Segment::Text(literal));
            line += literal.matches('\n').count();
        }

        let body_start = open + OPEN.len();
        let rest = &text[body_start..];
        let close = rest.find(CLOSE);
        let next_open = rest.find(OPEN);

        match close {
            Some(c) if next_open.is_none_or(|n| n > c) => {
                let end = body_start + c + CLOSE.len();
                let raw = &text[open..end];
                let name = &rest[..c];
                if is_identifier(name) {
                    segments.push(Segment::Placeholder { name, raw, line });
                } else {
                    segments.push(Segment::Malformed {
                        raw,
                        line,
                        reason: Malformed::InvalidName(name.to_string()),
                    });
                }
                line += raw.matches('\n').count();
                pos = end;
            }
            _ => {
                segments.push(Segment::Malformed {
                    raw: &text[open..body_start],
                    line,
                    reason: Malformed::Unterminated,
                });
                pos = body_start;
            }
        }
    }

    if pos < text.len() {
        segments.push(Segment::Text(&text[pos..]));
    }
    segments
}
