//! Pattern compilation diagnostics
//!
//! Turns a `regex::Error` into a `PatternError` that names what went wrong and
//! how to fix it, so a bad source or destination pattern aborts the run with an
//! actionable message instead of a raw parser dump.

use std::fmt;

/// Which of the two accepted pattern shapes produced the failing regex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternShape {
    /// Compiled as written
    Raw,
    /// Built from a `start ... end` pair
    Span,
}

/// A pattern that failed to compile, with diagnostic context
#[derive(Debug, Clone, PartialEq)]
pub struct PatternError {
    /// The specification exactly as the user entered it
    pub pattern: String,
    /// The shape the specification was resolved to
    pub shape: PatternShape,
    /// The classified failure
    pub kind: PatternErrorKind,
    /// Suggested fix, when one can be offered
    pub suggestion: Option<String>,
}

/// Classified regex failures
#[derive(Debug, Clone, PartialEq)]
pub enum PatternErrorKind {
    /// Generic syntax error
    Syntax { message: String },
    /// Unrecognized escape sequence
    InvalidEscape { sequence: String, position: usize },
    /// Unclosed group, class or counted repetition
    UnclosedDelimiter { delimiter: char, position: usize },
    /// Quantifier with nothing to repeat, or a malformed range
    InvalidQuantifier {
        message: String,
        position: Option<usize>,
    },
    /// Look-ahead / look-behind, which the regex engine does not support
    Lookaround { message: String },
    /// Backreferences, which the regex engine does not support
    Backreference { message: String },
}

impl PatternError {
    /// Build a diagnostic from a regex compilation failure
    pub fn from_regex_error(err: &regex::Error, pattern: &str, shape: PatternShape) -> Self {
        let message = match err {
            regex::Error::Syntax(msg) => msg.clone(),
            regex::Error::CompiledTooBig(limit) => {
                format!("compiled pattern exceeds the size limit of {} bytes", limit)
            }
            other => other.to_string(),
        };
        let kind = classify(&message, pattern);
        let suggestion = suggest(&kind, pattern);

        PatternError {
            pattern: pattern.to_string(),
            shape,
            kind,
            suggestion,
        }
    }

    /// Short label for the failure kind
    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            PatternErrorKind::Syntax { .. } => "Syntax error",
            PatternErrorKind::InvalidEscape { .. } => "Invalid escape sequence",
            PatternErrorKind::UnclosedDelimiter { .. } => "Unclosed delimiter",
            PatternErrorKind::InvalidQuantifier { .. } => "Invalid quantifier",
            PatternErrorKind::Lookaround { .. } => "Unsupported look-around",
            PatternErrorKind::Backreference { .. } => "Unsupported backreference",
        }
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self.shape {
            PatternShape::Raw => "regex",
            PatternShape::Span => "'start ... end' pair",
        };
        writeln!(f, "Invalid {}: \"{}\"", shape, self.pattern)?;
        writeln!(f, "  Type: {}", self.kind_label())?;

        match &self.kind {
            PatternErrorKind::Syntax { message }
            | PatternErrorKind::InvalidQuantifier { message, .. }
            | PatternErrorKind::Lookaround { message }
            | PatternErrorKind::Backreference { message } => {
                writeln!(f, "  Details: {}", last_line(message))?;
            }
            PatternErrorKind::InvalidEscape { sequence, position } => {
                writeln!(f, "  Sequence: '{}' at position {}", sequence, position)?;
            }
            PatternErrorKind::UnclosedDelimiter {
                delimiter,
                position,
            } => {
                writeln!(
                    f,
                    "  Missing closing '{}' for opening '{}' at position {}",
                    closer_for(*delimiter),
                    delimiter,
                    position
                )?;
            }
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for PatternError {}

fn classify(message: &str, pattern: &str) -> PatternErrorKind {
    let lower = message.to_lowercase();

    if lower.contains("look-around") || lower.contains("look-behind") || lower.contains("look-ahead")
    {
        return PatternErrorKind::Lookaround {
            message: message.to_string(),
        };
    }

    if lower.contains("backreference") {
        return PatternErrorKind::Backreference {
            message: message.to_string(),
        };
    }

    if lower.contains("unclosed") {
        for (open, close) in [('(', ')'), ('[', ']'), ('{', '}')] {
            if let Some(position) = find_unclosed_delimiter(pattern, open, close) {
                return PatternErrorKind::UnclosedDelimiter {
                    delimiter: open,
                    position,
                };
            }
        }
    }

    if lower.contains("escape") {
        if let Some(position) = find_invalid_escape(pattern) {
            return PatternErrorKind::InvalidEscape {
                sequence: extract_escape_at(pattern, position),
                position,
            };
        }
    }

    if lower.contains("repetition") || lower.contains("quantifier") {
        return PatternErrorKind::InvalidQuantifier {
            message: message.to_string(),
            position: find_invalid_quantifier(pattern),
        };
    }

    PatternErrorKind::Syntax {
        message: message.to_string(),
    }
}

fn suggest(kind: &PatternErrorKind, pattern: &str) -> Option<String> {
    match kind {
        PatternErrorKind::UnclosedDelimiter { delimiter, .. } => Some(format!(
            "Add a closing '{}', or escape the opening one as '\\{}' to match it literally.",
            closer_for(*delimiter),
            delimiter
        )),
        PatternErrorKind::InvalidEscape { sequence, .. } => Some(format!(
            "'{}' is not a recognized escape. Common escapes are \\n, \\t, \\s, \\d, \\w and \\xHH.",
            sequence
        )),
        PatternErrorKind::InvalidQuantifier { .. } => Some(
            "A quantifier (*, +, ?, {n,m}) needs something to repeat. \
             Escape it (e.g. '\\*') to match the character itself."
                .to_string(),
        ),
        PatternErrorKind::Lookaround { .. } => Some(
            "Look-around is not supported. To move everything between two markers, \
             write the pattern as 'START ... END', e.g. '/* start block */ ... /* end block */'."
                .to_string(),
        ),
        PatternErrorKind::Backreference { .. } => Some(
            "Backreferences are not supported. Spell out the repeated text instead.".to_string(),
        ),
        PatternErrorKind::Syntax { .. } => {
            if pattern.contains(" .. ") || pattern.contains("...") {
                Some(
                    "The marker shorthand needs exactly ' ... ' (space, three dots, space) \
                     between the start and end text."
                        .to_string(),
                )
            } else {
                Some(
                    "Escape special characters (. + * ? ^ $ | ( ) [ ] { } \\) to match them \
                     literally, or use the 'START ... END' shorthand."
                        .to_string(),
                )
            }
        }
    }
}

fn closer_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        _ => '?',
    }
}

// regex::Error::Syntax messages are multi-line with a caret diagram; the last line is the reason
fn last_line(message: &str) -> &str {
    message
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .map(str::trim)
        .unwrap_or(message)
}

/// Position (in chars) of the last opening delimiter left unclosed
fn find_unclosed_delimiter(pattern: &str, open: char, close: char) -> Option<usize> {
    let mut stack = Vec::new();
    let mut escaped = false;

    for (i, c) in pattern.chars().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == open {
            stack.push(i);
        } else if c == close {
            stack.pop();
        }
    }

    stack.last().copied()
}

fn find_invalid_escape(pattern: &str) -> Option<usize> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '\\' && i + 1 < chars.len() {
            let valid = matches!(
                chars[i + 1],
                'n' | 't'
                    | 'r'
                    | 'f'
                    | 'v'
                    | 'a'
                    | '0'
                    | 'x'
                    | 'u'
                    | 'U'
                    | 'p'
                    | 'P'
                    | 'w'
                    | 'W'
                    | 'd'
                    | 'D'
                    | 's'
                    | 'S'
                    | 'b'
                    | 'B'
                    | 'A'
                    | 'z'
            ) || !chars[i + 1].is_alphanumeric();

            if !valid {
                return Some(i);
            }
            i += 2;
        } else {
            i += 1;
        }
    }

    None
}

fn extract_escape_at(pattern: &str, pos: usize) -> String {
    pattern.chars().skip(pos).take(2).collect()
}

fn find_invalid_quantifier(pattern: &str) -> Option<usize> {
    let chars: Vec<char> = pattern.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if matches!(c, '*' | '+' | '?') {
            let prev = if i == 0 { None } else { Some(chars[i - 1]) };
            match prev {
                None | Some('(') | Some('|') => return Some(i),
                _ => {}
            }
        }
    }

    None
}
