//! Source and destination pattern compilation
//!
//! A pattern specification is either a raw regex or a `START ... END` pair.
//! The pair form matches the literal start text, then the shortest run of any
//! characters (line breaks included), then the literal end text.

use crate::regex_error::{PatternError, PatternShape};
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::ops::Range;

/// Separator between the start and end halves of the marker shorthand
pub const SPAN_SEPARATOR: &str = " ... ";

/// A parsed pattern specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSpec {
    /// A regular expression used as written
    Raw(String),
    /// Literal start and end markers, everything in between included
    Span { start: String, end: String },
}

impl PatternSpec {
    /// Resolve a user-entered specification into its shape
    ///
    /// Splits on the first `" ... "` only, so the end half may itself contain the separator.
    pub fn parse(spec: &str) -> Self {
        match spec.split_once(SPAN_SEPARATOR) {
            Some((start, end)) => PatternSpec::Span {
                start: start.to_string(),
                end: end.to_string(),
            },
            None => PatternSpec::Raw(spec.to_string()),
        }
    }

    pub fn shape(&self) -> PatternShape {
        match self {
            PatternSpec::Raw(_) => PatternShape::Raw,
            PatternSpec::Span { .. } => PatternShape::Span,
        }
    }

    /// The regex source this specification compiles to
    pub fn to_regex_source(&self) -> String {
        match self {
            PatternSpec::Raw(pattern) => pattern.clone(),
            PatternSpec::Span { start, end } => {
                format!(r"{}[\s\S]*?{}", regex::escape(start), regex::escape(end))
            }
        }
    }
}

impl fmt::Display for PatternSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternSpec::Raw(pattern) => f.write_str(pattern),
            PatternSpec::Span { start, end } => write!(f, "{}{}{}", start, SPAN_SEPARATOR, end),
        }
    }
}

/// A match of a compiled pattern within a file's full text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMatch {
    /// Byte range of the match
    pub range: Range<usize>,
    /// The matched text
    pub text: String,
}

impl BlockMatch {
    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// A specification compiled into an executable matcher
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    spec: PatternSpec,
    regex: Regex,
}

impl CompiledPattern {
    pub fn spec(&self) -> &PatternSpec {
        &self.spec
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// First match anywhere in `text`
    pub fn find_first(&self, text: &str) -> Option<BlockMatch> {
        self.regex.find(text).map(|m| BlockMatch {
            range: m.range(),
            text: m.as_str().to_string(),
        })
    }
}

/// Compile a user-entered specification
///
/// Raw patterns use multi-line mode so `^` and `$` anchor at line boundaries.
pub fn compile(spec: &str) -> Result<CompiledPattern, PatternError> {
    compile_spec(PatternSpec::parse(spec))
}

pub fn compile_spec(spec: PatternSpec) -> Result<CompiledPattern, PatternError> {
    let source = spec.to_regex_source();
    let regex = RegexBuilder::new(&source)
        .multi_line(true)
        .build()
        .map_err(|e| PatternError::from_regex_error(&e, &spec.to_string(), spec.shape()))?;

    Ok(CompiledPattern { spec, regex })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw() {
        assert_eq!(
            PatternSpec::parse("insert_here"),
            PatternSpec::Raw("insert_here".to_string())
        );
        // separator needs surrounding spaces
        assert_eq!(
            PatternSpec::parse("a...b"),
            PatternSpec::Raw("a...b".to_string())
        );
    }

    #[test]
    fn test_parse_span_splits_on_first_separator() {
        assert_eq!(
            PatternSpec::parse("a ... b ... c"),
            PatternSpec::Span {
                start: "a".to_string(),
                end: "b ... c".to_string()
            }
        );
    }

    #[test]
    fn test_span_matches_across_lines() {
        let pattern = compile("BEGIN ... END").unwrap();
        let text = "before\nBEGIN\none\ntwo\nEND\nafter END";
        let m = pattern.find_first(text).unwrap();
        assert_eq!(m.text, "BEGIN\none\ntwo\nEND");
        assert_eq!(m.start(), 7);
    }

    #[test]
    fn test_span_escapes_metacharacters() {
        let pattern = compile("/** @type ... */").unwrap();
        let text = "x /** @type {Foo|Bar} */ y";
        assert_eq!(pattern.find_first(text).unwrap().text, "/** @type {Foo|Bar} */");

        let pattern = compile("(a+) ... [b]").unwrap();
        assert!(pattern.find_first("aaa [b]").is_none());
        assert_eq!(pattern.find_first("(a+) x [b]").unwrap().text, "(a+) x [b]");
    }

    #[test]
    fn test_raw_pattern_is_multiline() {
        let pattern = compile("^insert_here$").unwrap();
        let m = pattern.find_first("one\ninsert_here\ntwo").unwrap();
        assert_eq!(m.range, 4..15);
    }

    #[test]
    fn test_raw_pattern_not_escaped() {
        let pattern = compile(r"fn \w+").unwrap();
        assert_eq!(pattern.find_first("pub fn main() {}").unwrap().text, "fn main");
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = compile("(unclosed").unwrap_err();
        assert_eq!(err.pattern, "(unclosed");
        assert_eq!(err.shape, PatternShape::Raw);
    }

    #[test]
    fn test_display_round_trips_spec() {
        let spec = PatternSpec::parse("/* start */ ... /* end */");
        assert_eq!(spec.to_string(), "/* start */ ... /* end */");
    }
}
