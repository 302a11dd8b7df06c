use regex::Regex;

use crate::patterns::{DEFAULT_HEADER_RES, RESERVED_COUNTRY_TOKENS, compile_header_pattern};

/// Lines after a candidate searched for its identifier/year token.
pub const DEFAULT_ID_WINDOW: usize = 5;
/// Lines after a candidate searched for its type/criteria block.
pub const DEFAULT_TYPE_WINDOW: usize = 9;
/// Cursor advance after a record is emitted.
pub const DEFAULT_ACCEPT_ADVANCE: usize = 4;

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Configuration for the heritage-list extraction pipeline.
///
/// The window sizes are tuned to the layout of one document; treat them as
/// knobs rather than semantics. Use [`ParsingConfigBuilder`] to construct
/// with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    /// Header/footer patterns, already compiled case-insensitively.
    pub(crate) header_patterns: Vec<Regex>,
    /// Substrings that disqualify a country heading.
    pub(crate) reserved_tokens: Vec<String>,
    pub(crate) id_window: usize,
    pub(crate) type_window: usize,
    pub(crate) accept_advance: usize,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            header_patterns: DEFAULT_HEADER_RES.clone(),
            reserved_tokens: RESERVED_COUNTRY_TOKENS.iter().map(|t| t.to_string()).collect(),
            id_window: DEFAULT_ID_WINDOW,
            type_window: DEFAULT_TYPE_WINDOW,
            accept_advance: DEFAULT_ACCEPT_ADVANCE,
        }
    }
}

impl ParsingConfig {
    pub fn id_window(&self) -> usize {
        self.id_window
    }

    pub fn type_window(&self) -> usize {
        self.type_window
    }

    pub fn accept_advance(&self) -> usize {
        self.accept_advance
    }

    pub fn header_patterns(&self) -> &[Regex] {
        &self.header_patterns
    }

    pub fn reserved_tokens(&self) -> &[String] {
        &self.reserved_tokens
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    header_patterns: ListOverride<String>,
    reserved_tokens: ListOverride<String>,
    id_window: Option<usize>,
    type_window: Option<usize>,
    accept_advance: Option<usize>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Header/footer patterns ──

    pub fn set_header_patterns(mut self, patterns: Vec<String>) -> Self {
        self.header_patterns = ListOverride::Replace(patterns);
        self
    }

    pub fn add_header_pattern(mut self, pattern: String) -> Self {
        match &mut self.header_patterns {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(pattern),
            ListOverride::Default => self.header_patterns = ListOverride::Extend(vec![pattern]),
        }
        self
    }

    // ── Reserved country tokens ──

    pub fn set_reserved_tokens(mut self, tokens: Vec<String>) -> Self {
        self.reserved_tokens = ListOverride::Replace(tokens);
        self
    }

    pub fn add_reserved_token(mut self, token: String) -> Self {
        match &mut self.reserved_tokens {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(token),
            ListOverride::Default => self.reserved_tokens = ListOverride::Extend(vec![token]),
        }
        self
    }

    // ── Windows ──

    pub fn id_window(mut self, lines: usize) -> Self {
        self.id_window = Some(lines);
        self
    }

    pub fn type_window(mut self, lines: usize) -> Self {
        self.type_window = Some(lines);
        self
    }

    /// Lines to skip after an emitted record. Clamped to at least 1.
    pub fn accept_advance(mut self, lines: usize) -> Self {
        self.accept_advance = Some(lines);
        self
    }

    /// Compile all string patterns and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let header_patterns = match self.header_patterns {
            ListOverride::Default => DEFAULT_HEADER_RES.clone(),
            ListOverride::Replace(patterns) => patterns
                .iter()
                .map(|p| compile_header_pattern(p))
                .collect::<Result<Vec<_>, _>>()?,
            ListOverride::Extend(patterns) => {
                let mut compiled = DEFAULT_HEADER_RES.clone();
                for p in &patterns {
                    compiled.push(compile_header_pattern(p)?);
                }
                compiled
            }
        };

        let default_tokens: Vec<String> =
            RESERVED_COUNTRY_TOKENS.iter().map(|t| t.to_string()).collect();

        Ok(ParsingConfig {
            header_patterns,
            reserved_tokens: self.reserved_tokens.resolve(&default_tokens),
            id_window: self.id_window.unwrap_or(DEFAULT_ID_WINDOW),
            type_window: self.type_window.unwrap_or(DEFAULT_TYPE_WINDOW),
            accept_advance: self.accept_advance.unwrap_or(DEFAULT_ACCEPT_ADVANCE).max(1),
        })
    }
}
