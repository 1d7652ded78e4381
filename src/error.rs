use thiserror::Error;

/// Errors raised while turning a pattern string into an NFA.
///
/// Every variant carries the offending substring or character so a caller
/// can report where compilation went wrong. Compilation is all-or-nothing:
/// no partial automaton is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A `(`, `[` or `{` was never closed, or a stray closer was found.
    #[error("unbalanced group at `{0}`")]
    UnbalancedGroup(String),

    /// The pattern (or a group body) ends on a lone backslash.
    #[error("trailing escape at end of `{0}`")]
    TrailingEscape(String),

    /// A `[...]` body contains an unescaped reserved character.
    #[error("character `{ch}` is not allowed unescaped in class `[{body}]`")]
    DisallowedCharacterInClass { ch: char, body: String },

    /// A `{...}` body is empty, has empty bounds, a non-numeric bound, or
    /// a lower bound above the upper bound.
    #[error("invalid repetition bounds `{{{0}}}`")]
    InvalidBounds(String),

    /// A postfix quantifier with nothing before it to repeat.
    #[error("quantifier `{0}` has nothing to repeat")]
    DanglingQuantifier(char),

    /// `&` parses but has no agreed construction semantics.
    #[error("`&` intersection is not supported")]
    UnsupportedCombinator,
}

/// Errors raised by the matcher.
///
/// A non-matching input is a negative result, not an error; the only
/// failure mode is being handed an automaton that breaks the construction
/// contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The supplied NFA has no start state.
    #[error("automaton has no start state")]
    InvalidState,
}

/// Umbrella error for callers driving the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Match(#[from] MatchError),
}
