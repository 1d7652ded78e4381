//! A small pattern-matching engine: patterns compile to an explicit
//! nondeterministic finite automaton with epsilon transitions, and inputs
//! are matched by simulating the automaton with a worklist of candidate
//! threads.
//!
//! The pipeline is parser → NFA builder → matcher, with no feedback edges:
//!
//! ```text
//! &str  ──parser::parse──>  Ast  ──builder::build──>  Nfa  ──Matcher──>  bool / prefixes
//! ```
//!
//! Supported syntax: literal characters, `.` (any single character), `\x`
//! (literal `x`), `[...]` (one-of-these-characters), `(...)` (grouping),
//! `*` `+` `?` postfix quantifiers, `{m}` `{m,}` `{,n}` `{m,n}` bounded
//! repetition, and `|` alternation. `&` parses but is rejected when the
//! automaton is built.

pub mod ast;
pub mod builder;
pub mod error;
pub mod matcher;
pub mod nfa;
pub mod parser;

use log::debug;

pub use error::{CompileError, Error, MatchError};
pub use matcher::{Match, MatchMode, Matcher};
pub use nfa::Nfa;

/// Compile a pattern into an NFA.
pub fn compile(pattern: &str) -> Result<Nfa, CompileError> {
    let ast = parser::parse(pattern)?;
    let nfa = builder::build(&ast)?;
    debug!(
        "compiled pattern `{pattern}` into {} states",
        nfa.state_count()
    );
    Ok(nfa)
}

/// Compile `pattern` and test whether it matches the whole of `input`.
pub fn is_match(input: &str, pattern: &str) -> Result<bool, Error> {
    let nfa = compile(pattern)?;
    Ok(Matcher::new(&nfa).is_match(input)?)
}

/// Grep semantics: does the automaton accept some substring of `input`
/// starting at any offset?
pub fn search(nfa: &Nfa, input: &str) -> Result<bool, MatchError> {
    let matcher = Matcher::new(nfa);
    let chars: Vec<char> = input.chars().collect();
    for start in 0..=chars.len() {
        let tail: String = chars[start..].iter().collect();
        if !matcher.prefix_matches(&tail)?.is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_round_trip() {
        assert!(is_match("hello world", "hello world").unwrap());
        assert!(!is_match("hello worldx", "hello world").unwrap());
    }

    #[test]
    fn compile_errors_surface() {
        assert!(matches!(
            compile("(abc"),
            Err(CompileError::UnbalancedGroup(_))
        ));
        assert!(matches!(
            compile("a\\"),
            Err(CompileError::TrailingEscape(_))
        ));
        assert!(matches!(
            compile("a{,}"),
            Err(CompileError::InvalidBounds(_))
        ));
    }

    #[test]
    fn search_finds_interior_matches() {
        let nfa = compile("b+").unwrap();
        assert!(search(&nfa, "aabba").unwrap());
        assert!(!search(&nfa, "aaca").unwrap());
    }

    #[test]
    fn search_with_empty_pattern_matches_anywhere() {
        let nfa = compile("").unwrap();
        assert!(search(&nfa, "").unwrap());
        assert!(search(&nfa, "xyz").unwrap());
    }
}
