use std::collections::HashSet;

use log::trace;

use crate::error::MatchError;
use crate::nfa::{Nfa, StateId, Symbol};

/// How the simulation reports acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Accept only when the whole input is consumed; stop at the first hit.
    Full,
    /// Record an accepting candidate at every prefix length and keep going.
    AllPrefixes,
}

/// One accepting simulation thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Input offset the automaton accepted at.
    pub end: usize,
    /// The text consumed up to `end`.
    pub text: String,
}

/// One in-progress simulation thread: a state, an input offset, the text
/// consumed so far, and the states crossed by epsilon since the last real
/// character (the cycle guard).
#[derive(Debug, Clone)]
struct Candidate {
    state: StateId,
    offset: usize,
    text: String,
    eps_seen: HashSet<StateId>,
}

/// Simulates an [`Nfa`] against input strings.
///
/// The automaton is read-only during matching, so one `Matcher` (or many)
/// can be reused across inputs; every call owns its own worklist.
pub struct Matcher<'a> {
    nfa: &'a Nfa,
}

impl<'a> Matcher<'a> {
    pub fn new(nfa: &'a Nfa) -> Self {
        Self { nfa }
    }

    /// Whether the automaton accepts the whole input.
    pub fn is_match(&self, input: &str) -> Result<bool, MatchError> {
        Ok(!self.run(input, MatchMode::Full)?.is_empty())
    }

    /// Every accepting prefix of the input, in exploration order.
    pub fn prefix_matches(&self, input: &str) -> Result<Vec<Match>, MatchError> {
        self.run(input, MatchMode::AllPrefixes)
    }

    /// Worklist simulation. Depth-first order via a stack; order affects
    /// only exploration, not the set of results.
    pub fn run(&self, input: &str, mode: MatchMode) -> Result<Vec<Match>, MatchError> {
        if !self.nfa.has_start() {
            return Err(MatchError::InvalidState);
        }
        let chars: Vec<char> = input.chars().collect();
        let mut worklist = vec![Candidate {
            state: self.nfa.start,
            offset: 0,
            text: String::new(),
            eps_seen: HashSet::new(),
        }];
        // In full-match mode the outcome from a state depends only on the
        // input offset, and candidates produced by consuming a character
        // carry an empty epsilon guard, so (state, offset) pairs already
        // entered that way need not be entered again. This bounds the
        // worklist on ambiguous patterns.
        let mut consumed_at: HashSet<(StateId, usize)> = HashSet::new();
        let mut matches = Vec::new();

        while let Some(candidate) = worklist.pop() {
            let next_char = chars.get(candidate.offset).copied();

            for dest in self.nfa.destinations(candidate.state, Symbol::Epsilon) {
                if !candidate.eps_seen.contains(&dest) {
                    let mut successor = candidate.clone();
                    successor.eps_seen.insert(candidate.state);
                    successor.state = dest;
                    worklist.push(successor);
                }
            }

            if let Some(ch) = next_char {
                let consuming = self
                    .nfa
                    .destinations(candidate.state, Symbol::Char(ch))
                    .chain(self.nfa.destinations(candidate.state, Symbol::Any));
                for dest in consuming {
                    if mode == MatchMode::Full && !consumed_at.insert((dest, candidate.offset + 1))
                    {
                        continue;
                    }
                    let mut text = candidate.text.clone();
                    text.push(ch);
                    worklist.push(Candidate {
                        state: dest,
                        offset: candidate.offset + 1,
                        text,
                        eps_seen: HashSet::new(),
                    });
                }
            }

            if candidate.state == self.nfa.exit {
                match mode {
                    MatchMode::Full if next_char.is_none() => {
                        trace!("accepted after {} characters", candidate.offset);
                        return Ok(vec![Match {
                            end: candidate.offset,
                            text: candidate.text,
                        }]);
                    }
                    MatchMode::AllPrefixes => {
                        trace!("prefix accepted at offset {}", candidate.offset);
                        matches.push(Match {
                            end: candidate.offset,
                            text: candidate.text,
                        });
                    }
                    MatchMode::Full => {}
                }
            }
        }
        Ok(matches)
    }
}
