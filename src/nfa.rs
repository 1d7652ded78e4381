use std::collections::{HashMap, HashSet};

/// A state index into an [`Nfa`]'s arena.
pub type StateId = usize;

/// A transition label: one literal character, the wildcard, or epsilon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Consume exactly this character.
    Char(char),
    /// Consume any single character (`.`).
    Any,
    /// Consume nothing.
    Epsilon,
}

/// A nondeterministic finite automaton.
///
/// States live in a dense arena and are addressed by index, so two
/// automata built independently can never collide on a state name; merging
/// a fragment into a parent is an index remap (see [`Nfa::splice`]) rather
/// than a rename of opaque identifiers. Each state owns a transition table
/// from [`Symbol`] to a set of destination states.
///
/// A completed automaton has one `start` state and one `exit` state;
/// alternation fans multiple branch exits into the shared `exit` with
/// epsilon edges. Fragments under construction use the same shape with
/// indices local to the fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Nfa {
    states: Vec<HashMap<Symbol, HashSet<StateId>>>,
    pub start: StateId,
    pub exit: StateId,
}

impl Nfa {
    /// An automaton with distinct, unconnected start and exit states.
    pub fn boundary() -> Self {
        Self {
            states: vec![HashMap::new(), HashMap::new()],
            start: 0,
            exit: 1,
        }
    }

    /// Allocate a fresh state with an empty transition table.
    pub fn add_state(&mut self) -> StateId {
        self.states.push(HashMap::new());
        self.states.len() - 1
    }

    pub fn add_edge(&mut self, from: StateId, symbol: Symbol, to: StateId) {
        self.states[from].entry(symbol).or_default().insert(to);
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Whether `start` names an actual state. A violated contract here is
    /// the matcher's only error condition.
    pub fn has_start(&self) -> bool {
        self.start < self.states.len()
    }

    /// Destinations reachable from `state` on `symbol`.
    pub fn destinations(&self, state: StateId, symbol: Symbol) -> impl Iterator<Item = StateId> + '_ {
        self.states
            .get(state)
            .and_then(|table| table.get(&symbol))
            .into_iter()
            .flatten()
            .copied()
    }

    /// Merge `frag` into this automaton, wiring its start onto `entry` and
    /// its exit onto `exit`. Every interior state of the fragment gets a
    /// fresh index here, so sibling fragments spliced into the same parent
    /// can never share a state. The remap is computed for the whole
    /// fragment before any edge is copied.
    ///
    /// Fragments always keep start and exit distinct (even an empty
    /// literal is built as start —ε→ exit), so the remap is well defined.
    pub fn splice(&mut self, frag: &Nfa, entry: StateId, exit: StateId) {
        debug_assert_ne!(frag.start, frag.exit, "fragment start and exit must differ");
        let remap: Vec<StateId> = (0..frag.states.len())
            .map(|id| {
                if id == frag.start {
                    entry
                } else if id == frag.exit {
                    exit
                } else {
                    self.add_state()
                }
            })
            .collect();
        for (id, table) in frag.states.iter().enumerate() {
            for (&symbol, dests) in table {
                for &dest in dests {
                    self.add_edge(remap[id], symbol, remap[dest]);
                }
            }
        }
    }
}
