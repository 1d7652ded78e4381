use crate::ast::{Ast, RepeatOp};
use crate::error::CompileError;
use crate::nfa::{Nfa, Symbol};

/// Characters that must be escaped inside a `[...]` body.
const CLASS_RESERVED: &[char] = &['|', '?', '{', '}', '(', ')', '+', '.', '[', ']'];

/// Build a complete NFA fragment for one AST node.
pub fn build(ast: &Ast) -> Result<Nfa, CompileError> {
    match ast {
        Ast::Literal(text) => literal_fragment(text),
        Ast::CharClass(body) => class_fragment(body),
        Ast::Group(inner) => build(inner),
        Ast::Repeat { op, node } => match op {
            RepeatOp::ZeroOrMore => Ok(star(build(node)?)),
            RepeatOp::OneOrMore => {
                // One mandatory copy followed by the `*` construction.
                let head = build(node)?;
                let tail = star(build(node)?);
                Ok(concat(&[head, tail]))
            }
            RepeatOp::ZeroOrOne => Ok(question(build(node)?)),
        },
        Ast::Bounded { low, high, node } => bounded_fragment(low, high, node),
        Ast::Seq(items) => {
            let frags: Vec<Nfa> = items.iter().map(build).collect::<Result<_, _>>()?;
            Ok(concat(&frags))
        }
        Ast::Alt(branches) => {
            let frags: Vec<Nfa> = branches.iter().map(build).collect::<Result<_, _>>()?;
            Ok(alternation(frags))
        }
        Ast::And(_) => Err(CompileError::UnsupportedCombinator),
    }
}

/// Chain of one-symbol transitions, one per unit of `text`. `.` becomes
/// the wildcard and an escape pair its literal second character. An empty
/// literal degenerates to start —ε→ exit.
fn literal_fragment(text: &str) -> Result<Nfa, CompileError> {
    let mut nfa = Nfa::default();
    let start = nfa.add_state();
    let mut current = start;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        let symbol = match c {
            '\\' => match chars.next() {
                Some(escaped) => Symbol::Char(escaped),
                None => return Err(CompileError::TrailingEscape(text.to_string())),
            },
            '.' => Symbol::Any,
            _ => Symbol::Char(c),
        };
        let next = nfa.add_state();
        nfa.add_edge(current, symbol, next);
        current = next;
    }
    if current == start {
        current = nfa.add_state();
        nfa.add_edge(start, Symbol::Epsilon, current);
    }
    nfa.start = start;
    nfa.exit = current;
    Ok(nfa)
}

/// A character class is an alternation with one branch per unit of the
/// body (an escape pair counts as one unit).
fn class_fragment(body: &str) -> Result<Nfa, CompileError> {
    let units = class_units(body)?;
    let branches: Vec<Nfa> = units
        .iter()
        .map(|unit| literal_fragment(unit))
        .collect::<Result<_, _>>()?;
    Ok(alternation(branches))
}

/// Split a class body into units, rejecting unescaped reserved characters.
fn class_units(body: &str) -> Result<Vec<String>, CompileError> {
    let chars: Vec<char> = body.chars().collect();
    let mut units = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            if i + 1 == chars.len() {
                return Err(CompileError::TrailingEscape(body.to_string()));
            }
            units.push(format!("\\{}", chars[i + 1]));
            i += 2;
        } else if CLASS_RESERVED.contains(&c) {
            return Err(CompileError::DisallowedCharacterInClass {
                ch: c,
                body: body.to_string(),
            });
        } else {
            units.push(c.to_string());
            i += 1;
        }
    }
    Ok(units)
}

/// Zero or more: loop back from exit to start, bypass from start to exit.
fn star(mut frag: Nfa) -> Nfa {
    frag.add_edge(frag.exit, Symbol::Epsilon, frag.start);
    frag.add_edge(frag.start, Symbol::Epsilon, frag.exit);
    frag
}

/// Zero or one: bypass from start to exit.
fn question(mut frag: Nfa) -> Nfa {
    frag.add_edge(frag.start, Symbol::Epsilon, frag.exit);
    frag
}

/// Left fold of fragments between a fresh entry state and a running join
/// state. An empty slice yields start —ε→ exit.
fn concat(frags: &[Nfa]) -> Nfa {
    let mut nfa = Nfa::default();
    let start = nfa.add_state();
    let mut current = nfa.add_state();
    nfa.add_edge(start, Symbol::Epsilon, current);
    for frag in frags {
        let next = nfa.add_state();
        nfa.splice(frag, current, next);
        current = next;
    }
    nfa.start = start;
    nfa.exit = current;
    nfa
}

/// Fan out from a shared start to every branch, fan every branch exit into
/// a shared exit. A single branch passes through unchanged.
fn alternation(mut frags: Vec<Nfa>) -> Nfa {
    if frags.len() == 1 {
        return frags.pop().unwrap();
    }
    let mut nfa = Nfa::boundary();
    for frag in &frags {
        let entry = nfa.add_state();
        let exit = nfa.add_state();
        nfa.splice(frag, entry, exit);
        nfa.add_edge(nfa.start, Symbol::Epsilon, entry);
        nfa.add_edge(exit, Symbol::Epsilon, nfa.exit);
    }
    nfa
}

/// Expand `{m,n}` repetition by rewriting into the constructions above:
/// exact copies, independently optional copies, and a trailing star for an
/// open upper bound.
fn bounded_fragment(low: &str, high: &str, node: &Ast) -> Result<Nfa, CompileError> {
    let bounds_text = || {
        if low == high {
            low.to_string()
        } else {
            format!("{low},{high}")
        }
    };
    let lo = parse_bound(low).map_err(|_| CompileError::InvalidBounds(bounds_text()))?;
    let hi = parse_bound(high).map_err(|_| CompileError::InvalidBounds(bounds_text()))?;

    let mut frags = Vec::new();
    match (lo, hi) {
        (None, None) => return Err(CompileError::InvalidBounds(bounds_text())),
        (Some(lo), Some(hi)) => {
            if lo > hi {
                return Err(CompileError::InvalidBounds(bounds_text()));
            }
            for _ in 0..lo {
                frags.push(build(node)?);
            }
            for _ in lo..hi {
                frags.push(question(build(node)?));
            }
        }
        (None, Some(hi)) => {
            for _ in 0..hi {
                frags.push(question(build(node)?));
            }
        }
        (Some(lo), None) => {
            for _ in 0..lo {
                frags.push(build(node)?);
            }
            frags.push(star(build(node)?));
        }
    }
    Ok(concat(&frags))
}

/// An empty bound is absent; a present bound must be all digits.
fn parse_bound(text: &str) -> Result<Option<usize>, ()> {
    if text.is_empty() {
        return Ok(None);
    }
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(());
    }
    text.parse().map(Some).map_err(|_| ())
}
