/// One node of the parsed pattern. Nodes are created by the parser and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// A run of ordinary characters. `.` means "any single character" and
    /// an escape pair (`\x`) means the literal second character.
    Literal(String),
    /// Raw body of a `[...]` group; each unit inside is one alternative.
    CharClass(String),
    /// A parenthesized subexpression.
    Group(Box<Ast>),
    /// `*`, `+` or `?` applied to a subpattern.
    Repeat { op: RepeatOp, node: Box<Ast> },
    /// `{m,n}`-style repetition. Bounds are kept as raw text and validated
    /// when the NFA is built; `{m}` is carried as `low == high == m`.
    Bounded {
        low: String,
        high: String,
        node: Box<Ast>,
    },
    /// Concatenation.
    Seq(Vec<Ast>),
    /// `|`-separated branches.
    Alt(Vec<Ast>),
    /// `&`-separated branches. Parsed, but construction rejects it.
    And(Vec<Ast>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatOp {
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// `?`
    ZeroOrOne,
}
