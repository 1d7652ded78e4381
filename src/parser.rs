use crate::ast::{Ast, RepeatOp};
use crate::error::CompileError;

/// A token produced at one nesting level of the scan: either a finished
/// subpattern or a loose combinator/anchor character (`|`, `&`, `^`, `$`).
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Node(Ast),
    Op(char),
}

/// Parse a pattern string into a single AST node.
pub fn parse(pattern: &str) -> Result<Ast, CompileError> {
    let chars: Vec<char> = pattern.chars().collect();
    parse_chars(&chars)
}

fn parse_chars(chars: &[char]) -> Result<Ast, CompileError> {
    // A pattern that is exactly one outer (...) group is a no-op grouping.
    if chars.first() == Some(&'(') && extract_group(chars)? == chars.len() {
        return parse_chars(&chars[1..chars.len() - 1]);
    }
    Parser::new(chars).parse()
}

/// Scanner over an immutable char buffer.
///
/// The pattern is consumed left to right while a pending literal run is
/// accumulated. The run is held as escape-aware units (one character, or a
/// whole `\x` pair) so that a postfix quantifier can split off exactly the
/// last unit it binds to.
struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
    run: Vec<String>,
    tokens: Vec<Token>,
}

impl<'a> Parser<'a> {
    fn new(chars: &'a [char]) -> Self {
        Self {
            chars,
            pos: 0,
            run: Vec::new(),
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn rest(&self) -> &'a [char] {
        &self.chars[self.pos..]
    }

    /// Turn the pending literal run into a token, if there is one.
    fn flush_run(&mut self) {
        if !self.run.is_empty() {
            let text: String = self.run.drain(..).collect();
            self.tokens.push(Token::Node(Ast::Literal(text)));
        }
    }

    /// The subpattern a postfix operator (`*`, `+`, `?`, `{...}`) applies
    /// to: the last unit of the pending run if one exists (the rest of the
    /// run is flushed first), otherwise the previously produced subpattern.
    fn postfix_operand(&mut self, op: char) -> Result<Ast, CompileError> {
        if let Some(unit) = self.run.pop() {
            self.flush_run();
            return Ok(Ast::Literal(unit));
        }
        match self.tokens.pop() {
            Some(Token::Node(node)) => Ok(node),
            _ => Err(CompileError::DanglingQuantifier(op)),
        }
    }

    fn parse(mut self) -> Result<Ast, CompileError> {
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.advance();
                    match self.advance() {
                        Some(escaped) => self.run.push(format!("\\{escaped}")),
                        None => {
                            return Err(CompileError::TrailingEscape(
                                self.chars.iter().collect(),
                            ))
                        }
                    }
                }
                '|' | '&' | '^' | '$' => {
                    self.advance();
                    self.flush_run();
                    self.tokens.push(Token::Op(c));
                }
                '*' | '+' | '?' => {
                    self.advance();
                    let node = self.postfix_operand(c)?;
                    let op = match c {
                        '*' => RepeatOp::ZeroOrMore,
                        '+' => RepeatOp::OneOrMore,
                        _ => RepeatOp::ZeroOrOne,
                    };
                    self.tokens.push(Token::Node(Ast::Repeat {
                        op,
                        node: Box::new(node),
                    }));
                }
                '(' => {
                    let len = extract_group(self.rest())?;
                    let inner = parse_chars(&self.rest()[1..len - 1])?;
                    self.flush_run();
                    self.tokens.push(Token::Node(Ast::Group(Box::new(inner))));
                    self.pos += len;
                }
                '[' => {
                    let len = extract_group(self.rest())?;
                    let body: String = self.rest()[1..len - 1].iter().collect();
                    self.flush_run();
                    self.tokens.push(Token::Node(Ast::CharClass(body)));
                    self.pos += len;
                }
                '{' => {
                    let len = extract_group(self.rest())?;
                    let body: String = self.rest()[1..len - 1].iter().collect();
                    let (low, high) = split_bounds(&body)?;
                    let node = self.postfix_operand('{')?;
                    self.tokens.push(Token::Node(Ast::Bounded {
                        low,
                        high,
                        node: Box::new(node),
                    }));
                    self.pos += len;
                }
                ')' | ']' | '}' => {
                    return Err(CompileError::UnbalancedGroup(self.rest().iter().collect()))
                }
                _ => {
                    self.advance();
                    self.run.push(c.to_string());
                }
            }
        }
        self.flush_run();
        Ok(resolve(self.tokens))
    }
}

/// Length of the shortest balanced prefix of `chars`, whose first character
/// must be `(`, `[` or `{`. A backslash escapes the following character
/// without touching the nesting counter.
pub(crate) fn extract_group(chars: &[char]) -> Result<usize, CompileError> {
    let open = chars[0];
    let close = match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    };
    let mut depth = 1usize;
    let mut i = 1;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c == '\\' {
            if i == chars.len() {
                return Err(CompileError::TrailingEscape(chars.iter().collect()));
            }
            i += 1;
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Ok(i);
            }
        }
    }
    Err(CompileError::UnbalancedGroup(chars.iter().collect()))
}

/// Split a `{...}` body once on `,` into its raw textual bounds. A single
/// field `m` means exactly `m`, carried as `(m, m)`. Bound contents are
/// validated when the NFA is built.
fn split_bounds(body: &str) -> Result<(String, String), CompileError> {
    let fields: Vec<&str> = body.split(',').collect();
    match fields.as_slice() {
        [single] => Ok((single.to_string(), single.to_string())),
        [low, high] => Ok((low.to_string(), high.to_string())),
        _ => Err(CompileError::InvalidBounds(body.to_string())),
    }
}

/// Resolve the flat token sequence of one nesting level: split on `&`,
/// then `|`, then fall back to concatenation. Leftover `^`/`$` operator
/// tokens become one-character literals (this engine has no anchors).
fn resolve(tokens: Vec<Token>) -> Ast {
    if tokens.contains(&Token::Op('&')) {
        let branches = split_on(tokens, '&').into_iter().map(resolve).collect();
        return Ast::And(branches);
    }
    if tokens.contains(&Token::Op('|')) {
        let branches = split_on(tokens, '|').into_iter().map(resolve).collect();
        return Ast::Alt(branches);
    }
    let mut nodes: Vec<Ast> = tokens.into_iter().map(token_to_node).collect();
    if nodes.len() == 1 {
        nodes.pop().unwrap()
    } else {
        Ast::Seq(nodes)
    }
}

fn token_to_node(token: Token) -> Ast {
    match token {
        Token::Node(node) => node,
        Token::Op(c) => Ast::Literal(c.to_string()),
    }
}

/// Split a token sequence on a separator operator, dropping empty groups.
fn split_on(tokens: Vec<Token>, op: char) -> Vec<Vec<Token>> {
    let mut groups = vec![Vec::new()];
    for token in tokens {
        if token == Token::Op(op) {
            groups.push(Vec::new());
        } else {
            groups.last_mut().unwrap().push(token);
        }
    }
    groups.retain(|group| !group.is_empty());
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Ast::*;

    fn lit(s: &str) -> Ast {
        Literal(s.to_string())
    }

    #[test]
    fn plain_literal() {
        assert_eq!(parse("abc").unwrap(), lit("abc"));
    }

    #[test]
    fn quantifier_binds_last_character() {
        assert_eq!(
            parse("ab*").unwrap(),
            Seq(vec![
                lit("a"),
                Repeat {
                    op: RepeatOp::ZeroOrMore,
                    node: Box::new(lit("b")),
                },
            ])
        );
    }

    #[test]
    fn quantifier_binds_whole_escape_pair() {
        assert_eq!(
            parse(r"a\.+").unwrap(),
            Seq(vec![
                lit("a"),
                Repeat {
                    op: RepeatOp::OneOrMore,
                    node: Box::new(lit(r"\.")),
                },
            ])
        );
    }

    #[test]
    fn quantifier_binds_previous_group() {
        assert_eq!(
            parse("(ab)?").unwrap(),
            Repeat {
                op: RepeatOp::ZeroOrOne,
                node: Box::new(Group(Box::new(lit("ab")))),
            }
        );
    }

    #[test]
    fn outer_group_is_transparent() {
        assert_eq!(parse("(abc)").unwrap(), lit("abc"));
        assert_eq!(parse("((abc))").unwrap(), lit("abc"));
    }

    #[test]
    fn alternation_splits_at_top_level() {
        assert_eq!(
            parse("ab|cd|e").unwrap(),
            Alt(vec![lit("ab"), lit("cd"), lit("e")])
        );
    }

    #[test]
    fn empty_alternation_branches_are_dropped() {
        assert_eq!(parse("a|").unwrap(), Alt(vec![lit("a")]));
    }

    #[test]
    fn intersection_parses() {
        assert_eq!(parse("a&b").unwrap(), And(vec![lit("a"), lit("b")]));
    }

    #[test]
    fn char_class_keeps_raw_body() {
        assert_eq!(
            parse("a[xy]").unwrap(),
            Seq(vec![lit("a"), CharClass("xy".to_string())])
        );
    }

    #[test]
    fn bounded_splits_fields() {
        assert_eq!(
            parse("a{2,3}").unwrap(),
            Bounded {
                low: "2".to_string(),
                high: "3".to_string(),
                node: Box::new(lit("a")),
            }
        );
        assert_eq!(
            parse("a{4}").unwrap(),
            Bounded {
                low: "4".to_string(),
                high: "4".to_string(),
                node: Box::new(lit("a")),
            }
        );
    }

    #[test]
    fn bounded_applies_to_previous_group() {
        assert_eq!(
            parse("(ab){2,}").unwrap(),
            Bounded {
                low: "2".to_string(),
                high: String::new(),
                node: Box::new(Group(Box::new(lit("ab")))),
            }
        );
    }

    #[test]
    fn anchors_become_literals() {
        assert_eq!(parse("a^b").unwrap(), Seq(vec![lit("a"), lit("^"), lit("b")]));
    }

    #[test]
    fn unbalanced_group_is_rejected() {
        assert!(matches!(
            parse("(abc"),
            Err(CompileError::UnbalancedGroup(_))
        ));
        assert!(matches!(parse("ab)"), Err(CompileError::UnbalancedGroup(_))));
    }

    #[test]
    fn trailing_escape_is_rejected() {
        assert!(matches!(parse("a\\"), Err(CompileError::TrailingEscape(_))));
    }

    #[test]
    fn dangling_quantifier_is_rejected() {
        assert!(matches!(
            parse("*a"),
            Err(CompileError::DanglingQuantifier('*'))
        ));
        assert!(matches!(
            parse("a|+"),
            Err(CompileError::DanglingQuantifier('+'))
        ));
    }

    #[test]
    fn too_many_bound_fields_are_rejected() {
        assert!(matches!(
            parse("a{1,2,3}"),
            Err(CompileError::InvalidBounds(_))
        ));
    }

    #[test]
    fn extract_group_honors_nesting_and_escapes() {
        let chars: Vec<char> = "(a(b)c)d".chars().collect();
        assert_eq!(extract_group(&chars).unwrap(), 7);
        let chars: Vec<char> = r"(a\)b)c".chars().collect();
        assert_eq!(extract_group(&chars).unwrap(), 6);
        let chars: Vec<char> = r"(ab\".chars().collect();
        assert!(matches!(
            extract_group(&chars),
            Err(CompileError::TrailingEscape(_))
        ));
    }
}
