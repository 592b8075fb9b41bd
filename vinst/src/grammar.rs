// SPDX-License-Identifier: Apache-2.0

//! Grammar and recursive-descent matcher for a single Verilog instantiation
//! statement:
//!
//! ```text
//! module_name [#(param, ...)] instance_name (.port(signal), ...);
//! ```
//!
//! Rule bodies are [`Expr`] values composed from a handful of combinators
//! (sequence, one-or-more, optional, ordered choice) over three terminals
//! (literal, word, whitespace). Choices are ordered and repetitions are
//! greedy, so a given input has at most one parse.

use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    Instance,
    ParameterList,
    Parameter,
    PortList,
    Port,
    Name,
}

impl Rule {
    pub const ALL: [Rule; 6] = [
        Rule::Instance,
        Rule::ParameterList,
        Rule::Parameter,
        Rule::PortList,
        Rule::Port,
        Rule::Name,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rule::Instance => "Instance",
            Rule::ParameterList => "ParameterList",
            Rule::Parameter => "Parameter",
            Rule::PortList => "PortList",
            Rule::Port => "Port",
            Rule::Name => "Name",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Exact text; the empty literal always matches.
    Literal(&'static str),
    /// One or more word characters (letters, digits, underscore).
    Word,
    /// Zero or more whitespace characters.
    Whitespace,
    Rule(Rule),
    Sequence(Vec<Expr>),
    OneOrMore(Box<Expr>),
    Optional(Box<Expr>),
    /// Ordered choice: the first alternative that matches wins.
    Choice(Vec<Expr>),
}

pub fn lit(text: &'static str) -> Expr {
    Expr::Literal(text)
}

pub fn word() -> Expr {
    Expr::Word
}

pub fn ws() -> Expr {
    Expr::Whitespace
}

pub fn rule(rule: Rule) -> Expr {
    Expr::Rule(rule)
}

pub fn seq(items: Vec<Expr>) -> Expr {
    Expr::Sequence(items)
}

pub fn one_or_more(expr: Expr) -> Expr {
    Expr::OneOrMore(Box::new(expr))
}

pub fn optional(expr: Expr) -> Expr {
    Expr::Optional(Box::new(expr))
}

pub fn choice(alternatives: Vec<Expr>) -> Expr {
    Expr::Choice(alternatives)
}

fn fmt_atom(expr: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match expr {
        Expr::Sequence(items) | Expr::Choice(items) if items.len() > 1 => {
            write!(f, "({})", expr)
        }
        _ => write!(f, "{}", expr),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(text) => write!(f, "{:?}", text),
            Expr::Word => write!(f, "WORD"),
            Expr::Whitespace => write!(f, "ws"),
            Expr::Rule(rule) => write!(f, "{}", rule.name()),
            Expr::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    fmt_atom(item, f)?;
                }
                Ok(())
            }
            Expr::OneOrMore(inner) => {
                fmt_atom(inner, f)?;
                write!(f, "+")
            }
            Expr::Optional(inner) => {
                fmt_atom(inner, f)?;
                write!(f, "?")
            }
            Expr::Choice(alternatives) => {
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        write!(f, " / ")?;
                    }
                    fmt_atom(alternative, f)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Instance,
    ParameterList,
    Parameter,
    PortList,
    Port,
    Name,
    Whitespace,
    Word,
    Literal,
    Sequence,
    OneOrMore,
    Optional,
    Choice,
}

impl From<Rule> for NodeKind {
    fn from(rule: Rule) -> Self {
        match rule {
            Rule::Instance => NodeKind::Instance,
            Rule::ParameterList => NodeKind::ParameterList,
            Rule::Parameter => NodeKind::Parameter,
            Rule::PortList => NodeKind::PortList,
            Rule::Port => NodeKind::Port,
            Rule::Name => NodeKind::Name,
        }
    }
}

/// Parse tree node covering the byte range `start..end` of the parsed text.
///
/// A rule node is the node of its body relabelled with the rule's kind, so
/// e.g. a `Name` node has the three children `Whitespace Word Whitespace`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub start: usize,
    pub end: usize,
    pub children: Vec<Node>,
}

impl Node {
    fn leaf(kind: NodeKind, start: usize, end: usize) -> Self {
        Node {
            kind,
            start,
            end,
            children: Vec::new(),
        }
    }

    /// Returns the text this node matched; `source` must be the text that was
    /// parsed.
    pub fn text<'t>(&self, source: &'t str) -> &'t str {
        &source[self.start..self.end]
    }

    pub fn children_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(move |c| c.kind == kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub lineno: u32,
    pub colno: u32,
}

impl Pos {
    /// Computes the 1-based line/column of byte `offset` in `text`.
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let before = &text[..offset];
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        Pos {
            lineno: before.matches('\n').count() as u32 + 1,
            colno: before[line_start..].chars().count() as u32 + 1,
        }
    }
}

/// Failure to match the grammar, reported at the furthest point any
/// alternative reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub fragment: String,
    pub offset: usize,
    /// Position of `offset` within `fragment`.
    pub pos: Pos,
    pub expected: Vec<String>,
    /// Source line on which `fragment` begins; 1 unless the fragment was cut
    /// out of a larger file.
    pub first_lineno: u32,
}

impl SyntaxError {
    pub fn with_first_lineno(mut self, first_lineno: u32) -> Self {
        self.first_lineno = first_lineno;
        self
    }

    /// Position of the failure in the source the fragment came from.
    pub fn source_pos(&self) -> Pos {
        Pos {
            lineno: self.pos.lineno + self.first_lineno.saturating_sub(1),
            colno: self.pos.colno,
        }
    }

    fn offending_line(&self) -> &str {
        self.fragment
            .lines()
            .nth((self.pos.lineno - 1) as usize)
            .unwrap_or("")
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self.source_pos();
        write!(
            f,
            "expected {} @ {}:{}\n{}\n{}^",
            self.expected.join(" or "),
            pos.lineno,
            pos.colno,
            self.offending_line(),
            " ".repeat((self.pos.colno as usize).saturating_sub(1))
        )
    }
}

impl std::error::Error for SyntaxError {}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub struct Grammar {
    rules: Vec<Expr>,
}

impl Grammar {
    /// Builds the instantiation-statement grammar.
    pub fn verilog_instance() -> Self {
        let separator = || choice(vec![lit(","), lit("")]);
        let mut rules = Vec::with_capacity(Rule::ALL.len());
        for r in Rule::ALL {
            let body = match r {
                Rule::Instance => seq(vec![
                    rule(Rule::Name),
                    optional(rule(Rule::ParameterList)),
                    rule(Rule::Name),
                    rule(Rule::PortList),
                    ws(),
                    lit(";"),
                    ws(),
                ]),
                Rule::ParameterList => seq(vec![
                    ws(),
                    lit("#"),
                    ws(),
                    lit("("),
                    one_or_more(rule(Rule::Parameter)),
                    ws(),
                    lit(")"),
                ]),
                Rule::Parameter => seq(vec![rule(Rule::Name), separator()]),
                Rule::PortList => seq(vec![
                    ws(),
                    lit("("),
                    one_or_more(rule(Rule::Port)),
                    ws(),
                    lit(")"),
                ]),
                Rule::Port => seq(vec![
                    ws(),
                    lit("."),
                    rule(Rule::Name),
                    lit("("),
                    rule(Rule::Name),
                    lit(")"),
                    ws(),
                    separator(),
                ]),
                Rule::Name => seq(vec![ws(), word(), ws()]),
            };
            rules.push(body);
        }
        Grammar { rules }
    }

    pub fn definition(&self, rule: Rule) -> &Expr {
        &self.rules[rule as usize]
    }

    /// Parses all of `text` as `rule`.
    pub fn parse(&self, rule: Rule, text: &str) -> Result<Node, SyntaxError> {
        let mut matcher = Matcher {
            grammar: self,
            text,
            furthest: 0,
            expected: BTreeSet::new(),
        };
        let node = matcher.match_expr(&Expr::Rule(rule), 0);
        match node {
            Some(node) if node.end == text.len() => {
                log::trace!("parse: {} matched {} bytes", rule.name(), node.end);
                Ok(node)
            }
            Some(node) => {
                matcher.fail(node.end, || "end of input".to_string());
                Err(matcher.into_error())
            }
            None => Err(matcher.into_error()),
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in Rule::ALL {
            writeln!(f, "{} = {}", r.name(), self.definition(r))?;
        }
        Ok(())
    }
}

pub static GRAMMAR: Lazy<Grammar> = Lazy::new(Grammar::verilog_instance);

/// Parses all of `text` as `rule` of the instantiation grammar.
pub fn parse_rule(rule: Rule, text: &str) -> Result<Node, SyntaxError> {
    GRAMMAR.parse(rule, text)
}

struct Matcher<'g, 't> {
    grammar: &'g Grammar,
    text: &'t str,
    furthest: usize,
    expected: BTreeSet<String>,
}

impl<'g, 't> Matcher<'g, 't> {
    fn fail(&mut self, pos: usize, expected: impl FnOnce() -> String) {
        if pos > self.furthest {
            self.furthest = pos;
            self.expected.clear();
        }
        if pos == self.furthest {
            self.expected.insert(expected());
        }
    }

    fn into_error(self) -> SyntaxError {
        log::trace!(
            "parse: failed @ byte {}; expected {:?}",
            self.furthest,
            self.expected
        );
        SyntaxError {
            fragment: self.text.to_string(),
            offset: self.furthest,
            pos: Pos::from_offset(self.text, self.furthest),
            expected: self.expected.into_iter().collect(),
            first_lineno: 1,
        }
    }

    fn match_expr(&mut self, expr: &Expr, pos: usize) -> Option<Node> {
        let text = self.text;
        let rest = &text[pos..];
        match expr {
            Expr::Literal(literal) => {
                if rest.starts_with(literal) {
                    Some(Node::leaf(NodeKind::Literal, pos, pos + literal.len()))
                } else {
                    self.fail(pos, || format!("{:?}", literal));
                    None
                }
            }
            Expr::Word => {
                let len = rest
                    .char_indices()
                    .find(|(_, c)| !is_word_char(*c))
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                if len == 0 {
                    self.fail(pos, || "identifier".to_string());
                    None
                } else {
                    Some(Node::leaf(NodeKind::Word, pos, pos + len))
                }
            }
            Expr::Whitespace => {
                let len = rest
                    .char_indices()
                    .find(|(_, c)| !c.is_whitespace())
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                Some(Node::leaf(NodeKind::Whitespace, pos, pos + len))
            }
            Expr::Rule(r) => {
                let grammar = self.grammar;
                let mut node = self.match_expr(grammar.definition(*r), pos)?;
                node.kind = NodeKind::from(*r);
                Some(node)
            }
            Expr::Sequence(items) => {
                let mut children = Vec::with_capacity(items.len());
                let mut cursor = pos;
                for item in items {
                    let child = self.match_expr(item, cursor)?;
                    cursor = child.end;
                    children.push(child);
                }
                Some(Node {
                    kind: NodeKind::Sequence,
                    start: pos,
                    end: cursor,
                    children,
                })
            }
            Expr::OneOrMore(inner) => {
                let first = self.match_expr(inner, pos)?;
                let mut cursor = first.end;
                let mut children = vec![first];
                // A repetition that stops making progress is done.
                while let Some(child) = self.match_expr(inner, cursor) {
                    if child.end == cursor {
                        break;
                    }
                    cursor = child.end;
                    children.push(child);
                }
                Some(Node {
                    kind: NodeKind::OneOrMore,
                    start: pos,
                    end: cursor,
                    children,
                })
            }
            Expr::Optional(inner) => {
                let children: Vec<Node> = self.match_expr(inner, pos).into_iter().collect();
                let end = children.first().map(|c| c.end).unwrap_or(pos);
                Some(Node {
                    kind: NodeKind::Optional,
                    start: pos,
                    end,
                    children,
                })
            }
            Expr::Choice(alternatives) => {
                for alternative in alternatives {
                    if let Some(child) = self.match_expr(alternative, pos) {
                        return Some(Node {
                            kind: NodeKind::Choice,
                            start: pos,
                            end: child.end,
                            children: vec![child],
                        });
                    }
                }
                None
            }
        }
    }
}
