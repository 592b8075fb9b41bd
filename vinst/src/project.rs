// SPDX-License-Identifier: Apache-2.0

//! Bottom-up reduction of an `Instance` parse tree into an [`InstanceRecord`].
//!
//! Every node is reduced after its children, by a single match over
//! [`NodeKind`]. Terminals reduce to the text they matched and anonymous
//! combinator nodes pass their reduced children through unchanged, so the
//! rule arms only ever see values in a handful of shapes.

use crate::grammar::{Node, NodeKind};
use crate::instance::InstanceRecord;
use crate::vinst_error::{Result, VinstError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<'t> {
    /// Text matched by a terminal.
    Leaf(&'t str),
    /// An identifier with surrounding whitespace removed.
    Name(&'t str),
    List(Vec<Value<'t>>),
    Instance(InstanceRecord),
}

impl<'t> Value<'t> {
    fn into_name(self) -> Result<String> {
        match self {
            Value::Name(name) => Ok(name.to_string()),
            other => Err(VinstError::Invariant(format!(
                "expected a name; got {:?}",
                other
            ))),
        }
    }

    fn into_names(self) -> Result<Vec<String>> {
        match self {
            Value::List(items) => items.into_iter().map(Value::into_name).collect(),
            other => Err(VinstError::Invariant(format!(
                "expected a list of names; got {:?}",
                other
            ))),
        }
    }
}

/// Reduces `node` (and its subtree) to a value; `source` is the parsed text.
pub fn visit<'t>(node: &Node, source: &'t str) -> Result<Value<'t>> {
    let children = node
        .children
        .iter()
        .map(|child| visit(child, source))
        .collect::<Result<Vec<_>>>()?;
    reduce(node, source, children)
}

/// Reduces an `Instance` tree to its record.
pub fn project(tree: &Node, source: &str) -> Result<InstanceRecord> {
    match visit(tree, source)? {
        Value::Instance(record) => Ok(record),
        other => Err(VinstError::Invariant(format!(
            "expected an instance at the root; got {:?}",
            other
        ))),
    }
}

/// Pairs each child node with its reduced value and keeps those of `kind`.
fn values_of_kind<'n, 't: 'n>(
    node: &'n Node,
    children: Vec<Value<'t>>,
    kind: NodeKind,
) -> impl Iterator<Item = Value<'t>> + 'n {
    node.children
        .iter()
        .zip(children)
        .filter(move |(child, _)| child.kind == kind)
        .map(|(_, value)| value)
}

fn nth_of_kind<'t>(
    node: &Node,
    children: Vec<Value<'t>>,
    kind: NodeKind,
    n: usize,
) -> Result<Value<'t>> {
    values_of_kind(node, children, kind)
        .nth(n)
        .ok_or_else(|| {
            VinstError::Invariant(format!(
                "{:?} node has no child #{} of kind {:?}",
                node.kind, n, kind
            ))
        })
}

fn reduce<'t>(node: &Node, source: &'t str, children: Vec<Value<'t>>) -> Result<Value<'t>> {
    match node.kind {
        NodeKind::Name => match nth_of_kind(node, children, NodeKind::Word, 0)? {
            Value::Leaf(word) => Ok(Value::Name(word)),
            other => Err(VinstError::Invariant(format!(
                "expected word text in name; got {:?}",
                other
            ))),
        },
        NodeKind::Parameter => nth_of_kind(node, children, NodeKind::Name, 0),
        NodeKind::ParameterList | NodeKind::PortList => {
            nth_of_kind(node, children, NodeKind::OneOrMore, 0)
        }
        // The declared port name is dropped; only the connected signal is kept.
        NodeKind::Port => nth_of_kind(node, children, NodeKind::Name, 1),
        NodeKind::Instance => {
            let mut module_name = None;
            let mut parameters = None;
            let mut port_names = None;
            for (child, value) in node.children.iter().zip(children) {
                match child.kind {
                    // The second name is the instance name, which is not kept.
                    NodeKind::Name if module_name.is_none() => {
                        module_name = Some(value.into_name()?);
                    }
                    NodeKind::Optional => {
                        parameters = match value {
                            Value::List(mut present) if present.len() == 1 => {
                                present.pop().map(Value::into_names).transpose()?
                            }
                            _ => None,
                        };
                    }
                    NodeKind::PortList => port_names = Some(value.into_names()?),
                    _ => {}
                }
            }
            match (module_name, port_names) {
                (Some(module_name), Some(port_names)) => Ok(Value::Instance(InstanceRecord {
                    module_name,
                    parameters,
                    port_names,
                })),
                _ => Err(VinstError::Invariant(
                    "instance node lacks a module name or port list".to_string(),
                )),
            }
        }
        NodeKind::Whitespace | NodeKind::Word | NodeKind::Literal => {
            Ok(Value::Leaf(node.text(source)))
        }
        NodeKind::Sequence | NodeKind::OneOrMore | NodeKind::Optional | NodeKind::Choice => {
            Ok(Value::List(children))
        }
    }
}
