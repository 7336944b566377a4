// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! The syntax tree produced by the bolt parsers.

use crate::stream::Stream;
use bolt_common::Span;
use serde::{Serialize, Serializer};
use std::fmt::{Debug, Display};
use strum::{Display as StrumDisplay, EnumString, IntoStaticStr};

/// A syntax tree node with the source range it was parsed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub node: Ast,
    pub span: Span,
}

impl Node {
    pub fn new(node: Ast, span: Span) -> Self {
        Self { node, span }
    }

    pub fn boxed(self) -> Box<Node> {
        Box::new(self)
    }

    /// The identifier of a command node.
    pub fn command_identifier(&self) -> Option<&str> {
        match &self.node {
            Ast::Command { identifier, .. } => Some(identifier),
            _ => None,
        }
    }

    /// The commands of a root node.
    pub fn commands(&self) -> &[Node] {
        match &self.node {
            Ast::Root { commands } => commands,
            _ => &[],
        }
    }

    pub fn is_target(&self) -> bool {
        matches!(
            self.node,
            Ast::TargetIdentifier { .. }
                | Ast::TargetAttribute { .. }
                | Ast::TargetItem { .. }
                | Ast::TargetUnpack { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Ast {
    Root {
        commands: Vec<Node>,
    },
    Command {
        identifier: String,
        arguments: Vec<Node>,
    },

    Identifier {
        value: String,
    },
    /// A name bound by an import, kept apart from [`Ast::Identifier`] since it is not a read.
    ImportedIdentifier {
        value: String,
    },
    Value {
        value: Value,
    },
    FormatString {
        fmt: String,
        values: Vec<Node>,
    },
    Tuple {
        items: Vec<Node>,
    },
    List {
        items: Vec<Node>,
    },
    Dict {
        items: Vec<Node>,
    },
    DictItem {
        key: Box<Node>,
        value: Box<Node>,
    },
    Binary {
        operator: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Unary {
        operator: UnaryOp,
        value: Box<Node>,
    },
    Call {
        value: Box<Node>,
        arguments: Vec<Node>,
    },
    Attribute {
        value: Box<Node>,
        name: String,
    },
    Lookup {
        value: Box<Node>,
        arguments: Vec<Node>,
    },
    Slice {
        start: Option<Box<Node>>,
        stop: Option<Box<Node>>,
        step: Option<Box<Node>>,
    },
    Keyword {
        name: String,
        value: Box<Node>,
    },
    Unpack {
        kind: UnpackKind,
        value: Box<Node>,
    },
    Interpolation {
        prefix: Option<String>,
        unpack: Option<String>,
        converter: String,
        value: Box<Node>,
    },

    TargetIdentifier {
        value: String,
        rebind: bool,
    },
    TargetAttribute {
        name: String,
        value: Box<Node>,
    },
    TargetItem {
        value: Box<Node>,
        arguments: Vec<Node>,
    },
    TargetUnpack {
        targets: Vec<Node>,
    },
    Assignment {
        operator: AssignOp,
        target: Box<Node>,
        value: Box<Node>,
    },

    FunctionSignature {
        name: String,
        arguments: Vec<Node>,
    },
    SignatureArgument {
        name: String,
        default: Option<Box<Node>>,
    },
    /// A function body that has not been parsed yet.
    FunctionRoot {
        body: DeferredBody,
    },

    ResourceLocation {
        namespace: Option<String>,
        path: String,
        is_tag: bool,
    },
    /// A primitive argument of the host command grammar, kept as written.
    HostLiteral {
        parser: String,
        text: String,
    },
    Vector {
        components: Vec<Node>,
    },
}

impl Ast {
    pub fn resource_location(location: &str, is_tag: bool) -> Self {
        match location.split_once(':') {
            Some((namespace, path)) => Ast::ResourceLocation {
                namespace: Some(namespace.to_string()),
                path: path.to_string(),
                is_tag,
            },
            None => Ast::ResourceLocation {
                namespace: None,
                path: location.to_string(),
                is_tag,
            },
        }
    }
}

/// Literal values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Interpret numeric source text, preferring integers. Integer text that doesn't fit an
    /// `i64` is rejected rather than rounded to a float.
    pub fn from_number(text: &str) -> Option<Self> {
        if let Ok(i) = text.parse::<i64>() {
            return Some(Value::Int(i));
        }
        let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
        if digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        text.parse::<f64>().ok().map(Value::Float)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString, IntoStaticStr)]
pub enum BinaryOp {
    #[strum(serialize = "or")]
    Or,
    #[strum(serialize = "and")]
    And,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    NEq,
    #[strum(serialize = "<=")]
    LtE,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = ">=")]
    GtE,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = "not in")]
    NotIn,
    #[strum(serialize = "in")]
    In,
    #[strum(serialize = "is not")]
    IsNot,
    #[strum(serialize = "is")]
    Is,
    #[strum(serialize = "|")]
    BitOr,
    #[strum(serialize = "^")]
    BitXor,
    #[strum(serialize = "&")]
    BitAnd,
    #[strum(serialize = "<<")]
    Shl,
    #[strum(serialize = ">>")]
    Shr,
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "//")]
    FloorDiv,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Mod,
    #[strum(serialize = "**")]
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString, IntoStaticStr)]
pub enum UnaryOp {
    #[strum(serialize = "not")]
    Not,
    #[strum(serialize = "+")]
    Pos,
    #[strum(serialize = "-")]
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString, IntoStaticStr)]
pub enum AssignOp {
    #[strum(serialize = "=")]
    Assign,
    #[strum(serialize = "+=")]
    Add,
    #[strum(serialize = "-=")]
    Sub,
    #[strum(serialize = "*=")]
    Mul,
    #[strum(serialize = "//=")]
    FloorDiv,
    #[strum(serialize = "/=")]
    Div,
    #[strum(serialize = "%=")]
    Mod,
    #[strum(serialize = "&=")]
    BitAnd,
    #[strum(serialize = "|=")]
    BitOr,
    #[strum(serialize = "^=")]
    BitXor,
    #[strum(serialize = "<<=")]
    Shl,
    #[strum(serialize = ">>=")]
    Shr,
    #[strum(serialize = "**=")]
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum UnpackKind {
    List,
    Dict,
}

macro_rules! serialize_as_str {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.into())
                }
            }
        )*
    };
}

serialize_as_str!(BinaryOp, UnaryOp, AssignOp, UnpackKind);

/// The stream a function body is re-parsed from once the enclosing root is complete.
#[derive(Clone)]
pub struct DeferredBody {
    pub stream: Box<Stream>,
}

impl DeferredBody {
    pub fn new(stream: Stream) -> Self {
        Self {
            stream: Box::new(stream),
        }
    }
}

impl Debug for DeferredBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredBody")
            .field("position", &self.stream.position())
            .finish()
    }
}

impl PartialEq for DeferredBody {
    fn eq(&self, other: &Self) -> bool {
        std::rc::Rc::ptr_eq(self.stream.source(), other.stream.source())
            && self.stream.position() == other.stream.position()
    }
}

impl Serialize for DeferredBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.stream.position() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_operator_spelling() {
        assert_eq!(BinaryOp::from_str("not in").unwrap(), BinaryOp::NotIn);
        assert_eq!(BinaryOp::from_str("**").unwrap(), BinaryOp::Pow);
        assert_eq!(AssignOp::from_str("//=").unwrap(), AssignOp::FloorDiv);
        assert_eq!(UnpackKind::Dict.to_string(), "dict");
        assert!(BinaryOp::from_str("===").is_err());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(Value::from_number("42"), Some(Value::Int(42)));
        assert_eq!(Value::from_number("1.5e3"), Some(Value::Float(1500.0)));
        assert_eq!(Value::from_number("99999999999999999999"), None);
        assert_eq!(Value::from_number("-99999999999999999999"), None);
        assert_eq!(Value::from_number("1e20"), Some(Value::Float(1e20)));
    }

    #[test]
    fn test_resource_location_split() {
        assert_eq!(
            Ast::resource_location("demo:foo/bar", false),
            Ast::ResourceLocation {
                namespace: Some("demo".into()),
                path: "foo/bar".into(),
                is_tag: false
            }
        );
    }
}
