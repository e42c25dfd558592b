//! Expression nodes

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::{Expression, NodeBase, NodeKind, Property, Reflect};

/// Identifier: `x`, `console`
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    base: NodeBase,
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: NodeBase::new(),
            name: name.into(),
        }
    }
}

impl Reflect for Identifier {
    const KIND: NodeKind = NodeKind::Identifier;
    const PROPERTIES: &'static [Property<Self>] = properties!(Identifier {
        "name" => |n| Value::from(n.name.as_str()),
    });
}

impl_node!(Identifier);

/// The value carried by a literal. Null is a valid value.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

impl LiteralValue {
    pub fn to_value(&self) -> Value {
        match self {
            LiteralValue::Null => Value::Null,
            LiteralValue::Boolean(b) => Value::Bool(*b),
            LiteralValue::Number(n) => number_to_value(*n),
            LiteralValue::String(s) => Value::String(s.clone()),
        }
    }

    /// Source form with double quotes, used when no raw text is known
    pub fn default_raw(&self) -> String {
        match self {
            LiteralValue::Null => "null".to_string(),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::Number(n) => format_number(*n),
            LiteralValue::String(s) => quote_string(s, '"'),
        }
    }
}

// Integral values are emitted as JSON integers so that decoded input
// serializes back to the same document.
fn number_to_value(n: f64) -> Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n < 0.0 { "-" } else { "" };
        format!("{}Infinity", sign)
    } else {
        n.to_string()
    }
}

/// Quote and escape `s` with `quote` as delimiter
pub(crate) fn quote_string(s: &str, quote: char) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push(quote);
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\u{2028}' => result.push_str("\\u2028"),
            '\u{2029}' => result.push_str("\\u2029"),
            c if c == quote => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result.push(quote);
    result
}

/// Literal: `42`, `"hello"`, `true`, `null`
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    base: NodeBase,
    pub value: LiteralValue,
    /// Source text of the literal as written
    pub raw: String,
}

impl Literal {
    pub fn new(value: LiteralValue) -> Self {
        let raw = value.default_raw();
        Self::with_raw(value, raw)
    }

    pub fn with_raw(value: LiteralValue, raw: impl Into<String>) -> Self {
        Self {
            base: NodeBase::new(),
            value,
            raw: raw.into(),
        }
    }

    pub fn null() -> Self {
        Self::new(LiteralValue::Null)
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(LiteralValue::Boolean(value))
    }

    pub fn number(value: f64) -> Self {
        Self::new(LiteralValue::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(LiteralValue::String(value.into()))
    }
}

impl Reflect for Literal {
    const KIND: NodeKind = NodeKind::Literal;
    const PROPERTIES: &'static [Property<Self>] = properties!(Literal {
        "value" => |n| n.value.to_value(),
        "raw" => |n| Value::from(n.raw.as_str()),
    });
}

impl_node!(Literal);

/// Binary operators, with their binding power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,
    InstanceOf,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
}

impl BinaryOperator {
    pub const ALL: &'static [BinaryOperator] = &[
        BinaryOperator::Or,
        BinaryOperator::And,
        BinaryOperator::BitOr,
        BinaryOperator::BitXor,
        BinaryOperator::BitAnd,
        BinaryOperator::Eq,
        BinaryOperator::NotEq,
        BinaryOperator::StrictEq,
        BinaryOperator::StrictNotEq,
        BinaryOperator::Lt,
        BinaryOperator::LtEq,
        BinaryOperator::Gt,
        BinaryOperator::GtEq,
        BinaryOperator::In,
        BinaryOperator::InstanceOf,
        BinaryOperator::Shl,
        BinaryOperator::Shr,
        BinaryOperator::UShr,
        BinaryOperator::Add,
        BinaryOperator::Sub,
        BinaryOperator::Mul,
        BinaryOperator::Div,
        BinaryOperator::Mod,
        BinaryOperator::Exp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Or => "||",
            BinaryOperator::And => "&&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::StrictEq => "===",
            BinaryOperator::StrictNotEq => "!==",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::In => "in",
            BinaryOperator::InstanceOf => "instanceof",
            BinaryOperator::Shl => "<<",
            BinaryOperator::Shr => ">>",
            BinaryOperator::UShr => ">>>",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Exp => "**",
        }
    }

    /// Higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::BitOr => 3,
            BinaryOperator::BitXor => 4,
            BinaryOperator::BitAnd => 5,
            BinaryOperator::Eq
            | BinaryOperator::NotEq
            | BinaryOperator::StrictEq
            | BinaryOperator::StrictNotEq => 6,
            BinaryOperator::Lt
            | BinaryOperator::LtEq
            | BinaryOperator::Gt
            | BinaryOperator::GtEq
            | BinaryOperator::In
            | BinaryOperator::InstanceOf => 7,
            BinaryOperator::Shl | BinaryOperator::Shr | BinaryOperator::UShr => 8,
            BinaryOperator::Add | BinaryOperator::Sub => 9,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => 10,
            BinaryOperator::Exp => 11,
        }
    }

    pub fn is_right_associative(self) -> bool {
        self == BinaryOperator::Exp
    }

    /// Keyword operators always need surrounding whitespace
    pub fn is_keyword(self) -> bool {
        matches!(self, BinaryOperator::In | BinaryOperator::InstanceOf)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl FromStr for BinaryOperator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

/// Binary operation: `a + b`, `x === y`
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    base: NodeBase,
    pub operator: BinaryOperator,
    pub left: Expression,
    pub right: Expression,
}

impl BinaryExpression {
    pub fn new(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Self {
            base: NodeBase::new(),
            operator,
            left,
            right,
        }
    }
}

impl Reflect for BinaryExpression {
    const KIND: NodeKind = NodeKind::BinaryExpression;
    const PROPERTIES: &'static [Property<Self>] = properties!(BinaryExpression {
        "operator" => |n| Value::from(n.operator.as_str()),
        "left" => |n| n.left.as_node().serialize(),
        "right" => |n| n.right.as_node().serialize(),
    });
}

impl_node!(BinaryExpression, |n| vec![n.left.as_node(), n.right.as_node()]);

/// Function call: `foo(a, b)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    base: NodeBase,
    pub callee: Expression,
    pub arguments: Vec<Expression>,
}

impl CallExpression {
    pub fn new(callee: Expression, arguments: Vec<Expression>) -> Self {
        Self {
            base: NodeBase::new(),
            callee,
            arguments,
        }
    }
}

impl Reflect for CallExpression {
    const KIND: NodeKind = NodeKind::CallExpression;
    const PROPERTIES: &'static [Property<Self>] = properties!(CallExpression {
        "callee" => |n| n.callee.as_node().serialize(),
        "arguments" => |n| Value::Array(n.arguments.iter().map(|a| a.as_node().serialize()).collect()),
    });
}

impl_node!(CallExpression, |n| {
    let mut children = vec![n.callee.as_node()];
    children.extend(n.arguments.iter().map(Expression::as_node));
    children
});
