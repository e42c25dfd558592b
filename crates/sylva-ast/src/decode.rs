//! Building trees from untyped JSON
//!
//! This is the one path where a structural field can receive something it
//! does not permit, so every child goes through [`assert_type`] or
//! [`assert_array_of`] before it is decoded. A node is only assembled once
//! all of its parts decoded, so a failure never leaves a half-set field.

use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::Shape;
use crate::validate::{assert_array_of, assert_type, type_of};
use crate::{
    BinaryExpression, BlockStatement, CallExpression, Comment, CommentKind, DecodeError,
    DeclarationKind, Expression, ExpressionStatement, Identifier, IfStatement, Literal,
    LiteralValue, Node, NodeKind, Position, Program, ReturnStatement, SourceRange, SourceType,
    Statement, TypeMismatch, VariableDeclaration, VariableDeclarator, VariantSet,
};

static NULL: Value = Value::Null;

/// Decode a value produced by [`Node::serialize`] (or any ESTree-shaped
/// document using the supported variants)
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, DecodeError>;
}

/// Decode a whole program
pub fn decode(value: &Value) -> Result<Program, DecodeError> {
    tracing::debug!("decoding program");
    Program::from_value(value)
}

/// Parse JSON text and decode it as a program
pub fn decode_str(source: &str) -> Result<Program, DecodeStrError> {
    let value: Value = serde_json::from_str(source)?;
    Ok(decode(&value)?)
}

/// Failure of [`decode_str`]
#[derive(Debug, thiserror::Error)]
pub enum DecodeStrError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Decode a comment list. All elements are checked before any is kept.
pub(crate) fn decode_comments(operation: &str, value: &Value) -> Result<Vec<Comment>, TypeMismatch> {
    let items = assert_array_of(operation, value, &["Comment"], false)?;
    items.iter().map(decode_comment).collect()
}

fn decode_comment(value: &Value) -> Result<Comment, TypeMismatch> {
    let map = value.as_object().ok_or_else(|| {
        TypeMismatch::new("Comment", &["Comment"], false, type_of(value), Shape::Value)
    })?;

    let kind = match map.get("kind").unwrap_or(&NULL) {
        Value::String(s) if s == "inline" => CommentKind::Inline,
        Value::String(s) if s == "multiline" => CommentKind::Multiline,
        other => {
            return Err(TypeMismatch::new(
                "Comment.kind",
                &["inline", "multiline"],
                false,
                describe_scalar(other),
                Shape::Value,
            ))
        }
    };

    let text = match map.get("text").unwrap_or(&NULL) {
        Value::String(s) => s.clone(),
        other => {
            return Err(TypeMismatch::new(
                "Comment.text",
                &["string"],
                false,
                type_of(other),
                Shape::Value,
            ))
        }
    };

    let location = match map.get("location") {
        Some(value) => decode_location("Comment.location", value)?,
        None => SourceRange::default(),
    };

    Ok(Comment {
        kind,
        text,
        location,
    })
}

fn describe_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        other => type_of(other),
    }
}

/// Decode a `{start, end}` record; `null` bounds stay unset
pub(crate) fn decode_location(operation: &str, value: &Value) -> Result<SourceRange, TypeMismatch> {
    match value {
        Value::Null => Ok(SourceRange::default()),
        Value::Object(map) => {
            let start = decode_position(&format!("{}.start", operation), map.get("start"))?;
            let end = decode_position(&format!("{}.end", operation), map.get("end"))?;
            Ok(SourceRange { start, end })
        }
        other => Err(TypeMismatch::new(
            operation,
            &["SourceRange"],
            true,
            type_of(other),
            Shape::Value,
        )),
    }
}

fn decode_position(operation: &str, value: Option<&Value>) -> Result<Option<Position>, TypeMismatch> {
    let value = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };

    let field = |name: &str| value.get(name).and_then(Value::as_u64).map(|n| n as usize);
    match (field("line"), field("column"), field("offset")) {
        (Some(line), Some(column), Some(offset)) => Ok(Some(Position::new(line, column, offset))),
        _ => Err(TypeMismatch::new(
            operation,
            &["Position"],
            true,
            type_of(value),
            Shape::Value,
        )),
    }
}

/// Field access for one tagged object
struct Fields<'v> {
    kind: NodeKind,
    map: &'v Map<String, Value>,
}

impl<'v> Fields<'v> {
    fn open(kind: NodeKind, value: &'v Value) -> Result<Self, DecodeError> {
        assert_type(kind.name(), value, &[kind.name()], false)?;
        let Value::Object(map) = value else {
            return Err(TypeMismatch::new(kind.name(), &[kind.name()], false, type_of(value), Shape::Value).into());
        };
        tracing::trace!(kind = kind.name(), "decoding node");
        Ok(Self { kind, map })
    }

    fn operation(&self, key: &str) -> String {
        format!("{}.{}", self.kind, key)
    }

    fn get(&self, key: &str) -> &'v Value {
        self.map.get(key).unwrap_or(&NULL)
    }

    fn node<T: FromValue + VariantSet>(&self, key: &str) -> Result<T, DecodeError> {
        let value = self.get(key);
        assert_type(&self.operation(key), value, &T::names(), false)?;
        T::from_value(value)
    }

    fn optional_node<T: FromValue + VariantSet>(&self, key: &str) -> Result<Option<T>, DecodeError> {
        let value = self.get(key);
        assert_type(&self.operation(key), value, &T::names(), true)?;
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }

    fn nodes<T: FromValue + VariantSet>(&self, key: &str) -> Result<Vec<T>, DecodeError> {
        let items = assert_array_of(&self.operation(key), self.get(key), &T::names(), false)?;
        items.iter().map(T::from_value).collect()
    }

    fn string(&self, key: &str) -> Result<String, DecodeError> {
        match self.get(key) {
            Value::String(s) => Ok(s.clone()),
            other => Err(TypeMismatch::new(self.operation(key), &["string"], false, type_of(other), Shape::Value).into()),
        }
    }

    /// A string naming one of a fixed set of values
    fn parse<T: FromStr>(&self, key: &str) -> Result<T, DecodeError> {
        let text = self.string(key)?;
        text.parse().map_err(|_| DecodeError::InvalidValue {
            operation: self.operation(key),
            value: text,
        })
    }

    /// Like [`parse`](Self::parse) but falls back to the default when absent
    fn parse_or_default<T: FromStr + Default>(&self, key: &str) -> Result<T, DecodeError> {
        match self.get(key) {
            Value::Null => Ok(T::default()),
            _ => self.parse(key),
        }
    }

    /// Install location and comments on a freshly built node
    fn finish<N: Node>(&self, mut node: N) -> Result<N, DecodeError> {
        if let Some(location) = self.map.get("location") {
            let location = decode_location(&self.operation("location"), location)?;
            node.base_mut().set_location(location);
        }
        if let Some(comments) = self.map.get("leadingComments") {
            node.try_set_leading_comments(comments)?;
        }
        if let Some(comments) = self.map.get("trailingComments") {
            node.try_set_trailing_comments(comments)?;
        }
        Ok(node)
    }
}

impl FromValue for Program {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::open(NodeKind::Program, value)?;
        let body = fields.nodes::<Statement>("body")?;
        let source_type: SourceType = fields.parse_or_default("sourceType")?;
        fields.finish(Program::new(body).with_source_type(source_type))
    }
}

impl FromValue for ExpressionStatement {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::open(NodeKind::ExpressionStatement, value)?;
        let expression = fields.node::<Expression>("expression")?;
        fields.finish(ExpressionStatement::new(expression))
    }
}

impl FromValue for VariableDeclaration {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::open(NodeKind::VariableDeclaration, value)?;
        let kind: DeclarationKind = fields.parse("kind")?;
        let declarations = fields.nodes::<VariableDeclarator>("declarations")?;
        fields.finish(VariableDeclaration::new(kind, declarations))
    }
}

impl FromValue for VariableDeclarator {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::open(NodeKind::VariableDeclarator, value)?;
        let id = fields.node::<Identifier>("id")?;
        let init = fields.optional_node::<Expression>("init")?;
        fields.finish(VariableDeclarator::new(id, init))
    }
}

impl FromValue for BlockStatement {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::open(NodeKind::BlockStatement, value)?;
        let body = fields.nodes::<Statement>("body")?;
        fields.finish(BlockStatement::new(body))
    }
}

impl FromValue for IfStatement {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::open(NodeKind::IfStatement, value)?;
        let test = fields.node::<Expression>("test")?;
        let consequent = fields.node::<Statement>("consequent")?;
        let alternate = fields.optional_node::<Statement>("alternate")?;
        fields.finish(IfStatement::new(test, consequent, alternate))
    }
}

impl FromValue for ReturnStatement {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::open(NodeKind::ReturnStatement, value)?;
        let argument = fields.optional_node::<Expression>("argument")?;
        fields.finish(ReturnStatement::new(argument))
    }
}

impl FromValue for Identifier {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::open(NodeKind::Identifier, value)?;
        let name = fields.string("name")?;
        fields.finish(Identifier::new(name))
    }
}

impl FromValue for Literal {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::open(NodeKind::Literal, value)?;
        let literal = match fields.get("value") {
            Value::Null => LiteralValue::Null,
            Value::Bool(b) => LiteralValue::Boolean(*b),
            Value::Number(n) => match n.as_f64() {
                Some(n) => LiteralValue::Number(n),
                None => {
                    return Err(DecodeError::InvalidValue {
                        operation: fields.operation("value"),
                        value: n.to_string(),
                    })
                }
            },
            Value::String(s) => LiteralValue::String(s.clone()),
            other => {
                return Err(TypeMismatch::new(
                    fields.operation("value"),
                    &["boolean", "number", "string"],
                    true,
                    type_of(other),
                    Shape::Value,
                )
                .into())
            }
        };
        let node = match fields.get("raw") {
            Value::Null => Literal::new(literal),
            _ => Literal::with_raw(literal, fields.string("raw")?),
        };
        fields.finish(node)
    }
}

impl FromValue for BinaryExpression {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::open(NodeKind::BinaryExpression, value)?;
        let operator = fields.parse("operator")?;
        let left = fields.node::<Expression>("left")?;
        let right = fields.node::<Expression>("right")?;
        fields.finish(BinaryExpression::new(operator, left, right))
    }
}

impl FromValue for CallExpression {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::open(NodeKind::CallExpression, value)?;
        let callee = fields.node::<Expression>("callee")?;
        let arguments = fields.nodes::<Expression>("arguments")?;
        fields.finish(CallExpression::new(callee, arguments))
    }
}

impl FromValue for Expression {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match NodeKind::from_name(&type_of(value)) {
            Some(NodeKind::Identifier) => Identifier::from_value(value).map(Expression::from),
            Some(NodeKind::Literal) => Literal::from_value(value).map(Expression::from),
            Some(NodeKind::BinaryExpression) => BinaryExpression::from_value(value).map(Expression::from),
            Some(NodeKind::CallExpression) => CallExpression::from_value(value).map(Expression::from),
            _ => Err(TypeMismatch::new("Expression", &Self::names(), false, type_of(value), Shape::Value).into()),
        }
    }
}

impl FromValue for Statement {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match NodeKind::from_name(&type_of(value)) {
            Some(NodeKind::ExpressionStatement) => ExpressionStatement::from_value(value).map(Statement::from),
            Some(NodeKind::VariableDeclaration) => VariableDeclaration::from_value(value).map(Statement::from),
            Some(NodeKind::BlockStatement) => BlockStatement::from_value(value).map(Statement::from),
            Some(NodeKind::IfStatement) => IfStatement::from_value(value).map(Statement::from),
            Some(NodeKind::ReturnStatement) => ReturnStatement::from_value(value).map(Statement::from),
            _ => Err(TypeMismatch::new("Statement", &Self::names(), false, type_of(value), Shape::Value).into()),
        }
    }
}
