//! Program and statement nodes

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::{Expression, Identifier, Node, NodeBase, NodeKind, Property, Reflect, Statement};

fn statements_to_value(statements: &[Statement]) -> Value {
    Value::Array(statements.iter().map(|s| s.as_node().serialize()).collect())
}

fn optional_to_value(node: Option<&dyn Node>) -> Value {
    node.map_or(Value::Null, |n| n.serialize())
}

/// Whether a program is a classic script or an ES module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceType {
    #[default]
    Script,
    Module,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Script => "script",
            SourceType::Module => "module",
        }
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "script" => Ok(SourceType::Script),
            "module" => Ok(SourceType::Module),
            other => Err(other.to_string()),
        }
    }
}

/// Root of a tree
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    base: NodeBase,
    pub source_type: SourceType,
    pub body: Vec<Statement>,
}

impl Program {
    pub fn new(body: Vec<Statement>) -> Self {
        Self {
            base: NodeBase::new(),
            source_type: SourceType::default(),
            body,
        }
    }

    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = source_type;
        self
    }
}

impl Reflect for Program {
    const KIND: NodeKind = NodeKind::Program;
    const PROPERTIES: &'static [Property<Self>] = properties!(Program {
        "sourceType" => |n| Value::from(n.source_type.as_str()),
        "body" => |n| statements_to_value(&n.body),
    });
}

impl_node!(Program, |n| n.body.iter().map(Statement::as_node).collect());

/// Expression in statement position: `foo();`
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    base: NodeBase,
    pub expression: Expression,
}

impl ExpressionStatement {
    pub fn new(expression: Expression) -> Self {
        Self {
            base: NodeBase::new(),
            expression,
        }
    }
}

impl Reflect for ExpressionStatement {
    const KIND: NodeKind = NodeKind::ExpressionStatement;
    const PROPERTIES: &'static [Property<Self>] = properties!(ExpressionStatement {
        "expression" => |n| n.expression.as_node().serialize(),
    });
}

impl_node!(ExpressionStatement, |n| vec![n.expression.as_node()]);

/// `var`, `let` or `const`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclarationKind {
    #[default]
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Var => "var",
            DeclarationKind::Let => "let",
            DeclarationKind::Const => "const",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclarationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "var" => Ok(DeclarationKind::Var),
            "let" => Ok(DeclarationKind::Let),
            "const" => Ok(DeclarationKind::Const),
            other => Err(other.to_string()),
        }
    }
}

/// Variable declaration: `let a = 1, b;`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    base: NodeBase,
    pub declaration_kind: DeclarationKind,
    pub declarations: Vec<VariableDeclarator>,
}

impl VariableDeclaration {
    pub fn new(declaration_kind: DeclarationKind, declarations: Vec<VariableDeclarator>) -> Self {
        Self {
            base: NodeBase::new(),
            declaration_kind,
            declarations,
        }
    }
}

impl Reflect for VariableDeclaration {
    const KIND: NodeKind = NodeKind::VariableDeclaration;
    const PROPERTIES: &'static [Property<Self>] = properties!(VariableDeclaration {
        "kind" => |n| Value::from(n.declaration_kind.as_str()),
        "declarations" => |n| Value::Array(n.declarations.iter().map(|d| d.serialize()).collect()),
    });
}

impl_node!(VariableDeclaration, |n| n
    .declarations
    .iter()
    .map(|d| d as &dyn Node)
    .collect());

/// One binding of a declaration: `a = 1`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    base: NodeBase,
    pub id: Identifier,
    pub init: Option<Expression>,
}

impl VariableDeclarator {
    pub fn new(id: Identifier, init: Option<Expression>) -> Self {
        Self {
            base: NodeBase::new(),
            id,
            init,
        }
    }
}

impl Reflect for VariableDeclarator {
    const KIND: NodeKind = NodeKind::VariableDeclarator;
    const PROPERTIES: &'static [Property<Self>] = properties!(VariableDeclarator {
        "id" => |n| n.id.serialize(),
        "init" => |n| optional_to_value(n.init.as_ref().map(Expression::as_node)),
    });
}

impl_node!(VariableDeclarator, |n| {
    let mut children: Vec<&dyn Node> = vec![&n.id];
    children.extend(n.init.as_ref().map(Expression::as_node));
    children
});

/// Braced statement list: `{ a(); b(); }`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStatement {
    base: NodeBase,
    pub body: Vec<Statement>,
}

impl BlockStatement {
    pub fn new(body: Vec<Statement>) -> Self {
        Self {
            base: NodeBase::new(),
            body,
        }
    }
}

impl Reflect for BlockStatement {
    const KIND: NodeKind = NodeKind::BlockStatement;
    const PROPERTIES: &'static [Property<Self>] = properties!(BlockStatement {
        "body" => |n| statements_to_value(&n.body),
    });
}

impl_node!(BlockStatement, |n| n.body.iter().map(Statement::as_node).collect());

/// Conditional: `if (test) consequent else alternate`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    base: NodeBase,
    pub test: Expression,
    pub consequent: Statement,
    pub alternate: Option<Statement>,
}

impl IfStatement {
    pub fn new(test: Expression, consequent: Statement, alternate: Option<Statement>) -> Self {
        Self {
            base: NodeBase::new(),
            test,
            consequent,
            alternate,
        }
    }
}

impl Reflect for IfStatement {
    const KIND: NodeKind = NodeKind::IfStatement;
    const PROPERTIES: &'static [Property<Self>] = properties!(IfStatement {
        "test" => |n| n.test.as_node().serialize(),
        "consequent" => |n| n.consequent.as_node().serialize(),
        "alternate" => |n| optional_to_value(n.alternate.as_ref().map(Statement::as_node)),
    });
}

impl_node!(IfStatement, |n| {
    let mut children = vec![n.test.as_node(), n.consequent.as_node()];
    children.extend(n.alternate.as_ref().map(Statement::as_node));
    children
});

/// `return;` or `return value;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    base: NodeBase,
    pub argument: Option<Expression>,
}

impl ReturnStatement {
    pub fn new(argument: Option<Expression>) -> Self {
        Self {
            base: NodeBase::new(),
            argument,
        }
    }
}

impl Reflect for ReturnStatement {
    const KIND: NodeKind = NodeKind::ReturnStatement;
    const PROPERTIES: &'static [Property<Self>] = properties!(ReturnStatement {
        "argument" => |n| optional_to_value(n.argument.as_ref().map(Expression::as_node)),
    });
}

impl_node!(ReturnStatement, |n| n
    .argument
    .as_ref()
    .map(Expression::as_node)
    .into_iter()
    .collect());
