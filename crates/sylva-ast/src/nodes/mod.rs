//! Concrete node variants

mod expr;
mod stmt;

pub use expr::*;
pub use stmt::*;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Node, VariantSet};

/// Identity of a concrete node variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    Program,
    ExpressionStatement,
    VariableDeclaration,
    VariableDeclarator,
    BlockStatement,
    IfStatement,
    ReturnStatement,
    Identifier,
    Literal,
    BinaryExpression,
    CallExpression,
}

impl NodeKind {
    pub const ALL: &'static [NodeKind] = &[
        NodeKind::Program,
        NodeKind::ExpressionStatement,
        NodeKind::VariableDeclaration,
        NodeKind::VariableDeclarator,
        NodeKind::BlockStatement,
        NodeKind::IfStatement,
        NodeKind::ReturnStatement,
        NodeKind::Identifier,
        NodeKind::Literal,
        NodeKind::BinaryExpression,
        NodeKind::CallExpression,
    ];

    /// Stable tag used in serialized output
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::ExpressionStatement => "ExpressionStatement",
            NodeKind::VariableDeclaration => "VariableDeclaration",
            NodeKind::VariableDeclarator => "VariableDeclarator",
            NodeKind::BlockStatement => "BlockStatement",
            NodeKind::IfStatement => "IfStatement",
            NodeKind::ReturnStatement => "ReturnStatement",
            NodeKind::Identifier => "Identifier",
            NodeKind::Literal => "Literal",
            NodeKind::BinaryExpression => "BinaryExpression",
            NodeKind::CallExpression => "CallExpression",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    pub fn is_statement(self) -> bool {
        Statement::admits(self)
    }

    pub fn is_expression(self) -> bool {
        Expression::admits(self)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Literal(Literal),
    Binary(Box<BinaryExpression>),
    Call(Box<CallExpression>),
}

impl Expression {
    pub fn as_node(&self) -> &dyn Node {
        match self {
            Expression::Identifier(n) => n,
            Expression::Literal(n) => n,
            Expression::Binary(n) => &**n,
            Expression::Call(n) => &**n,
        }
    }

    pub fn as_node_mut(&mut self) -> &mut dyn Node {
        match self {
            Expression::Identifier(n) => n,
            Expression::Literal(n) => n,
            Expression::Binary(n) => &mut **n,
            Expression::Call(n) => &mut **n,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.as_node().kind()
    }
}

impl VariantSet for Expression {
    const KINDS: &'static [NodeKind] = &[
        NodeKind::Identifier,
        NodeKind::Literal,
        NodeKind::BinaryExpression,
        NodeKind::CallExpression,
    ];
}

impl From<Identifier> for Expression {
    fn from(node: Identifier) -> Self {
        Expression::Identifier(node)
    }
}

impl From<Literal> for Expression {
    fn from(node: Literal) -> Self {
        Expression::Literal(node)
    }
}

impl From<BinaryExpression> for Expression {
    fn from(node: BinaryExpression) -> Self {
        Expression::Binary(Box::new(node))
    }
}

impl From<CallExpression> for Expression {
    fn from(node: CallExpression) -> Self {
        Expression::Call(Box::new(node))
    }
}

/// Any statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(ExpressionStatement),
    VariableDeclaration(VariableDeclaration),
    Block(BlockStatement),
    If(Box<IfStatement>),
    Return(ReturnStatement),
}

impl Statement {
    pub fn as_node(&self) -> &dyn Node {
        match self {
            Statement::Expression(n) => n,
            Statement::VariableDeclaration(n) => n,
            Statement::Block(n) => n,
            Statement::If(n) => &**n,
            Statement::Return(n) => n,
        }
    }

    pub fn as_node_mut(&mut self) -> &mut dyn Node {
        match self {
            Statement::Expression(n) => n,
            Statement::VariableDeclaration(n) => n,
            Statement::Block(n) => n,
            Statement::If(n) => &mut **n,
            Statement::Return(n) => n,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.as_node().kind()
    }
}

impl VariantSet for Statement {
    const KINDS: &'static [NodeKind] = &[
        NodeKind::ExpressionStatement,
        NodeKind::VariableDeclaration,
        NodeKind::BlockStatement,
        NodeKind::IfStatement,
        NodeKind::ReturnStatement,
    ];
}

impl From<ExpressionStatement> for Statement {
    fn from(node: ExpressionStatement) -> Self {
        Statement::Expression(node)
    }
}

impl From<VariableDeclaration> for Statement {
    fn from(node: VariableDeclaration) -> Self {
        Statement::VariableDeclaration(node)
    }
}

impl From<BlockStatement> for Statement {
    fn from(node: BlockStatement) -> Self {
        Statement::Block(node)
    }
}

impl From<IfStatement> for Statement {
    fn from(node: IfStatement) -> Self {
        Statement::If(Box::new(node))
    }
}

impl From<ReturnStatement> for Statement {
    fn from(node: ReturnStatement) -> Self {
        Statement::Return(node)
    }
}
