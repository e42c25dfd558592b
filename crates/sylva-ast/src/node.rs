//! The base contract shared by every node variant

use std::fmt;

use serde_json::Value;

use crate::decode::decode_comments;
use crate::{
    Comment, Formatter, NodeKind, Position, Render, Renderer, SourceRange, TraverseOptions,
    Traverser, TypeMismatch, Visit, VisitAction, VisitContext,
};

/// Location and comments owned by every node.
///
/// Created empty with the node: both location bounds unset, no comments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeBase {
    location: SourceRange,
    leading_comments: Vec<Comment>,
    trailing_comments: Vec<Comment>,
}

impl NodeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> &SourceRange {
        &self.location
    }

    pub fn set_start_position(&mut self, position: Position) {
        self.location.start = Some(position);
    }

    pub fn set_end_position(&mut self, position: Position) {
        self.location.end = Some(position);
    }

    pub fn set_location(&mut self, location: SourceRange) {
        self.location = location;
    }

    pub fn leading_comments(&self) -> &[Comment] {
        &self.leading_comments
    }

    pub fn trailing_comments(&self) -> &[Comment] {
        &self.trailing_comments
    }

    pub fn set_leading_comments(&mut self, comments: Vec<Comment>) {
        self.leading_comments = comments;
    }

    pub fn set_trailing_comments(&mut self, comments: Vec<Comment>) {
        self.trailing_comments = comments;
    }
}

/// A syntax tree node.
///
/// Concrete variants implement the required methods through `impl_node!`
/// and declare their serialized shape through [`Reflect`](crate::Reflect).
/// Everything else is provided here and works the same for every variant.
pub trait Node: Render + fmt::Debug {
    /// Identity of the concrete variant. Fixed by the type, never stored.
    fn kind(&self) -> NodeKind;

    fn base(&self) -> &NodeBase;

    fn base_mut(&mut self) -> &mut NodeBase;

    /// Structural children in field declaration order
    fn children(&self) -> Vec<&dyn Node>;

    /// Declared property names, in serialization order
    fn property_names(&self) -> Vec<&'static str>;

    /// Generic keyed record built from the declared properties
    fn serialize(&self) -> Value;

    fn location(&self) -> &SourceRange {
        self.base().location()
    }

    fn set_start_position(&mut self, position: Position) -> &mut Self
    where
        Self: Sized,
    {
        self.base_mut().set_start_position(position);
        self
    }

    fn set_end_position(&mut self, position: Position) -> &mut Self
    where
        Self: Sized,
    {
        self.base_mut().set_end_position(position);
        self
    }

    fn leading_comments(&self) -> &[Comment] {
        self.base().leading_comments()
    }

    fn trailing_comments(&self) -> &[Comment] {
        self.base().trailing_comments()
    }

    fn set_leading_comments(&mut self, comments: Vec<Comment>) -> &mut Self
    where
        Self: Sized,
    {
        self.base_mut().set_leading_comments(comments);
        self
    }

    fn set_trailing_comments(&mut self, comments: Vec<Comment>) -> &mut Self
    where
        Self: Sized,
    {
        self.base_mut().set_trailing_comments(comments);
        self
    }

    /// Replace the leading comments from untyped input.
    ///
    /// Every element must be a `Comment` record. On failure the current list
    /// is left as it was.
    fn try_set_leading_comments(&mut self, comments: &Value) -> Result<(), TypeMismatch> {
        let operation = format!("{}.leadingComments", self.kind());
        let comments = decode_comments(&operation, comments)?;
        self.base_mut().set_leading_comments(comments);
        Ok(())
    }

    /// Replace the trailing comments from untyped input. See
    /// [`try_set_leading_comments`](Node::try_set_leading_comments).
    fn try_set_trailing_comments(&mut self, comments: &Value) -> Result<(), TypeMismatch> {
        let operation = format!("{}.trailingComments", self.kind());
        let comments = decode_comments(&operation, comments)?;
        self.base_mut().set_trailing_comments(comments);
        Ok(())
    }

    /// Walk this node and its descendants with `visitor`
    fn traverse<F>(&self, visitor: F, options: TraverseOptions) -> &Self
    where
        Self: Sized,
        F: FnMut(Visit<'_>, &VisitContext<'_>) -> VisitAction,
    {
        Traverser::new(options).add_function(visitor).traverse(self);
        self
    }

    /// Source text for this node under `formatter`
    fn render(&self, formatter: &Formatter) -> String
    where
        Self: Sized,
    {
        Renderer::new(formatter).render(self)
    }
}

/// A closed set of variants a structural field may hold
pub trait VariantSet {
    const KINDS: &'static [NodeKind];

    fn names() -> Vec<&'static str> {
        Self::KINDS.iter().map(|kind| kind.name()).collect()
    }

    fn admits(kind: NodeKind) -> bool {
        Self::KINDS.contains(&kind)
    }
}
