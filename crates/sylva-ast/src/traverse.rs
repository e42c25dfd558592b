//! Tree walking
//!
//! The traverser only relies on [`Node::children`] and the comment lists, so
//! it works for any variant without knowing its fields.

use serde::{Deserialize, Serialize};

use crate::{Comment, CommentPlacement, Node};

/// Whether a node is visited before or after its contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Order {
    #[default]
    TopDown,
    BottomUp,
}

/// Traverser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TraverseOptions {
    pub order: Order,
    /// Visit each node's leading comments
    pub leading_comments: bool,
    /// Visit each node's trailing comments
    pub trailing_comments: bool,
    /// Do not call the visitors for the node the walk starts from
    pub skip_starting_node: bool,
}

impl TraverseOptions {
    pub fn bottom_up(mut self) -> Self {
        self.order = Order::BottomUp;
        self
    }

    pub fn with_comments(mut self) -> Self {
        self.leading_comments = true;
        self.trailing_comments = true;
        self
    }

    pub fn skip_starting_node(mut self) -> Self {
        self.skip_starting_node = true;
        self
    }
}

/// What a visitor is looking at
#[derive(Debug, Clone, Copy)]
pub enum Visit<'a> {
    Node(&'a dyn Node),
    Comment {
        comment: &'a Comment,
        placement: CommentPlacement,
    },
}

impl<'a> Visit<'a> {
    pub fn as_node(&self) -> Option<&'a dyn Node> {
        match self {
            Visit::Node(node) => Some(*node),
            Visit::Comment { .. } => None,
        }
    }

    pub fn as_comment(&self) -> Option<&'a Comment> {
        match self {
            Visit::Comment { comment, .. } => Some(comment),
            Visit::Node(_) => None,
        }
    }
}

/// Where the visited item sits in the tree
#[derive(Debug, Clone, Copy)]
pub struct VisitContext<'a> {
    /// Owning node; `None` for the starting node
    pub parent: Option<&'a dyn Node>,
    /// Distance from the starting node
    pub depth: usize,
}

/// Returned by visitors to steer the walk.
///
/// When several visitors disagree the strongest action wins:
/// `Stop` over `SkipChildren` over `Continue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum VisitAction {
    #[default]
    Continue,
    /// Do not descend into this node. No effect in bottom-up order.
    SkipChildren,
    /// End the walk immediately
    Stop,
}

/// How a walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Stopped,
}

pub trait Visitor {
    fn visit(&mut self, item: Visit<'_>, ctx: &VisitContext<'_>) -> VisitAction;
}

impl<V: Visitor + ?Sized> Visitor for &mut V {
    fn visit(&mut self, item: Visit<'_>, ctx: &VisitContext<'_>) -> VisitAction {
        (**self).visit(item, ctx)
    }
}

struct FnVisitor<F>(F);

impl<F> Visitor for FnVisitor<F>
where
    F: FnMut(Visit<'_>, &VisitContext<'_>) -> VisitAction,
{
    fn visit(&mut self, item: Visit<'_>, ctx: &VisitContext<'_>) -> VisitAction {
        (self.0)(item, ctx)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Walks a node and its descendants, calling every registered visitor on
/// each item in registration order
pub struct Traverser<'v> {
    options: TraverseOptions,
    visitors: Vec<Box<dyn Visitor + 'v>>,
}

impl<'v> Traverser<'v> {
    pub fn new(options: TraverseOptions) -> Self {
        Self {
            options,
            visitors: Vec::new(),
        }
    }

    pub fn options(&self) -> &TraverseOptions {
        &self.options
    }

    pub fn add_function<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(Visit<'_>, &VisitContext<'_>) -> VisitAction + 'v,
    {
        self.visitors.push(Box::new(FnVisitor(f)));
        self
    }

    pub fn add_visitor<V: Visitor + 'v>(&mut self, visitor: V) -> &mut Self {
        self.visitors.push(Box::new(visitor));
        self
    }

    pub fn traverse(&mut self, root: &dyn Node) -> Outcome {
        tracing::debug!(
            root = root.kind().name(),
            order = ?self.options.order,
            visitors = self.visitors.len(),
            "traversal started"
        );
        let outcome = match self.walk(root, None, 0) {
            Flow::Continue => Outcome::Completed,
            Flow::Stop => Outcome::Stopped,
        };
        tracing::debug!(?outcome, "traversal finished");
        outcome
    }

    fn dispatch(&mut self, item: Visit<'_>, ctx: &VisitContext<'_>) -> VisitAction {
        let mut action = VisitAction::Continue;
        for visitor in &mut self.visitors {
            action = action.max(visitor.visit(item, ctx));
            if action == VisitAction::Stop {
                break;
            }
        }
        action
    }

    fn walk<'n>(&mut self, node: &'n dyn Node, parent: Option<&'n dyn Node>, depth: usize) -> Flow {
        let visit_self = !(depth == 0 && self.options.skip_starting_node);
        let ctx = VisitContext { parent, depth };

        if visit_self && self.options.order == Order::TopDown {
            match self.dispatch(Visit::Node(node), &ctx) {
                VisitAction::Stop => return Flow::Stop,
                VisitAction::SkipChildren => return Flow::Continue,
                VisitAction::Continue => {}
            }
        }

        if self.walk_contents(node, depth) == Flow::Stop {
            return Flow::Stop;
        }

        if visit_self
            && self.options.order == Order::BottomUp
            && self.dispatch(Visit::Node(node), &ctx) == VisitAction::Stop
        {
            return Flow::Stop;
        }

        Flow::Continue
    }

    // Leading comments, structural children, trailing comments.
    fn walk_contents<'n>(&mut self, node: &'n dyn Node, depth: usize) -> Flow {
        let ctx = VisitContext {
            parent: Some(node),
            depth: depth + 1,
        };

        if self.options.leading_comments
            && self.comments(node.leading_comments(), CommentPlacement::Leading, &ctx) == Flow::Stop
        {
            return Flow::Stop;
        }

        for child in node.children() {
            if self.walk(child, Some(node), depth + 1) == Flow::Stop {
                return Flow::Stop;
            }
        }

        if self.options.trailing_comments
            && self.comments(node.trailing_comments(), CommentPlacement::Trailing, &ctx) == Flow::Stop
        {
            return Flow::Stop;
        }

        Flow::Continue
    }

    fn comments(&mut self, comments: &[Comment], placement: CommentPlacement, ctx: &VisitContext<'_>) -> Flow {
        for comment in comments {
            if self.dispatch(Visit::Comment { comment, placement }, ctx) == VisitAction::Stop {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BinaryExpression, BinaryOperator, Expression, Identifier, Literal, NodeKind};

    fn sum() -> BinaryExpression {
        BinaryExpression::new(
            BinaryOperator::Add,
            Identifier::new("a").into(),
            Literal::number(1.0).into(),
        )
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: TraverseOptions =
            serde_json::from_str(r#"{"order": "bottom-up", "leadingComments": true}"#).unwrap();
        assert_eq!(options.order, Order::BottomUp);
        assert!(options.leading_comments);
        assert!(!options.trailing_comments);
        assert!(!options.skip_starting_node);
    }

    #[test]
    fn strongest_action_wins() {
        let node = sum();
        let mut seen = 0;
        let outcome = Traverser::new(TraverseOptions::default())
            .add_function(|_, _| VisitAction::SkipChildren)
            .add_function(|_, _| {
                seen += 1;
                VisitAction::Continue
            })
            .traverse(&node);
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(seen, 1);
    }

    #[test]
    fn stop_short_circuits_later_visitors() {
        let node = sum();
        let mut later = 0;
        let outcome = Traverser::new(TraverseOptions::default())
            .add_function(|_, _| VisitAction::Stop)
            .add_function(|_, _| {
                later += 1;
                VisitAction::Continue
            })
            .traverse(&node);
        assert_eq!(outcome, Outcome::Stopped);
        assert_eq!(later, 0);
    }

    #[test]
    fn skip_starting_node_still_visits_children() {
        let node = sum();
        let mut kinds = Vec::new();
        Traverser::new(TraverseOptions::default().skip_starting_node())
            .add_function(|item, ctx| {
                if let Some(n) = item.as_node() {
                    kinds.push((n.kind(), ctx.depth));
                }
                VisitAction::Continue
            })
            .traverse(&node);
        assert_eq!(kinds, vec![(NodeKind::Identifier, 1), (NodeKind::Literal, 1)]);
    }

    #[test]
    fn parent_is_reported() {
        let node = sum();
        let mut parents = Vec::new();
        Traverser::new(TraverseOptions::default())
            .add_function(|_, ctx| {
                parents.push(ctx.parent.map(|p| p.kind()));
                VisitAction::Continue
            })
            .traverse(&node);
        assert_eq!(
            parents,
            vec![
                None,
                Some(NodeKind::BinaryExpression),
                Some(NodeKind::BinaryExpression),
            ]
        );
    }

    struct Counter(usize);

    impl Visitor for Counter {
        fn visit(&mut self, _item: Visit<'_>, _ctx: &VisitContext<'_>) -> VisitAction {
            self.0 += 1;
            VisitAction::Continue
        }
    }

    #[test]
    fn struct_visitors_are_supported() {
        let expr: Expression = sum().into();
        let mut counter = Counter(0);
        Traverser::new(TraverseOptions::default())
            .add_visitor(&mut counter)
            .traverse(expr.as_node());
        assert_eq!(counter.0, 3);
    }
}
