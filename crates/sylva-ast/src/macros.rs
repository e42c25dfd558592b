//! Declaration helpers for node variants

/// Build a property table for a variant.
///
/// The base properties `type`, `location`, `leadingComments` and
/// `trailingComments` come first, then the listed fields in order.
macro_rules! properties {
    ($node:ident { $($name:literal => |$n:ident| $accessor:expr),* $(,)? }) => {
        &[
            crate::Property {
                name: "type",
                accessor: |n: &$node| serde_json::Value::from(crate::Node::kind(n).name()),
            },
            crate::Property {
                name: "location",
                accessor: |n: &$node| crate::Node::location(n).to_value(),
            },
            crate::Property {
                name: "leadingComments",
                accessor: |n: &$node| crate::comment::comments_to_value(crate::Node::leading_comments(n)),
            },
            crate::Property {
                name: "trailingComments",
                accessor: |n: &$node| crate::comment::comments_to_value(crate::Node::trailing_comments(n)),
            },
            $(
                crate::Property {
                    name: $name,
                    accessor: |$n: &$node| $accessor,
                },
            )*
        ]
    };
}

/// Implement [`Node`](crate::Node) and [`VariantSet`](crate::VariantSet) for
/// a struct with a `base: NodeBase` field and a [`Reflect`](crate::Reflect)
/// impl. The optional closure lists structural children in declaration order.
macro_rules! impl_node {
    ($node:ident) => {
        impl_node!($node, |_n| Vec::new());
    };
    ($node:ident, |$n:ident| $children:expr) => {
        impl crate::Node for $node {
            fn kind(&self) -> crate::NodeKind {
                <Self as crate::Reflect>::KIND
            }

            fn base(&self) -> &crate::NodeBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut crate::NodeBase {
                &mut self.base
            }

            fn children(&self) -> Vec<&dyn crate::Node> {
                let $n = self;
                $children
            }

            fn property_names(&self) -> Vec<&'static str> {
                crate::properties::property_names::<Self>()
            }

            fn serialize(&self) -> serde_json::Value {
                crate::properties::serialize(self)
            }
        }

        impl crate::VariantSet for $node {
            const KINDS: &'static [crate::NodeKind] = &[<$node as crate::Reflect>::KIND];
        }
    };
}
