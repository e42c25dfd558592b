//! Compile-time property tables
//!
//! Each variant declares an ordered list of `(name, accessor)` pairs. The
//! table is the only thing serialization looks at, so the output key set and
//! order are fixed per variant at build time.

use serde_json::{Map, Value};

use crate::{Node, NodeKind};

/// Reads one property of `N` as JSON
pub type Accessor<N> = fn(&N) -> Value;

/// A declared property: its output key and how to read it
pub struct Property<N> {
    pub name: &'static str,
    pub accessor: Accessor<N>,
}

impl<N> Property<N> {
    pub fn read(&self, node: &N) -> Value {
        (self.accessor)(node)
    }
}

/// Static description of a concrete variant
pub trait Reflect: Node + Sized + 'static {
    const KIND: NodeKind;

    /// Declared properties, base properties first
    const PROPERTIES: &'static [Property<Self>];
}

/// The declared property table for `node`'s variant
pub fn declared_properties<N: Reflect>(_node: &N) -> &'static [Property<N>] {
    N::PROPERTIES
}

pub fn property_names<N: Reflect>() -> Vec<&'static str> {
    N::PROPERTIES.iter().map(|p| p.name).collect()
}

/// Invoke each accessor in declared order and collect a flat record
pub fn serialize<N: Reflect>(node: &N) -> Value {
    let mut record = Map::with_capacity(N::PROPERTIES.len());
    for property in N::PROPERTIES {
        record.insert(property.name.to_string(), property.read(node));
    }
    Value::Object(record)
}
