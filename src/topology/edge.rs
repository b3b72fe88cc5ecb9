use crate::geometry::curve::{Circle, Line};

use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the topology store.
    pub struct EdgeId;
}

/// The geometric curve underlying an edge.
#[derive(Debug, Clone)]
pub enum EdgeCurve {
    /// A straight edge on an unbounded line.
    Line(Line),
    /// A full-circle edge (start and end vertex coincide).
    Circle(Circle),
}

/// Data associated with a topological edge.
///
/// An edge connects two vertices through a geometric curve. Full-circle
/// edges use the same vertex at both ends (the contour's anchor point).
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Start vertex of the edge.
    pub start: VertexId,
    /// End vertex of the edge.
    pub end: VertexId,
    /// The geometric curve defining this edge's shape.
    pub curve: EdgeCurve,
}
