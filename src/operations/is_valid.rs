use slotmap::SecondaryMap;

use crate::error::Result;
use crate::topology::{EdgeId, SolidId, TopologyStore, WireData};

/// Validates the topological consistency of a solid.
///
/// A solid passes when its shell is marked closed, every bounding wire
/// chains (each oriented edge ends at the vertex where the next one
/// starts, cyclically), and every edge is used by exactly two face bounds
/// with opposite senses.
pub struct IsValid {
    solid: SolidId,
}

impl IsValid {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the validation, returning `true` if the solid is valid.
    ///
    /// # Errors
    ///
    /// Returns an error if any referenced entity is missing from the store.
    pub fn execute(&self, store: &TopologyStore) -> Result<bool> {
        let solid = store.solid(self.solid)?;
        let shell = store.shell(solid.outer_shell)?;
        if !shell.is_closed {
            return Ok(false);
        }

        // Forward and reverse use counts per edge, across all face bounds.
        let mut usage: SecondaryMap<EdgeId, (u32, u32)> = SecondaryMap::new();
        for &face_id in &shell.faces {
            let face = store.face(face_id)?;
            let mut wires = vec![face.outer_wire];
            wires.extend_from_slice(&face.inner_wires);

            for wire_id in wires {
                let wire = store.wire(wire_id)?;
                if wire.edges.is_empty() || !wire_chains(store, wire)? {
                    return Ok(false);
                }
                for oriented in &wire.edges {
                    if let Some(counts) = usage.get_mut(oriented.edge) {
                        if oriented.forward {
                            counts.0 += 1;
                        } else {
                            counts.1 += 1;
                        }
                    } else {
                        let counts = if oriented.forward { (1, 0) } else { (0, 1) };
                        usage.insert(oriented.edge, counts);
                    }
                }
            }
        }

        // Every edge must appear exactly once forward and once reversed.
        if usage.iter().any(|(_, &(fwd, rev))| fwd != 1 || rev != 1) {
            return Ok(false);
        }
        let used = usage.len();
        Ok(used == store.edge_count())
    }
}

/// Checks that the wire's oriented edges form a single closed chain.
fn wire_chains(store: &TopologyStore, wire: &WireData) -> Result<bool> {
    for (i, oriented) in wire.edges.iter().enumerate() {
        let edge = store.edge(oriented.edge)?;
        let end = if oriented.forward { edge.end } else { edge.start };

        let next = wire.edges[(i + 1) % wire.edges.len()];
        let next_edge = store.edge(next.edge)?;
        let next_start = if next.forward {
            next_edge.start
        } else {
            next_edge.end
        };

        if end != next_start {
            return Ok(false);
        }
    }
    Ok(true)
}
