use std::f64::consts::PI;

use crate::error::Result;
use crate::geometry::surface::{Cylinder, Plane};
use crate::math::{Vector3, TOLERANCE};
use crate::topology::{FaceData, FaceSurface, SolidId, TopologyStore};

/// Computes the signed volume enclosed by a solid's shell.
///
/// Uses the divergence theorem with the field `F = (x, 0, 0)`, so each
/// face contributes the integral of `x * n_x` over its area. Horizontal
/// faces have no X normal component and drop out, together with any
/// circular bounds they carry. Planar side faces are parallelogram quads,
/// where the vertex average is the exact area centroid, and a full
/// cylindrical face of height `h` contributes `±pi * r^2 * h`.
///
/// A correctly outward-wound shell yields a positive volume.
pub struct Volume {
    solid: SolidId,
}

impl Volume {
    /// Creates a new `Volume` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the signed enclosed volume.
    ///
    /// # Errors
    ///
    /// Returns an error if any referenced entity is missing from the store.
    pub fn execute(&self, store: &TopologyStore) -> Result<f64> {
        let solid = store.solid(self.solid)?;
        let shell = store.shell(solid.outer_shell)?;

        let mut volume = 0.0;
        for &face_id in &shell.faces {
            let face = store.face(face_id)?;
            volume += match &face.surface {
                FaceSurface::Plane(plane) => planar_flux(store, face, plane)?,
                FaceSurface::Cylinder(cylinder) => cylinder_flux(store, face, cylinder)?,
            };
        }
        Ok(volume)
    }
}

/// Flux of `(x, 0, 0)` through a planar face.
#[allow(clippy::cast_precision_loss)]
fn planar_flux(store: &TopologyStore, face: &FaceData, plane: &Plane) -> Result<f64> {
    let mut normal = *plane.plane_normal();
    if !face.same_sense {
        normal = -normal;
    }
    if normal.x.abs() < TOLERANCE {
        return Ok(0.0);
    }

    // Vertex points in loop order.
    let wire = store.wire(face.outer_wire)?;
    let mut points = Vec::with_capacity(wire.edges.len());
    for oriented in &wire.edges {
        let edge = store.edge(oriented.edge)?;
        let vertex = if oriented.forward { edge.start } else { edge.end };
        points.push(store.vertex(vertex)?.point);
    }

    // Signed area of the loop about the face normal.
    let mut vector_area = Vector3::zeros();
    for (i, point) in points.iter().enumerate() {
        let next = &points[(i + 1) % points.len()];
        vector_area += point.coords.cross(&next.coords);
    }
    let area = vector_area.dot(&normal) / 2.0;
    let centroid_x = points.iter().map(|p| p.x).sum::<f64>() / points.len() as f64;

    Ok(normal.x * centroid_x * area)
}

/// Flux of `(x, 0, 0)` through a full cylindrical side face.
///
/// Integrating over the complete circumference gives `pi * r^2 * h`
/// regardless of the axis position. An outward-facing cylinder adds its
/// slice, a hole subtracts it.
fn cylinder_flux(store: &TopologyStore, face: &FaceData, cylinder: &Cylinder) -> Result<f64> {
    let wire = store.wire(face.outer_wire)?;
    let mut z_min = f64::INFINITY;
    let mut z_max = f64::NEG_INFINITY;
    for oriented in &wire.edges {
        let edge = store.edge(oriented.edge)?;
        for vertex in [edge.start, edge.end] {
            let z = store.vertex(vertex)?.point.z;
            z_min = z_min.min(z);
            z_max = z_max.max(z);
        }
    }
    let height = z_max - z_min;

    let slice = PI * cylinder.radius() * cylinder.radius() * height;
    Ok(if face.same_sense { slice } else { -slice })
}
