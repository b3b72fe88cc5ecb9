use crate::error::{OutlineError, Result};
use crate::geometry::curve::{Circle, Line};
use crate::geometry::surface::{Cylinder, Plane};
use crate::math::{polygon_2d, Point3, Vector3, TOLERANCE};
use crate::outline::{Contour, Outline};
use crate::topology::{
    EdgeCurve, EdgeData, FaceData, FaceSurface, OrientedEdge, ShellData, SolidData, SolidId,
    TopologyStore, VertexData, WireData,
};

/// Extrudes a board outline into a closed manifold slab.
///
/// The slab spans `[-thickness/2, +thickness/2]` along Z and is bounded by
/// one shared bottom plane, one shared top plane, and one side face per
/// boundary segment (a planar quad per polygon segment, one cylindrical
/// face per circular contour). Hole contours become inner bounds of the
/// top and bottom faces; they never get horizontal faces of their own.
pub struct ExtrudeOutline<'a> {
    outline: &'a Outline,
    thickness: f64,
}

/// Position of one boundary segment in the flattened global index space.
struct SegmentRef {
    /// Index of the owning contour in the outline.
    contour: usize,
    /// Global index of the owning contour's first segment.
    contour_start: usize,
    /// Index of this segment within its contour.
    local: usize,
}

impl SegmentRef {
    /// Global index of the next segment around the same contour.
    fn next_around_contour(&self, segment_count: usize) -> usize {
        self.contour_start + (self.local + 1) % segment_count
    }
}

impl<'a> ExtrudeOutline<'a> {
    /// Creates a new `ExtrudeOutline` operation.
    #[must_use]
    pub fn new(outline: &'a Outline, thickness: f64) -> Self {
        Self { outline, thickness }
    }

    /// Executes the extrusion, creating the solid in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::InvalidThickness`] for a non-positive
    /// thickness, and propagates geometry errors for degenerate contours
    /// (for example two coincident consecutive points, which would yield a
    /// zero-length edge).
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        if self.thickness < TOLERANCE {
            return Err(OutlineError::InvalidThickness(self.thickness).into());
        }
        let z_bot = -self.thickness / 2.0;
        let z_top = self.thickness / 2.0;
        let contours = self.outline.contours();

        // Flatten all contours into one global segment index space.
        let mut segments = Vec::with_capacity(self.outline.segment_count());
        for (ci, contour) in contours.iter().enumerate() {
            let contour_start = segments.len();
            for local in 0..contour.segment_count() {
                segments.push(SegmentRef {
                    contour: ci,
                    contour_start,
                    local,
                });
            }
        }

        // One bottom and one top vertex per segment anchor point.
        let mut bottom_vertices = Vec::with_capacity(segments.len());
        let mut top_vertices = Vec::with_capacity(segments.len());
        for seg in &segments {
            let p = contours[seg.contour].point_at(seg.local);
            bottom_vertices.push(store.add_vertex(VertexData::new(Point3::new(p.x, p.y, z_bot))));
            top_vertices.push(store.add_vertex(VertexData::new(Point3::new(p.x, p.y, z_top))));
        }

        // Three edges per segment: bottom ring, top ring, vertical side.
        let mut bottom_edges = Vec::with_capacity(segments.len());
        let mut top_edges = Vec::with_capacity(segments.len());
        let mut side_edges = Vec::with_capacity(segments.len());
        for (i, seg) in segments.iter().enumerate() {
            let contour = &contours[seg.contour];
            let next = seg.next_around_contour(contour.segment_count());
            let p0 = contour.point_at(seg.local);
            let is_outer = seg.contour == 0;

            bottom_edges.push(store.add_edge(EdgeData {
                start: bottom_vertices[i],
                end: bottom_vertices[next],
                curve: ring_curve(contour, is_outer, seg.local, z_bot)?,
            }));
            top_edges.push(store.add_edge(EdgeData {
                start: top_vertices[i],
                end: top_vertices[next],
                curve: ring_curve(contour, is_outer, seg.local, z_top)?,
            }));
            side_edges.push(store.add_edge(EdgeData {
                start: bottom_vertices[i],
                end: top_vertices[i],
                curve: EdgeCurve::Line(Line::new(Point3::new(p0.x, p0.y, z_bot), Vector3::z())?),
            }));
        }

        // One loop per contour on each horizontal face. The bottom loop
        // follows contour order; the top loop runs the opposite rotational
        // sense so both faces wind outward.
        let mut bottom_wires = Vec::with_capacity(contours.len());
        let mut top_wires = Vec::with_capacity(contours.len());
        let mut start = 0;
        for contour in contours {
            let n = contour.segment_count();
            let bottom = (0..n)
                .map(|k| OrientedEdge::new(bottom_edges[start + k], true))
                .collect();
            let top = (0..n)
                .rev()
                .map(|k| OrientedEdge::new(top_edges[start + k], false))
                .collect();
            bottom_wires.push(store.add_wire(WireData { edges: bottom }));
            top_wires.push(store.add_wire(WireData { edges: top }));
            start += n;
        }

        let bottom_face = store.add_face(FaceData {
            surface: FaceSurface::Plane(Plane::new(
                Point3::new(0.0, 0.0, z_bot),
                -Vector3::z(),
                Vector3::x(),
            )?),
            outer_wire: bottom_wires[0],
            inner_wires: bottom_wires[1..].to_vec(),
            same_sense: true,
        });
        let top_face = store.add_face(FaceData {
            surface: FaceSurface::Plane(Plane::new(
                Point3::new(0.0, 0.0, z_top),
                Vector3::z(),
                Vector3::x(),
            )?),
            outer_wire: top_wires[0],
            inner_wires: top_wires[1..].to_vec(),
            same_sense: true,
        });

        // Side faces. The quad loop goes up the near seam, across the
        // top, down the far seam, and back along the bottom; for a
        // circular contour the near and far seam are the same edge.
        let mut faces = vec![bottom_face, top_face];
        for (i, seg) in segments.iter().enumerate() {
            let contour = &contours[seg.contour];
            let next = seg.next_around_contour(contour.segment_count());
            let is_outer = seg.contour == 0;

            let (surface, same_sense) = side_surface(contour, is_outer, seg.local, z_bot)?;
            let wire = store.add_wire(WireData {
                edges: vec![
                    OrientedEdge::new(side_edges[i], true),
                    OrientedEdge::new(top_edges[i], true),
                    OrientedEdge::new(side_edges[next], false),
                    OrientedEdge::new(bottom_edges[i], false),
                ],
            });
            faces.push(store.add_face(FaceData {
                surface,
                outer_wire: wire,
                inner_wires: vec![],
                same_sense,
            }));
        }

        let shell = store.add_shell(ShellData {
            faces,
            is_closed: true,
        });
        Ok(store.add_solid(SolidData { outer_shell: shell }))
    }
}

/// Traversal normal of the ring circles of a circular contour.
///
/// The outer boundary runs clockwise viewed from above (-Z normal), holes
/// counter-clockwise (+Z normal), matching the outline winding contract.
fn ring_circle_normal(is_outer: bool) -> Vector3 {
    if is_outer {
        -Vector3::z()
    } else {
        Vector3::z()
    }
}

/// Underlying curve of a contour's ring edge at height `z`.
fn ring_curve(contour: &Contour, is_outer: bool, local: usize, z: f64) -> Result<EdgeCurve> {
    match contour {
        Contour::Polygon(_) => {
            let p0 = contour.point_at(local);
            let p1 = contour.point_at(local + 1);
            let direction = Vector3::new(p1.x - p0.x, p1.y - p0.y, 0.0);
            Ok(EdgeCurve::Line(Line::new(
                Point3::new(p0.x, p0.y, z),
                direction,
            )?))
        }
        Contour::Circle { center, radius } => Ok(EdgeCurve::Circle(Circle::new(
            Point3::new(center.x, center.y, z),
            *radius,
            ring_circle_normal(is_outer),
            // From the center toward the anchor point.
            -Vector3::x(),
        )?)),
    }
}

/// Surface carrying a segment's side face, plus the face's sense flag.
///
/// Planar sides take the outward in-plane perpendicular as their normal,
/// so the face sense is always `true`. A cylinder's surface normal points
/// away from its axis, which is outward only for a round outer boundary;
/// round holes reverse the sense.
fn side_surface(
    contour: &Contour,
    is_outer: bool,
    local: usize,
    z_bot: f64,
) -> Result<(FaceSurface, bool)> {
    match contour {
        Contour::Polygon(_) => {
            let p0 = contour.point_at(local);
            let p1 = contour.point_at(local + 1);
            let dir = polygon_2d::segment_direction(&p0, &p1)?;
            let outward = polygon_2d::left_normal(dir);
            let plane = Plane::new(
                Point3::new(p0.x, p0.y, z_bot),
                Vector3::new(outward.x, outward.y, 0.0),
                Vector3::new(dir.x, dir.y, 0.0),
            )?;
            Ok((FaceSurface::Plane(plane), true))
        }
        Contour::Circle { center, radius } => {
            let cylinder = Cylinder::new(
                Point3::new(center.x, center.y, z_bot),
                *radius,
                Vector3::z(),
                -Vector3::x(),
            )?;
            Ok((FaceSurface::Cylinder(cylinder), is_outer))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    /// 10x10 square wound clockwise viewed from +Z.
    fn square() -> Contour {
        Contour::polygon(vec![p(0.0, 0.0), p(0.0, 10.0), p(10.0, 10.0), p(10.0, 0.0)]).unwrap()
    }

    fn build(contours: Vec<Contour>, thickness: f64) -> (TopologyStore, SolidId) {
        let outline = Outline::new(contours).unwrap();
        let mut store = TopologyStore::new();
        let solid = ExtrudeOutline::new(&outline, thickness)
            .execute(&mut store)
            .unwrap();
        (store, solid)
    }

    // ── Count invariants ───────────────────────────────────────

    #[test]
    fn square_slab_counts() {
        let (store, solid) = build(vec![square()], 1.6);

        assert_eq!(store.vertex_count(), 8);
        assert_eq!(store.edge_count(), 12);

        let shell = store
            .shell(store.solid(solid).unwrap().outer_shell)
            .unwrap();
        assert_eq!(shell.faces.len(), 6); // bottom + top + 4 sides
        assert!(shell.is_closed);
    }

    #[test]
    fn square_with_round_hole_counts() {
        let hole = Contour::circle(p(5.0, 5.0), 1.0).unwrap();
        let (store, solid) = build(vec![square(), hole], 1.6);

        // The circle contributes 2 extra vertices (its anchor, top and
        // bottom) and exactly one extra face (the cylindrical side).
        assert_eq!(store.vertex_count(), 10);
        assert_eq!(store.edge_count(), 15);

        let shell = store
            .shell(store.solid(solid).unwrap().outer_shell)
            .unwrap();
        assert_eq!(shell.faces.len(), 7);

        // Bottom and top faces carry one outer and one inner bound.
        for &face_id in &shell.faces[..2] {
            let face = store.face(face_id).unwrap();
            assert_eq!(face.inner_wires.len(), 1);
        }
        for &face_id in &shell.faces[2..] {
            let face = store.face(face_id).unwrap();
            assert!(face.inner_wires.is_empty());
        }
    }

    #[test]
    fn square_with_square_hole_counts() {
        // Counter-clockwise 2x2 hole viewed from +Z.
        let hole =
            Contour::polygon(vec![p(4.0, 4.0), p(6.0, 4.0), p(6.0, 6.0), p(4.0, 6.0)]).unwrap();
        let (store, solid) = build(vec![square(), hole], 1.6);

        // Each of the 8 outline points doubles into a bottom and a top
        // vertex; each contour adds 3 edges per segment.
        assert_eq!(store.vertex_count(), 16);
        assert_eq!(store.edge_count(), 24);

        let shell = store
            .shell(store.solid(solid).unwrap().outer_shell)
            .unwrap();
        assert_eq!(shell.faces.len(), 10); // bottom + top + 4 + 4 sides
        assert!(shell.is_closed);

        // Bottom and top faces carry the hole as their inner bound.
        for &face_id in &shell.faces[..2] {
            let face = store.face(face_id).unwrap();
            assert_eq!(face.inner_wires.len(), 1);
        }
        for &face_id in &shell.faces[2..] {
            let face = store.face(face_id).unwrap();
            assert!(face.inner_wires.is_empty());
        }
    }

    #[test]
    fn l_shape_has_8_faces() {
        // Clockwise L-shape.
        let contour = Contour::polygon(vec![
            p(0.0, 0.0),
            p(0.0, 4.0),
            p(2.0, 4.0),
            p(2.0, 2.0),
            p(4.0, 2.0),
            p(4.0, 0.0),
        ])
        .unwrap();
        let (store, solid) = build(vec![contour], 1.0);

        let shell = store
            .shell(store.solid(solid).unwrap().outer_shell)
            .unwrap();
        assert_eq!(shell.faces.len(), 8); // bottom + top + 6 sides
    }

    // ── Geometry of the produced slab ──────────────────────────

    #[test]
    fn slab_is_centered_on_z() {
        let (store, _) = build(vec![square()], 1.6);
        for (_, vertex) in store.vertices() {
            assert!((vertex.point.z.abs() - 0.8).abs() < TOLERANCE);
        }
    }

    #[test]
    fn side_plane_normals_point_outward() {
        let (store, solid) = build(vec![square()], 1.6);
        let shell = store
            .shell(store.solid(solid).unwrap().outer_shell)
            .unwrap();
        let centroid = Point3::new(5.0, 5.0, 0.0);

        for &face_id in &shell.faces {
            let face = store.face(face_id).unwrap();
            let FaceSurface::Plane(plane) = &face.surface else {
                panic!("square slab has only planar faces");
            };
            let to_face = plane.origin() - centroid;
            assert!(
                plane.plane_normal().dot(&to_face) > 0.0,
                "face normal {:?} should point away from the solid center",
                plane.plane_normal()
            );
        }
    }

    #[test]
    fn hole_cylinder_sense_is_reversed() {
        let hole = Contour::circle(p(5.0, 5.0), 1.0).unwrap();
        let (store, solid) = build(vec![square(), hole], 1.6);
        let shell = store
            .shell(store.solid(solid).unwrap().outer_shell)
            .unwrap();

        let cylinder_face = shell
            .faces
            .iter()
            .map(|&id| store.face(id).unwrap())
            .find(|f| matches!(f.surface, FaceSurface::Cylinder(_)))
            .unwrap();
        assert!(!cylinder_face.same_sense);
    }

    #[test]
    fn round_board_outline_keeps_cylinder_sense() {
        let disc = Contour::circle(p(0.0, 0.0), 20.0).unwrap();
        let (store, solid) = build(vec![disc], 1.6);
        let shell = store
            .shell(store.solid(solid).unwrap().outer_shell)
            .unwrap();

        assert_eq!(shell.faces.len(), 3); // bottom + top + cylinder
        let cylinder_face = shell
            .faces
            .iter()
            .map(|&id| store.face(id).unwrap())
            .find(|f| matches!(f.surface, FaceSurface::Cylinder(_)))
            .unwrap();
        assert!(cylinder_face.same_sense);
    }

    // ── Error cases ────────────────────────────────────────────

    #[test]
    fn zero_thickness_is_rejected() {
        let outline = Outline::new(vec![square()]).unwrap();
        let mut store = TopologyStore::new();
        let result = ExtrudeOutline::new(&outline, 0.0).execute(&mut store);
        assert!(result.is_err());
    }

    #[test]
    fn coincident_consecutive_points_are_rejected() {
        let contour = Contour::polygon(vec![
            p(0.0, 0.0),
            p(0.0, 10.0),
            p(0.0, 10.0),
            p(10.0, 0.0),
        ])
        .unwrap();
        let outline = Outline::new(vec![contour]).unwrap();
        let mut store = TopologyStore::new();
        let result = ExtrudeOutline::new(&outline, 1.6).execute(&mut store);
        assert!(result.is_err(), "zero-length segment must not be emitted");
    }
}
