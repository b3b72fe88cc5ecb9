use std::io::Write;

use slotmap::SecondaryMap;

use crate::error::{OutlineError, Result, TopologyError};
use crate::geometry::surface::{Cylinder, Plane};
use crate::math::Vector3;
use crate::operations::ExtrudeOutline;
use crate::outline::Outline;
use crate::topology::{
    EdgeCurve, EdgeId, FaceData, FaceId, FaceSurface, SolidId, TopologyStore, VertexId, WireId,
};

use super::id::StepId;
use super::writer::{EdgeIds, FileHeader, StepWriter, SurfaceSide};

/// VECTOR magnitude of the parametric unit along a line. The value is
/// arbitrary as far as consumers are concerned.
const LINE_VECTOR_MAGNITUDE: f64 = 1000.0;

/// An RGB surface colour, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct Appearance {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Document-level settings for a STEP export.
///
/// The defaults reproduce the strings a board export has always carried.
/// `timestamp` is ISO-8601 text supplied by the caller; this crate does
/// not read the clock.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub file_name: String,
    pub product_id: String,
    pub product_name: String,
    pub product_description: String,
    /// Base body name; exports with several bodies number them
    /// `"<body_name> - 1"`, `"<body_name> - 2"`, and so on.
    pub body_name: String,
    pub timestamp: String,
    pub author: String,
    pub organisation: String,
    pub originating_system: String,
    /// Body colour.
    pub appearance: Appearance,
    /// When set, the top and bottom faces override the body colour.
    pub top_bottom_appearance: Option<Appearance>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            file_name: "board.step".into(),
            product_id: "part id".into(),
            product_name: "part name".into(),
            product_description: "PCB model".into(),
            body_name: "part body".into(),
            timestamp: String::new(),
            author: String::new(),
            organisation: String::new(),
            originating_system: "boardstep".into(),
            appearance: Appearance {
                r: 1.0,
                g: 1.0,
                b: 0.6,
            },
            top_bottom_appearance: Some(Appearance {
                r: 0.2,
                g: 0.8,
                b: 0.2,
            }),
        }
    }
}

/// Exports a single board outline as one solid body.
///
/// # Errors
///
/// Returns an error for invalid outlines or thickness, and for I/O
/// failures on the output stream.
pub fn export_outline<W: Write>(
    outline: &Outline,
    thickness: f64,
    options: &ExportOptions,
    out: W,
) -> Result<()> {
    export_outlines(std::slice::from_ref(outline), thickness, options, out)
}

/// Exports one solid body per outline under a single product.
///
/// # Errors
///
/// Returns an error if the outline slice is empty, for invalid outlines
/// or thickness, and for I/O failures on the output stream.
pub fn export_outlines<W: Write>(
    outlines: &[Outline],
    thickness: f64,
    options: &ExportOptions,
    out: W,
) -> Result<()> {
    if outlines.is_empty() {
        return Err(OutlineError::Empty.into());
    }
    let multiple_bodies = outlines.len() > 1;

    let mut writer = StepWriter::new(out);
    writer.begin_document(&FileHeader {
        file_name: &options.file_name,
        description: "STEP AP214 export of circuit board",
        timestamp: &options.timestamp,
        author: &options.author,
        organisation: &options.organisation,
        preprocessor_version: "PCB STEP EXPORT",
        originating_system: &options.originating_system,
    })?;

    let product = product_fragment(
        &mut writer,
        &options.product_id,
        &options.product_name,
        &options.product_description,
    )?;

    let mut breps = Vec::with_capacity(outlines.len());
    let mut styled_items = Vec::new();
    for (index, outline) in outlines.iter().enumerate() {
        let mut store = TopologyStore::new();
        let solid = ExtrudeOutline::new(outline, thickness).execute(&mut store)?;

        let body_name = if multiple_bodies {
            format!("{} - {}", options.body_name, index + 1)
        } else {
            options.body_name.clone()
        };
        breps.push(body_fragment(
            &mut writer,
            &store,
            solid,
            &body_name,
            options,
            &mut styled_items,
        )?);
    }

    shape_representation_fragment(
        &mut writer,
        &options.product_name,
        &product,
        &breps,
        &styled_items,
    )?;

    writer.end_document()?;
    Ok(())
}

/// Exports each outline as its own product in a single document.
///
/// With several outlines the product id, product name, and body name
/// are numbered per part. The parts are not yet gathered under an
/// assembly product.
///
/// # Errors
///
/// Returns an error if the outline slice is empty, for invalid outlines
/// or thickness, and for I/O failures on the output stream.
pub fn export_outlines_assembly<W: Write>(
    outlines: &[Outline],
    thickness: f64,
    options: &ExportOptions,
    out: W,
) -> Result<()> {
    if outlines.is_empty() {
        return Err(OutlineError::Empty.into());
    }
    let multiple_parts = outlines.len() > 1;

    let mut writer = StepWriter::new(out);
    writer.begin_document(&FileHeader {
        file_name: &options.file_name,
        description: "STEP AP214 export of circuit board",
        timestamp: &options.timestamp,
        author: &options.author,
        organisation: &options.organisation,
        preprocessor_version: "PCB STEP EXPORT",
        originating_system: &options.originating_system,
    })?;

    for (index, outline) in outlines.iter().enumerate() {
        let part = index + 1;
        let (product_id, product_name, body_name) = if multiple_parts {
            (
                format!("{}-{}", options.product_id, part),
                format!("{} - {}", options.product_name, part),
                format!("{} - {}", options.body_name, part),
            )
        } else {
            (
                options.product_id.clone(),
                options.product_name.clone(),
                options.body_name.clone(),
            )
        };

        let product = product_fragment(
            &mut writer,
            &product_id,
            &product_name,
            &options.product_description,
        )?;

        let mut store = TopologyStore::new();
        let solid = ExtrudeOutline::new(outline, thickness).execute(&mut store)?;

        let mut styled_items = Vec::new();
        let brep = body_fragment(
            &mut writer,
            &store,
            solid,
            &body_name,
            options,
            &mut styled_items,
        )?;

        shape_representation_fragment(&mut writer, &product_name, &product, &[brep], &styled_items)?;
    }

    writer.end_document()?;
    Ok(())
}

/// Identifiers of the product fragment needed by later fragments.
struct ProductIds {
    geometric_context: StepId,
    definition_shape: StepId,
}

/// Emits the product, its definition, and the unit context.
fn product_fragment<W: Write>(
    writer: &mut StepWriter<W>,
    product_id: &str,
    product_name: &str,
    product_description: &str,
) -> Result<ProductIds> {
    let application = writer.application_context("automotive_design")?;
    writer.application_protocol_definition(
        "draft international standard",
        "automotive_design",
        "1998",
        application,
    )?;
    let product_context = writer.product_context("NONE", application, "mechanical")?;
    let product = writer.product(product_id, product_name, product_description, &[product_context])?;
    writer.product_related_product_category("part", None, &[product])?;

    let formation = writer.product_definition_formation("any", "", product)?;
    let definition_context =
        writer.product_definition_context("detailed design", application, "design")?;
    let definition = writer.product_definition("UNKNOWN", "", formation, definition_context)?;
    let definition_shape = writer.product_definition_shape("NONE", "NONE", definition)?;

    let geometric_context = writer.geometric_representation_context()?;

    Ok(ProductIds {
        geometric_context,
        definition_shape,
    })
}

/// Serializes one solid from the topology store as a MANIFOLD_SOLID_BREP,
/// returning its identifier and appending the body's styled items.
///
/// Record order follows the dependency chain: surfaces, then curves, then
/// vertices, then edges (each with its two oriented wrappers), then loops,
/// bounds, and faces, then the shell and the solid, then the styling.
fn body_fragment<W: Write>(
    writer: &mut StepWriter<W>,
    store: &TopologyStore,
    solid: SolidId,
    body_name: &str,
    options: &ExportOptions,
    styled_items: &mut Vec<StepId>,
) -> Result<StepId> {
    let solid_data = store.solid(solid)?;
    let shell = store.shell(solid_data.outer_shell)?;

    // Surfaces underlying the faces.
    let mut surface_ids: SecondaryMap<FaceId, StepId> = SecondaryMap::new();
    for &face_id in &shell.faces {
        let face = store.face(face_id)?;
        let id = match &face.surface {
            FaceSurface::Plane(plane) => emit_plane(writer, plane)?,
            FaceSurface::Cylinder(cylinder) => emit_cylinder(writer, cylinder)?,
        };
        surface_ids.insert(face_id, id);
    }

    // Infinite curves underlying the edges.
    let mut curve_ids: SecondaryMap<EdgeId, StepId> = SecondaryMap::new();
    for (edge_id, edge) in store.edges() {
        let id = match &edge.curve {
            EdgeCurve::Line(line) => {
                let point = writer.cartesian_point(
                    "NONE",
                    line.origin().x,
                    line.origin().y,
                    line.origin().z,
                )?;
                let direction = writer.direction(
                    "NONE",
                    line.direction().x,
                    line.direction().y,
                    line.direction().z,
                )?;
                let vector = writer.vector("NONE", direction, LINE_VECTOR_MAGNITUDE)?;
                writer.line("NONE", point, vector)?
            }
            EdgeCurve::Circle(circle) => {
                let placement = axis2_placement(
                    writer,
                    circle.center().x,
                    circle.center().y,
                    circle.center().z,
                    circle.normal(),
                    circle.ref_dir(),
                )?;
                writer.circle("NONE", placement, circle.radius())?
            }
        };
        curve_ids.insert(edge_id, id);
    }

    // Vertices.
    let mut vertex_ids: SecondaryMap<VertexId, StepId> = SecondaryMap::new();
    for (vertex_id, vertex) in store.vertices() {
        let point =
            writer.cartesian_point("NONE", vertex.point.x, vertex.point.y, vertex.point.z)?;
        vertex_ids.insert(vertex_id, writer.vertex_point("NONE", point)?);
    }

    // Edges, each with a forward and a reversed oriented wrapper.
    let mut edge_ids: SecondaryMap<EdgeId, EdgeIds> = SecondaryMap::new();
    for (edge_id, edge) in store.edges() {
        let start = lookup(&vertex_ids, edge.start, "vertex")?;
        let end = lookup(&vertex_ids, edge.end, "vertex")?;
        let curve = lookup(&curve_ids, edge_id, "curve")?;
        edge_ids.insert(edge_id, writer.edge_curve("NONE", start, end, curve, true)?);
    }

    // Faces: loops, bounds, advanced faces.
    let mut face_ids = Vec::with_capacity(shell.faces.len());
    for &face_id in &shell.faces {
        let face = store.face(face_id)?;
        let mut bounds = Vec::with_capacity(1 + face.inner_wires.len());

        let outer_loop = emit_loop(writer, store, &edge_ids, face.outer_wire)?;
        bounds.push(writer.face_outer_bound("NONE", outer_loop, true)?);
        for &wire_id in &face.inner_wires {
            let inner_loop = emit_loop(writer, store, &edge_ids, wire_id)?;
            bounds.push(writer.face_bound("NONE", inner_loop, true)?);
        }

        let surface = lookup(&surface_ids, face_id, "surface")?;
        face_ids.push(writer.advanced_face("NONE", &bounds, surface, face.same_sense)?);
    }

    let shell_id = writer.closed_shell("NONE", &face_ids)?;
    let brep = writer.manifold_solid_brep(body_name, shell_id)?;

    // Body style, plus the layer assignment consumers expect.
    let body_style = style_assignment(writer, options.appearance)?;
    let styled = writer.styled_item("NONE", &[body_style], brep)?;
    writer.presentation_layer_assignment("1", "Layer 1", &[styled])?;
    styled_items.push(styled);

    // Top and bottom face colour overrides.
    if let Some(appearance) = options.top_bottom_appearance {
        for (&face_id, &advanced_face) in shell.faces.iter().zip(&face_ids) {
            let face = store.face(face_id)?;
            if !is_horizontal_plane(face) {
                continue;
            }
            let style = style_assignment(writer, appearance)?;
            let overriding =
                writer.over_riding_styled_item("NONE", &[style], advanced_face, styled)?;
            styled_items.push(overriding);
        }
    }

    Ok(brep)
}

/// Anchors all bodies in space and binds them to the product shape.
fn shape_representation_fragment<W: Write>(
    writer: &mut StepWriter<W>,
    name: &str,
    product: &ProductIds,
    breps: &[StepId],
    styled_items: &[StepId],
) -> Result<()> {
    let origin = writer.cartesian_point("NONE", 0.0, 0.0, 0.0)?;
    let axis = writer.direction("NONE", 0.0, 0.0, 1.0)?;
    let ref_direction = writer.direction("NONE", 1.0, 0.0, 0.0)?;
    let anchor = writer.axis2_placement_3d("NONE", origin, axis, ref_direction)?;

    let mut items = breps.to_vec();
    items.push(anchor);
    let representation =
        writer.advanced_brep_shape_representation(name, &items, product.geometric_context)?;
    writer.shape_definition_representation(product.definition_shape, representation)?;

    writer.mechanical_design_geometric_presentation_representation(
        "",
        styled_items,
        product.geometric_context,
    )?;
    Ok(())
}

fn emit_plane<W: Write>(writer: &mut StepWriter<W>, plane: &Plane) -> Result<StepId> {
    let placement = axis2_placement(
        writer,
        plane.origin().x,
        plane.origin().y,
        plane.origin().z,
        plane.plane_normal(),
        plane.ref_dir(),
    )?;
    Ok(writer.plane("NONE", placement)?)
}

fn emit_cylinder<W: Write>(writer: &mut StepWriter<W>, cylinder: &Cylinder) -> Result<StepId> {
    let placement = axis2_placement(
        writer,
        cylinder.center().x,
        cylinder.center().y,
        cylinder.center().z,
        cylinder.axis(),
        cylinder.ref_dir(),
    )?;
    Ok(writer.cylindrical_surface("NONE", placement, cylinder.radius())?)
}

fn axis2_placement<W: Write>(
    writer: &mut StepWriter<W>,
    x: f64,
    y: f64,
    z: f64,
    axis: &Vector3,
    ref_dir: &Vector3,
) -> Result<StepId> {
    let location = writer.cartesian_point("NONE", x, y, z)?;
    let axis = writer.direction("NONE", axis.x, axis.y, axis.z)?;
    let ref_direction = writer.direction("NONE", ref_dir.x, ref_dir.y, ref_dir.z)?;
    Ok(writer.axis2_placement_3d("NONE", location, axis, ref_direction)?)
}

fn emit_loop<W: Write>(
    writer: &mut StepWriter<W>,
    store: &TopologyStore,
    edge_ids: &SecondaryMap<EdgeId, EdgeIds>,
    wire_id: WireId,
) -> Result<StepId> {
    let wire = store.wire(wire_id)?;
    let mut oriented = Vec::with_capacity(wire.edges.len());
    for entry in &wire.edges {
        oriented.push(lookup(edge_ids, entry.edge, "edge")?.oriented(entry.forward));
    }
    Ok(writer.edge_loop("NONE", &oriented)?)
}

/// COLOUR_RGB through PRESENTATION_STYLE_ASSIGNMENT for one appearance.
fn style_assignment<W: Write>(
    writer: &mut StepWriter<W>,
    appearance: Appearance,
) -> Result<StepId> {
    let colour = writer.colour_rgb("", appearance.r, appearance.g, appearance.b)?;
    let fill_colour = writer.fill_area_style_colour("", colour)?;
    let fill_style = writer.fill_area_style("", &[fill_colour])?;
    let fill_area = writer.surface_style_fill_area(fill_style)?;
    let side_style = writer.surface_side_style("", &[fill_area])?;
    let usage = writer.surface_style_usage(SurfaceSide::Both, side_style)?;
    Ok(writer.presentation_style_assignment(&[usage])?)
}

fn is_horizontal_plane(face: &FaceData) -> bool {
    match &face.surface {
        FaceSurface::Plane(plane) => plane.plane_normal().z.abs() > 0.5,
        FaceSurface::Cylinder(_) => false,
    }
}

fn lookup<K: slotmap::Key, V: Copy>(
    map: &SecondaryMap<K, V>,
    key: K,
    kind: &str,
) -> Result<V> {
    map.get(key)
        .copied()
        .ok_or_else(|| TopologyError::EntityNotFound(kind.into()).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::outline::Contour;
    use std::collections::HashSet;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square() -> Contour {
        Contour::polygon(vec![p(0.0, 0.0), p(0.0, 10.0), p(10.0, 10.0), p(10.0, 0.0)]).unwrap()
    }

    fn export(contours: Vec<Contour>) -> String {
        let outline = Outline::new(contours).unwrap();
        let mut out = Vec::new();
        export_outline(&outline, 1.6, &ExportOptions::default(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn count_records(text: &str, entity: &str) -> usize {
        let needle = format!("={entity}(");
        text.lines().filter(|line| line.contains(&needle)).count()
    }

    /// Identifiers on the left of `=`, in definition order.
    fn defined_ids(text: &str) -> Vec<u64> {
        text.lines()
            .filter(|line| line.starts_with('#'))
            .map(|line| {
                let eq = line.find('=').unwrap();
                line[1..eq].parse().unwrap()
            })
            .collect()
    }

    /// Every `#N` mentioned on the right of `=` anywhere in the document.
    fn referenced_ids(text: &str) -> HashSet<u64> {
        let mut ids = HashSet::new();
        for line in text.lines().filter(|line| line.starts_with('#')) {
            let eq = line.find('=').unwrap();
            let rest = &line[eq + 1..];
            let bytes = rest.as_bytes();
            let mut i = 0;
            while i < bytes.len() {
                if bytes[i] == b'#' {
                    let start = i + 1;
                    let mut end = start;
                    while end < bytes.len() && bytes[end].is_ascii_digit() {
                        end += 1;
                    }
                    if end > start {
                        ids.insert(rest[start..end].parse().unwrap());
                    }
                    i = end;
                } else {
                    i += 1;
                }
            }
        }
        ids
    }

    #[test]
    fn document_is_framed() {
        let text = export(vec![square()]);
        assert!(text.starts_with("ISO-10303-21;\n"));
        assert!(text.contains("FILE_SCHEMA (( 'AUTOMOTIVE_DESIGN' ));"));
        assert!(text.contains("\nDATA;\n"));
        assert!(text.ends_with("ENDSEC;\nEND-ISO-10303-21;\n"));
    }

    #[test]
    fn identifiers_are_unique_and_sequential() {
        let text = export(vec![square(), Contour::circle(p(5.0, 5.0), 1.0).unwrap()]);
        let ids = defined_ids(&text);
        assert!(!ids.is_empty());
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(*id, i as u64 + 1, "identifiers must be dense from #1");
        }
    }

    #[test]
    fn all_references_resolve() {
        let text = export(vec![square(), Contour::circle(p(5.0, 5.0), 1.0).unwrap()]);
        let defined: HashSet<u64> = defined_ids(&text).into_iter().collect();
        for id in referenced_ids(&text) {
            assert!(defined.contains(&id), "#{id} is referenced but never defined");
        }
    }

    #[test]
    fn square_body_entity_counts() {
        let text = export(vec![square()]);
        assert_eq!(count_records(&text, "VERTEX_POINT"), 8);
        assert_eq!(count_records(&text, "EDGE_CURVE"), 12);
        assert_eq!(count_records(&text, "ORIENTED_EDGE"), 24);
        assert_eq!(count_records(&text, "ADVANCED_FACE"), 6);
        assert_eq!(count_records(&text, "PLANE"), 6);
        assert_eq!(count_records(&text, "CLOSED_SHELL"), 1);
        assert_eq!(count_records(&text, "MANIFOLD_SOLID_BREP"), 1);
        assert_eq!(count_records(&text, "FACE_BOUND"), 0);
    }

    #[test]
    fn round_hole_entity_counts() {
        let text = export(vec![square(), Contour::circle(p(5.0, 5.0), 1.0).unwrap()]);
        assert_eq!(count_records(&text, "VERTEX_POINT"), 10);
        assert_eq!(count_records(&text, "EDGE_CURVE"), 15);
        assert_eq!(count_records(&text, "CIRCLE"), 2);
        assert_eq!(count_records(&text, "CYLINDRICAL_SURFACE"), 1);
        assert_eq!(count_records(&text, "ADVANCED_FACE"), 7);
        // Top and bottom each carry the hole as a non-outer bound.
        assert_eq!(count_records(&text, "FACE_BOUND"), 2);
        assert_eq!(count_records(&text, "FACE_OUTER_BOUND"), 7);
    }

    #[test]
    fn hole_cylinder_face_sense_is_false() {
        let text = export(vec![square(), Contour::circle(p(5.0, 5.0), 1.0).unwrap()]);
        let reversed = text
            .lines()
            .filter(|line| line.contains("=ADVANCED_FACE(") && line.ends_with(",.F.);"))
            .count();
        assert_eq!(reversed, 1);
    }

    #[test]
    fn multiple_outlines_become_numbered_bodies() {
        let left =
            Contour::polygon(vec![p(0.0, 0.0), p(0.0, 10.0), p(10.0, 10.0), p(10.0, 0.0)]).unwrap();
        let right = Contour::polygon(vec![
            p(20.0, 0.0),
            p(20.0, 10.0),
            p(30.0, 10.0),
            p(30.0, 0.0),
        ])
        .unwrap();
        let outlines = vec![
            Outline::new(vec![left]).unwrap(),
            Outline::new(vec![right]).unwrap(),
        ];

        let mut out = Vec::new();
        export_outlines(&outlines, 1.6, &ExportOptions::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(count_records(&text, "MANIFOLD_SOLID_BREP"), 2);
        assert!(text.contains("=MANIFOLD_SOLID_BREP('part body - 1',"));
        assert!(text.contains("=MANIFOLD_SOLID_BREP('part body - 2',"));
        assert_eq!(count_records(&text, "PRODUCT"), 1);
        assert_eq!(
            count_records(&text, "SHAPE_DEFINITION_REPRESENTATION"),
            1
        );
    }

    #[test]
    fn assembly_export_emits_one_product_per_part() {
        let left =
            Contour::polygon(vec![p(0.0, 0.0), p(0.0, 10.0), p(10.0, 10.0), p(10.0, 0.0)]).unwrap();
        let right = Contour::polygon(vec![
            p(20.0, 0.0),
            p(20.0, 10.0),
            p(30.0, 10.0),
            p(30.0, 0.0),
        ])
        .unwrap();
        let outlines = vec![
            Outline::new(vec![left]).unwrap(),
            Outline::new(vec![right]).unwrap(),
        ];

        let mut out = Vec::new();
        export_outlines_assembly(&outlines, 1.6, &ExportOptions::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(count_records(&text, "PRODUCT"), 2);
        assert_eq!(count_records(&text, "SHAPE_DEFINITION_REPRESENTATION"), 2);
        assert_eq!(count_records(&text, "MANIFOLD_SOLID_BREP"), 2);
        assert!(text.contains("=PRODUCT('part id-1','part name - 1',"));
        assert!(text.contains("=PRODUCT('part id-2','part name - 2',"));
        assert!(text.contains("=MANIFOLD_SOLID_BREP('part body - 1',"));
        assert!(text.contains("=MANIFOLD_SOLID_BREP('part body - 2',"));

        let ids = defined_ids(&text);
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(*id, i as u64 + 1, "identifiers must be dense from #1");
        }
        let defined: HashSet<u64> = ids.into_iter().collect();
        for id in referenced_ids(&text) {
            assert!(defined.contains(&id), "#{id} is referenced but never defined");
        }
    }

    #[test]
    fn single_part_assembly_keeps_unnumbered_names() {
        let outlines = vec![Outline::new(vec![square()]).unwrap()];
        let mut out = Vec::new();
        export_outlines_assembly(&outlines, 1.6, &ExportOptions::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(count_records(&text, "PRODUCT"), 1);
        assert!(text.contains("=PRODUCT('part id','part name',"));
        assert!(text.contains("=MANIFOLD_SOLID_BREP('part body',"));
    }

    #[test]
    fn empty_assembly_is_rejected() {
        let mut out = Vec::new();
        let result = export_outlines_assembly(&[], 1.6, &ExportOptions::default(), &mut out);
        assert!(result.is_err());
    }

    #[test]
    fn top_and_bottom_faces_get_colour_overrides() {
        let text = export(vec![square()]);
        assert_eq!(count_records(&text, "STYLED_ITEM"), 1);
        assert_eq!(count_records(&text, "OVER_RIDING_STYLED_ITEM"), 2);
        assert_eq!(count_records(&text, "PRESENTATION_LAYER_ASSIGNMENT"), 1);
        assert_eq!(
            count_records(
                &text,
                "MECHANICAL_DESIGN_GEOMETRIC_PRESENTATION_REPRESENTATION"
            ),
            1
        );
    }

    #[test]
    fn body_style_only_without_face_override() {
        let outline = Outline::new(vec![square()]).unwrap();
        let options = ExportOptions {
            top_bottom_appearance: None,
            ..ExportOptions::default()
        };
        let mut out = Vec::new();
        export_outline(&outline, 1.6, &options, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(count_records(&text, "STYLED_ITEM"), 1);
        assert_eq!(count_records(&text, "OVER_RIDING_STYLED_ITEM"), 0);
    }

    #[test]
    fn empty_outline_slice_is_rejected() {
        let mut out = Vec::new();
        let result = export_outlines(&[], 1.6, &ExportOptions::default(), &mut out);
        assert!(result.is_err());
    }

    #[test]
    fn envelope_carries_caller_metadata() {
        let outline = Outline::new(vec![square()]).unwrap();
        let options = ExportOptions {
            file_name: "test.step".into(),
            timestamp: "2026-08-30T12:00:00".into(),
            ..ExportOptions::default()
        };
        let mut out = Vec::new();
        export_outline(&outline, 1.6, &options, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("/* name */ 'test.step',"));
        assert!(text.contains("/* time_stamp */ '2026-08-30T12:00:00',"));
    }
}
