use std::io::Write;

use crate::error::StepError;

use super::id::{IdAllocator, StepId};

type Result<T> = std::result::Result<T, StepError>;

/// Values of the FILE_NAME and FILE_DESCRIPTION header records.
#[derive(Debug, Clone, Copy)]
pub struct FileHeader<'a> {
    pub file_name: &'a str,
    pub description: &'a str,
    /// ISO-8601 text, supplied by the caller.
    pub timestamp: &'a str,
    pub author: &'a str,
    pub organisation: &'a str,
    pub preprocessor_version: &'a str,
    pub originating_system: &'a str,
}

/// Which side of a surface a presentation style applies to.
#[derive(Debug, Clone, Copy)]
pub enum SurfaceSide {
    Positive,
    Negative,
    Both,
}

impl SurfaceSide {
    fn token(self) -> &'static str {
        match self {
            Self::Positive => ".POSITIVE.",
            Self::Negative => ".NEGATIVE.",
            Self::Both => ".BOTH.",
        }
    }
}

/// The three identifiers allocated for one edge: the EDGE_CURVE record
/// plus its forward and reversed ORIENTED_EDGE wrappers.
///
/// Loops reference whichever wrapper matches their traversal direction,
/// so consumers never derive identifiers by arithmetic on `edge`.
#[derive(Debug, Clone, Copy)]
pub struct EdgeIds {
    pub edge: StepId,
    pub forward: StepId,
    pub reverse: StepId,
}

impl EdgeIds {
    /// The oriented wrapper for the given traversal direction.
    #[must_use]
    pub fn oriented(&self, forward: bool) -> StepId {
        if forward {
            self.forward
        } else {
            self.reverse
        }
    }
}

fn bool_token(value: bool) -> &'static str {
    if value {
        ".T."
    } else {
        ".F."
    }
}

fn id_list(ids: &[StepId]) -> String {
    let mut out = String::from("(");
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&id.to_string());
    }
    out.push(')');
    out
}

/// Emits ISO-10303-21 records to an output stream, one per line.
///
/// Owns the identifier allocator; every emitter allocates the record's
/// identifier, writes the record, and returns the identifier for use as
/// a reference in later records. No geometric validation happens here,
/// the emitters transcribe whatever they are handed.
pub struct StepWriter<W: Write> {
    out: W,
    ids: IdAllocator,
}

impl<W: Write> StepWriter<W> {
    /// Creates a writer over the given output stream.
    pub fn new(out: W) -> Self {
        Self {
            out,
            ids: IdAllocator::new(),
        }
    }

    /// Consumes the writer, returning the underlying stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    // --- Document framing ---

    /// Writes the `ISO-10303-21;` header section and opens `DATA;`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn begin_document(&mut self, header: &FileHeader<'_>) -> Result<()> {
        writeln!(self.out, "ISO-10303-21;")?;
        writeln!(self.out, "HEADER;")?;
        writeln!(self.out, "FILE_DESCRIPTION (")?;
        writeln!(self.out, "/* description */ ('{}'),", header.description)?;
        writeln!(self.out, "/* implementation level */ '1');")?;
        writeln!(self.out, "FILE_NAME (/* name */ '{}',", header.file_name)?;
        writeln!(self.out, "/* time_stamp */ '{}',", header.timestamp)?;
        writeln!(self.out, "/* author */ ( '{}' ),", header.author)?;
        writeln!(self.out, "/* organisation */ ( '{}' ),", header.organisation)?;
        writeln!(
            self.out,
            "/* preprocessor_version */ '{}',",
            header.preprocessor_version
        )?;
        writeln!(
            self.out,
            "/* originating system */ '{}',",
            header.originating_system
        )?;
        writeln!(self.out, "/* authorisation */ '' );")?;
        writeln!(self.out, "FILE_SCHEMA (( 'AUTOMOTIVE_DESIGN' ));")?;
        writeln!(self.out, "ENDSEC;")?;
        writeln!(self.out)?;
        writeln!(self.out, "DATA;")?;
        Ok(())
    }

    /// Closes the data section and the exchange file.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn end_document(&mut self) -> Result<()> {
        writeln!(self.out, "ENDSEC;")?;
        writeln!(self.out, "END-ISO-10303-21;")?;
        Ok(())
    }

    // --- Product and context records ---

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn application_context(&mut self, application: &str) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(self.out, "{id}=APPLICATION_CONTEXT('{application}');")?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn application_protocol_definition(
        &mut self,
        status: &str,
        schema_name: &str,
        protocol_year: &str,
        application: StepId,
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=APPLICATION_PROTOCOL_DEFINITION('{status}','{schema_name}',{protocol_year},{application});"
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn product_context(
        &mut self,
        name: &str,
        frame_of_reference: StepId,
        discipline_type: &str,
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=PRODUCT_CONTEXT('{name}',{frame_of_reference},'{discipline_type}');"
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn product(
        &mut self,
        product_id: &str,
        name: &str,
        description: &str,
        frame_of_reference: &[StepId],
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=PRODUCT('{product_id}','{name}','{description}',{});",
            id_list(frame_of_reference)
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn product_related_product_category(
        &mut self,
        name: &str,
        description: Option<&str>,
        products: &[StepId],
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        match description {
            Some(description) => writeln!(
                self.out,
                "{id}=PRODUCT_RELATED_PRODUCT_CATEGORY('{name}','{description}',{});",
                id_list(products)
            )?,
            None => writeln!(
                self.out,
                "{id}=PRODUCT_RELATED_PRODUCT_CATEGORY('{name}',$,{});",
                id_list(products)
            )?,
        }
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn product_definition_context(
        &mut self,
        name: &str,
        frame_of_reference: StepId,
        life_cycle_stage: &str,
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=PRODUCT_DEFINITION_CONTEXT('{name}',{frame_of_reference},'{life_cycle_stage}');"
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn product_definition_formation(
        &mut self,
        formation_id: &str,
        description: &str,
        of_product: StepId,
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=PRODUCT_DEFINITION_FORMATION('{formation_id}','{description}',{of_product});"
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn product_definition(
        &mut self,
        definition_id: &str,
        description: &str,
        formation: StepId,
        frame_of_reference: StepId,
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=PRODUCT_DEFINITION('{definition_id}','{description}',{formation},{frame_of_reference});"
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn product_definition_shape(
        &mut self,
        name: &str,
        description: &str,
        definition: StepId,
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=PRODUCT_DEFINITION_SHAPE('{name}','{description}',{definition});"
        )?;
        Ok(id)
    }

    /// Emits the millimetre/radian unit block and the geometric
    /// representation context referencing it, returning the context.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn geometric_representation_context(&mut self) -> Result<StepId> {
        let length = self.ids.alloc();
        writeln!(
            self.out,
            "{length}=(LENGTH_UNIT()NAMED_UNIT(*)SI_UNIT(.MILLI.,.METRE.));"
        )?;
        let angle = self.ids.alloc();
        writeln!(
            self.out,
            "{angle}=(NAMED_UNIT(*)PLANE_ANGLE_UNIT()SI_UNIT($,.RADIAN.));"
        )?;
        let solid_angle = self.ids.alloc();
        writeln!(
            self.out,
            "{solid_angle}=(NAMED_UNIT(*)SI_UNIT($,.STERADIAN.)SOLID_ANGLE_UNIT());"
        )?;
        let uncertainty = self.ids.alloc();
        writeln!(
            self.out,
            "{uncertainty}=UNCERTAINTY_MEASURE_WITH_UNIT(LENGTH_MEASURE(1.0E-005),{length},'distance_accuracy_value','NONE');"
        )?;
        let context = self.ids.alloc();
        writeln!(
            self.out,
            "{context}=(GEOMETRIC_REPRESENTATION_CONTEXT(3)\
             GLOBAL_UNCERTAINTY_ASSIGNED_CONTEXT(({uncertainty}))\
             GLOBAL_UNIT_ASSIGNED_CONTEXT(({length},{angle},{solid_angle}))\
             REPRESENTATION_CONTEXT('NONE','WORKASPACE'));"
        )?;
        Ok(context)
    }

    // --- Geometry records ---

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn cartesian_point(&mut self, name: &str, x: f64, y: f64, z: f64) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=CARTESIAN_POINT('{name}',({x:.6},{y:.6},{z:.6}));"
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn direction(&mut self, name: &str, x: f64, y: f64, z: f64) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(self.out, "{id}=DIRECTION('{name}',({x:.6},{y:.6},{z:.6}));")?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn vector(&mut self, name: &str, orientation: StepId, magnitude: f64) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=VECTOR('{name}',{orientation},{magnitude:.6});"
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn axis2_placement_3d(
        &mut self,
        name: &str,
        location: StepId,
        axis: StepId,
        ref_direction: StepId,
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=AXIS2_PLACEMENT_3D('{name}',{location},{axis},{ref_direction});"
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn plane(&mut self, name: &str, position: StepId) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(self.out, "{id}=PLANE('{name}',{position});")?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn cylindrical_surface(
        &mut self,
        name: &str,
        position: StepId,
        radius: f64,
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=CYLINDRICAL_SURFACE('{name}',{position},{radius:.6});"
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn line(&mut self, name: &str, point: StepId, vector: StepId) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(self.out, "{id}=LINE('{name}',{point},{vector});")?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn circle(&mut self, name: &str, position: StepId, radius: f64) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(self.out, "{id}=CIRCLE('{name}',{position},{radius:.6});")?;
        Ok(id)
    }

    // --- Topology records ---

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn vertex_point(&mut self, name: &str, point: StepId) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(self.out, "{id}=VERTEX_POINT('{name}',{point});")?;
        Ok(id)
    }

    /// Emits an EDGE_CURVE together with its two ORIENTED_EDGE wrappers
    /// and returns all three identifiers.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn edge_curve(
        &mut self,
        name: &str,
        start: StepId,
        end: StepId,
        geometry: StepId,
        same_sense: bool,
    ) -> Result<EdgeIds> {
        let edge = self.ids.alloc();
        writeln!(
            self.out,
            "{edge}=EDGE_CURVE('{name}',{start},{end},{geometry},{});",
            bool_token(same_sense)
        )?;
        let forward = self.oriented_edge(name, edge, true)?;
        let reverse = self.oriented_edge(name, edge, false)?;
        Ok(EdgeIds {
            edge,
            forward,
            reverse,
        })
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn oriented_edge(&mut self, name: &str, edge: StepId, orientation: bool) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=ORIENTED_EDGE('{name}',*,*,{edge},{});",
            bool_token(orientation)
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn edge_loop(&mut self, name: &str, edges: &[StepId]) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(self.out, "{id}=EDGE_LOOP('{name}',{});", id_list(edges))?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn face_bound(&mut self, name: &str, bound: StepId, orientation: bool) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=FACE_BOUND('{name}',{bound},{});",
            bool_token(orientation)
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn face_outer_bound(
        &mut self,
        name: &str,
        bound: StepId,
        orientation: bool,
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=FACE_OUTER_BOUND('{name}',{bound},{});",
            bool_token(orientation)
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn advanced_face(
        &mut self,
        name: &str,
        bounds: &[StepId],
        geometry: StepId,
        same_sense: bool,
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=ADVANCED_FACE('{name}',{},{geometry},{});",
            id_list(bounds),
            bool_token(same_sense)
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn closed_shell(&mut self, name: &str, faces: &[StepId]) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(self.out, "{id}=CLOSED_SHELL('{name}',{});", id_list(faces))?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn manifold_solid_brep(&mut self, name: &str, outer: StepId) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(self.out, "{id}=MANIFOLD_SOLID_BREP('{name}',{outer});")?;
        Ok(id)
    }

    // --- Representation records ---

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn advanced_brep_shape_representation(
        &mut self,
        name: &str,
        items: &[StepId],
        context: StepId,
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=ADVANCED_BREP_SHAPE_REPRESENTATION('{name}',{},{context});",
            id_list(items)
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn shape_definition_representation(
        &mut self,
        definition: StepId,
        used_representation: StepId,
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=SHAPE_DEFINITION_REPRESENTATION({definition},{used_representation});"
        )?;
        Ok(id)
    }

    // --- Presentation records ---

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn colour_rgb(&mut self, name: &str, red: f64, green: f64, blue: f64) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=COLOUR_RGB('{name}',{red:.6},{green:.6},{blue:.6});"
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn fill_area_style_colour(&mut self, name: &str, fill_colour: StepId) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=FILL_AREA_STYLE_COLOUR('{name}',{fill_colour});"
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn fill_area_style(&mut self, name: &str, fill_styles: &[StepId]) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=FILL_AREA_STYLE('{name}',{});",
            id_list(fill_styles)
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn surface_style_fill_area(&mut self, fill_area: StepId) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(self.out, "{id}=SURFACE_STYLE_FILL_AREA({fill_area});")?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn surface_side_style(&mut self, name: &str, styles: &[StepId]) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=SURFACE_SIDE_STYLE('{name}',{});",
            id_list(styles)
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn surface_style_usage(&mut self, side: SurfaceSide, style: StepId) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=SURFACE_STYLE_USAGE({},{style});",
            side.token()
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn presentation_style_assignment(&mut self, styles: &[StepId]) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=PRESENTATION_STYLE_ASSIGNMENT({});",
            id_list(styles)
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn styled_item(&mut self, name: &str, styles: &[StepId], item: StepId) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=STYLED_ITEM('{name}',{},{item});",
            id_list(styles)
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn over_riding_styled_item(
        &mut self,
        name: &str,
        styles: &[StepId],
        item: StepId,
        over_ridden_style: StepId,
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=OVER_RIDING_STYLED_ITEM('{name}',{},{item},{over_ridden_style});",
            id_list(styles)
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn presentation_layer_assignment(
        &mut self,
        name: &str,
        description: &str,
        assigned_items: &[StepId],
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=PRESENTATION_LAYER_ASSIGNMENT('{name}','{description}',{});",
            id_list(assigned_items)
        )?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output stream fails.
    pub fn mechanical_design_geometric_presentation_representation(
        &mut self,
        name: &str,
        items: &[StepId],
        context: StepId,
    ) -> Result<StepId> {
        let id = self.ids.alloc();
        writeln!(
            self.out,
            "{id}=MECHANICAL_DESIGN_GEOMETRIC_PRESENTATION_REPRESENTATION('{name}',{},{context});",
            id_list(items)
        )?;
        Ok(id)
    }
}
