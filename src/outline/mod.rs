use crate::error::{OutlineError, Result};
use crate::math::{Point2, TOLERANCE};

/// A closed 2D boundary in the board plane.
///
/// Coordinates are millimeters in the board's planar coordinate system.
/// Polygonal contours are implicitly closed: segment `i` runs from point
/// `i` to point `(i + 1) % N`. A circular contour is a full circle and
/// counts as a single segment.
///
/// Winding contract (trusted, not checked): the outer contour of an
/// outline is wound clockwise viewed from +Z and hole contours
/// counter-clockwise, so board material always lies to the right of
/// travel and the left-pointing perpendicular of every segment points out
/// of the solid. Circular contours carry no point order; their traversal
/// sense follows from their role in the outline.
#[derive(Debug, Clone)]
pub enum Contour {
    /// An ordered, implicitly closed point sequence.
    Polygon(Vec<Point2>),
    /// A full circle, used for round cutouts and round board outlines.
    Circle {
        /// Center of the circle.
        center: Point2,
        /// Radius (positive).
        radius: f64,
    },
}

impl Contour {
    /// Creates a polygonal contour.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::TooFewPoints`] for fewer than 3 points.
    pub fn polygon(points: Vec<Point2>) -> Result<Self> {
        if points.len() < 3 {
            return Err(OutlineError::TooFewPoints(points.len()).into());
        }
        Ok(Self::Polygon(points))
    }

    /// Creates a circular contour.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::InvalidRadius`] for a non-positive radius.
    pub fn circle(center: Point2, radius: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(OutlineError::InvalidRadius(radius).into());
        }
        Ok(Self::Circle { center, radius })
    }

    /// Number of boundary segments: the point count for polygons, 1 for
    /// circles (the whole circle, addressed through a single synthetic
    /// anchor point).
    #[must_use]
    pub fn segment_count(&self) -> usize {
        match self {
            Self::Polygon(points) => points.len(),
            Self::Circle { .. } => 1,
        }
    }

    /// Returns the i-th boundary point, taken modulo [`segment_count`].
    ///
    /// For a circular contour this is always the fixed anchor point
    /// directly left of center, `(cx - r, cy)`. The anchor establishes the
    /// reference frame along the circle and carries the vertical seam edge
    /// of the extruded cylinder.
    ///
    /// [`segment_count`]: Self::segment_count
    #[must_use]
    pub fn point_at(&self, i: usize) -> Point2 {
        match self {
            Self::Polygon(points) => points[i % points.len()],
            Self::Circle { center, radius } => Point2::new(center.x - radius, center.y),
        }
    }
}

/// An ordered list of closed contours describing the board region.
///
/// The first contour is the outer board boundary; every further contour is
/// a hole nested inside it. Holes never nest inside other holes.
#[derive(Debug, Clone)]
pub struct Outline {
    contours: Vec<Contour>,
}

impl Outline {
    /// Creates an outline from an ordered contour list.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Empty`] if the list is empty.
    pub fn new(contours: Vec<Contour>) -> Result<Self> {
        if contours.is_empty() {
            return Err(OutlineError::Empty.into());
        }
        Ok(Self { contours })
    }

    /// Returns the ordered contour list (outer boundary first).
    #[must_use]
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Returns the outer board boundary.
    #[must_use]
    pub fn outer(&self) -> &Contour {
        &self.contours[0]
    }

    /// Returns the hole contours.
    #[must_use]
    pub fn holes(&self) -> &[Contour] {
        &self.contours[1..]
    }

    /// Total number of boundary segments across all contours.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.contours.iter().map(Contour::segment_count).sum()
    }
}
