pub mod curve;
pub mod surface;

pub use curve::{Circle, Curve, CurveDomain, Line};
pub use surface::{Cylinder, Plane, Surface, SurfaceDomain};
