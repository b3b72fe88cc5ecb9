mod extrude;
mod is_valid;
mod volume;

pub use extrude::ExtrudeOutline;
pub use is_valid::IsValid;
pub use volume::Volume;
