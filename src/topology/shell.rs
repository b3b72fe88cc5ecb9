use super::face::FaceId;

slotmap::new_key_type! {
    /// Unique identifier for a shell in the topology store.
    pub struct ShellId;
}

/// Data associated with a topological shell.
///
/// A shell is a connected set of faces bounding a solid. Extrusion
/// always marks its shells closed; `is_closed` is an asserted claim,
/// not a derived property, and validation checks it against the
/// edge usage of the faces.
#[derive(Debug, Clone)]
pub struct ShellData {
    /// The faces that make up this shell, bottom and top first, then
    /// one side face per outline segment.
    pub faces: Vec<FaceId>,
    /// Whether this shell is watertight.
    pub is_closed: bool,
}
