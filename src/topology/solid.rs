use super::shell::ShellId;

slotmap::new_key_type! {
    /// Unique identifier for a solid in the topology store.
    pub struct SolidId;
}

/// Data associated with a topological solid.
///
/// A manifold solid is a bounded volume enclosed by a single closed shell.
#[derive(Debug, Clone)]
pub struct SolidData {
    /// The shell bounding the solid.
    pub outer_shell: ShellId,
}
