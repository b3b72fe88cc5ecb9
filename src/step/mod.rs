pub mod export;
pub mod id;
pub mod writer;

pub use export::{
    export_outline, export_outlines, export_outlines_assembly, Appearance, ExportOptions,
};
pub use id::{IdAllocator, StepId};
pub use writer::{EdgeIds, FileHeader, StepWriter, SurfaceSide};
