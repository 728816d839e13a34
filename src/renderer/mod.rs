//! Render adapter
//!
//! Converts simulation snapshots into colored triangle lists. Uploading and
//! drawing them is the host's job.

pub mod shapes;
pub mod vertex;

pub use shapes::{Palette, build_frame};
pub use vertex::Vertex;
