pub mod coord;
pub mod cube;
pub mod list;

pub mod error;

// Re-export the handful of items almost every caller needs
pub use coord::Coord;
pub use cube::{Cube, CubeMetadata};
pub use error::{CubeError, CubeResult};
pub use list::CubeList;
