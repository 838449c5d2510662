pub mod generation;
pub mod types;

pub use generation::PlateMap;
pub use types::{Plate, PlateId, PlateType};
