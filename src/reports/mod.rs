mod dra;
mod model;
mod rca;
mod template;

pub use dra::*;
pub use model::*;
pub use rca::*;
pub use template::resolve_sections;
