pub mod action;
pub mod errors;
pub mod ids;
pub mod operation;
pub mod plan;

pub use action::*;
pub use errors::*;
pub use ids::*;
pub use operation::*;
pub use plan::*;
