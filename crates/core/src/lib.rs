pub mod error;
pub mod model;
pub mod op;
pub mod replay;
pub mod reset;

pub use error::Error;
pub use model::{Document, Revision};
pub use op::Instruction;
pub use replay::Direction;
