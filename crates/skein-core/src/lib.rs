pub mod error;
pub mod tolerance;
pub mod traits;

pub use error::{Relation, Result, SkeinError};
pub use tolerance::{ensure_positive, Tolerance};
