pub mod constants;
pub mod field;

pub use constants::*;
pub use field::*;
