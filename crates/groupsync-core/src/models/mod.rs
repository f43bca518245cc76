mod enums;
mod structs;

pub use enums::*;
pub use structs::*;
