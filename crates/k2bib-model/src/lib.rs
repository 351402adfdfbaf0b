pub mod error;
pub mod identifier;
pub mod cycle;
pub mod proposal;

pub use error::*;
pub use identifier::*;
pub use cycle::*;
pub use proposal::*;
