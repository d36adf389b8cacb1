pub mod shutdown;
pub mod types;
pub mod utils;

pub use shutdown::*;
pub use types::*;
pub use utils::*;
