pub mod liquidity;
pub mod pool;
pub mod swap;

pub use liquidity::*;
pub use pool::*;
pub use swap::*;
