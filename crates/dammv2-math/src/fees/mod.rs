pub mod dynamic_fee;
pub mod fee_mode;
pub mod scheduler;

pub use dynamic_fee::*;
pub use fee_mode::*;
pub use scheduler::*;
