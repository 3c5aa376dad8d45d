pub mod stock;
pub mod vendor;

pub use stock::*;
pub use vendor::*;
