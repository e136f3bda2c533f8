pub mod chart;
pub mod indicator;
pub mod stock;

pub use chart::*;
pub use indicator::*;
pub use stock::*;
