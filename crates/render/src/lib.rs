pub mod chart;
pub mod color;
pub mod interaction;
pub mod projection;
