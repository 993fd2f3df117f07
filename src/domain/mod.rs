// Domain layer: value types and ports (capability traits). No I/O here.

pub mod model;
pub mod ports;
