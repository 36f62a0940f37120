// Domain layer: order model, response envelope and the provider port.

pub mod model;
pub mod ports;
