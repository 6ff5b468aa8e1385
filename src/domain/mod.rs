// Domain layer: request/response shapes and the ports the gateway talks through.

pub mod model;
pub mod ports;
