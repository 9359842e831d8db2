// Domain layer: registry record model and the ports the lookup flow depends on.

pub mod model;
pub mod ports;
