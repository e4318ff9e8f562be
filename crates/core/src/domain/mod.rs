pub mod model;
pub mod seeds;
