pub mod analysis;
pub mod quiz;
pub mod worlds;
