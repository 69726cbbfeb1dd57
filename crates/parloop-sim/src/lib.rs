pub mod driver;
pub mod geometry;
pub mod levelgen;
pub mod physics;
pub mod terrain;
