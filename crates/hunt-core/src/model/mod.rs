pub mod cell;
pub mod position;
pub mod terrain;
