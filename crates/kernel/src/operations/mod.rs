pub mod extrude;
pub mod sampling;
pub mod shell;
