pub mod controls;
pub mod debug;
pub mod grid;
