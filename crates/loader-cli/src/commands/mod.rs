pub mod demo;
pub mod spinner;
pub mod trace;

mod terminal;
