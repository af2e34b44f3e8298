pub mod cli;
pub mod io;
pub mod keymap;
pub mod model;
pub mod ops;
pub mod tui;
pub mod update;
