pub mod commands;
pub mod multi_select;
pub mod selection;
