pub mod mode;
pub mod registry;
pub mod time;
pub mod viewport;
