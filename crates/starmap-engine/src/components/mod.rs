pub mod layer;
pub mod proxy;
