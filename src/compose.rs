pub mod frame;
pub mod layers;
pub mod text;
