pub mod color;
pub mod normalize;
