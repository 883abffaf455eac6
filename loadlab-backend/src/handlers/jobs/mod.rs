pub mod burst;
pub mod get;
pub mod submit;
