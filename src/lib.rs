use vector2d::Vector2D;

pub mod codegen;
mod error;
mod indexed_vec;
pub mod ir;
pub mod scene;
mod utils;

pub use codegen::{gen_code_string, CodeGenOpts};
pub use error::{BalanceError, Error, Result};
pub use ir::optimize::OptimizeOpts;
pub use scene::Scene;
pub use utils::Rect2;

/// Type alias for 2D floating point vectors (in the geometric sense, unlike [`Vec`])
pub type V2 = Vector2D<f32>;
