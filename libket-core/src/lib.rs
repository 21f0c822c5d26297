pub mod engine;
pub mod maths;

pub use maths::complex::*;
pub use maths::format::*;
pub use maths::matrix::*;
pub use maths::numeric::*;
pub use maths::simd::SimdCapability;
pub use maths::vector_ops;

pub use engine::circuit::*;
pub use engine::error::*;
pub use engine::gates;
pub use engine::kernel::grover_iterations;
pub use engine::pool::*;
pub use engine::runtime::*;
pub use engine::state::*;
