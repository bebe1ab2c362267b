pub mod ast;
pub mod call_shape;
pub mod emitters;
pub mod generator;

pub use call_shape::{BodySlot, CallShape};
pub use generator::{EmitConfig, TsClientError, TsClientGenerator};
