pub mod operation;

pub use operation::{FieldKind, FileField, HttpMethod, OperationDescriptor};
