pub mod extract;
pub mod files;
pub mod naming;

pub use extract::{extract, extract_path_params, index_by_operation_id};
pub use naming::to_identifier;
