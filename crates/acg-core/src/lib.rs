pub mod cache;
pub mod config;
pub mod diff;
pub mod error;
pub mod ir;
pub mod parse;
pub mod reporter;
pub mod transform;
pub mod validate;
pub mod writer;

pub use ir::OperationDescriptor;
pub use parse::SpecDocument;
pub use reporter::Reporter;

/// When a generated file may replace one that already exists on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Regenerated on every run.
    #[default]
    Always,
    /// Written only when absent; the file is meant to be edited by hand.
    IfMissing,
}

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
    pub policy: WritePolicy,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            policy: WritePolicy::Always,
        }
    }

    pub fn with_policy(mut self, policy: WritePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Trait for code generators that produce files from extracted operations.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;
    fn generate(
        &self,
        operations: &[OperationDescriptor],
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
