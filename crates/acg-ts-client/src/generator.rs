use acg_core::config::InstanceConfig;
use acg_core::{CodeGenerator, GeneratedFile, OperationDescriptor, WritePolicy};

use crate::emitters;

/// Inputs the fixed templates are parameterized by.
#[derive(Debug, Clone)]
pub struct EmitConfig {
    /// Stamped into each file header; the only non-deterministic input.
    pub generated_at: String,
    /// Module specifier of the raw `paths` / `components` type map.
    pub types_import: String,
    pub instance: InstanceConfig,
    /// Rewrite the hand-editable files too.
    pub force: bool,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            generated_at: String::new(),
            types_import: "./schema".to_string(),
            instance: InstanceConfig::default(),
            force: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TsClientError {
    #[error("failed to render {file}: {source}")]
    Render {
        file: &'static str,
        #[source]
        source: minijinja::Error,
    },
}

/// TypeScript client generator.
pub struct TsClientGenerator;

impl CodeGenerator for TsClientGenerator {
    type Config = EmitConfig;
    type Error = TsClientError;

    fn generate(
        &self,
        operations: &[OperationDescriptor],
        config: &EmitConfig,
    ) -> Result<Vec<GeneratedFile>, TsClientError> {
        let stamp = config.generated_at.as_str();
        let editable = if config.force {
            WritePolicy::Always
        } else {
            WritePolicy::IfMissing
        };

        let render = |file: &'static str, result: Result<String, minijinja::Error>| {
            result
                .map(|content| GeneratedFile::new(file, content))
                .map_err(|source| TsClientError::Render { file, source })
        };

        let files = vec![
            render(
                "operations.ts",
                emitters::operations::emit_operations(operations, stamp, &config.types_import),
            )?,
            render("errors.ts", emitters::errors::emit_errors(stamp))?,
            render(
                "instance.ts",
                emitters::instance::emit_instance(&config.instance, stamp),
            )?,
            render(
                "helpers.ts",
                emitters::helpers::emit_helpers(stamp, &config.types_import),
            )?
            .with_policy(editable),
            render("client.ts", emitters::client::emit_client(stamp))?.with_policy(editable),
            render("index.ts", emitters::index::emit_index(stamp))?,
        ];

        log::debug!(
            "rendered {} files for {} operations",
            files.len(),
            operations.len()
        );
        Ok(files)
    }
}
