use minijinja::context;

use super::render;

/// Type names `helpers.ts` exports; `index.ts` re-exports exactly these.
pub const HELPER_EXPORTS: [&str; 16] = [
    "Paths",
    "PathsWith",
    "OperationOf",
    "RequestBodyOf",
    "ResponseOf",
    "SuccessResponseOf",
    "PathParamsOf",
    "QueryParamsOf",
    "OperationId",
    "OperationById",
    "RequestBodyById",
    "ResponseById",
    "QueryParamsById",
    "PathParamsById",
    "SchemaName",
    "Schema",
];

/// Emit `helpers.ts`, the type-extraction utilities keyed by path and
/// method, by operationId, or by schema name.
pub fn emit_helpers(generated_at: &str, types_import: &str) -> Result<String, minijinja::Error> {
    render(
        "helpers.ts.j2",
        context! {
            generated_at => generated_at,
            types_import => types_import,
        },
    )
}
