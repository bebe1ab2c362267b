use minijinja::context;

use super::helpers::HELPER_EXPORTS;
use super::render;

/// Emit the `index.ts` barrel.
pub fn emit_index(generated_at: &str) -> Result<String, minijinja::Error> {
    render(
        "index.ts.j2",
        context! {
            generated_at => generated_at,
            helper_exports => HELPER_EXPORTS,
        },
    )
}
