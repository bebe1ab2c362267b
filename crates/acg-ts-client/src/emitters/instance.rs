use acg_core::config::InstanceConfig;
use minijinja::context;

use super::render;

/// Emit `instance.ts`: the fetch-based transport, parameterized by `instance`.
pub fn emit_instance(
    instance: &InstanceConfig,
    generated_at: &str,
) -> Result<String, minijinja::Error> {
    render(
        "instance.ts.j2",
        context! {
            generated_at => generated_at,
            base_url => js_literal(&instance.base_url.clone().unwrap_or_default()),
            timeout_ms => instance.timeout_ms,
            headers => js_literal(&instance.headers),
            with_credentials => js_literal(&instance.with_credentials),
        },
    )
}

/// A JSON value is a valid JS expression; serializing a string or a string
/// map cannot fail.
fn js_literal<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "undefined".to_string())
}
