use minijinja::context;

use super::render;

/// Emit `errors.ts`: the `{ data, error }` result shape and payload normalization.
pub fn emit_errors(generated_at: &str) -> Result<String, minijinja::Error> {
    render("errors.ts.j2", context! { generated_at => generated_at })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_errors() {
        let out = emit_errors("T").unwrap();
        assert!(out.starts_with("// Generated by acg at T."));
        assert!(out.contains(r#"["message", "error", "errors", "detail", "title"]"#));
        assert!(out.contains("export function normalizeError("));
        assert!(!out.contains("throw "));
    }
}
