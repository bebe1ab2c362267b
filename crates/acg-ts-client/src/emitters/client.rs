use minijinja::context;

use super::render;

/// Emit `client.ts`, the hand-editable facade over the transport and the
/// generated operations.
pub fn emit_client(generated_at: &str) -> Result<String, minijinja::Error> {
    render("client.ts.j2", context! { generated_at => generated_at })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_methods() {
        let out = emit_client("T").unwrap();
        for method in ["get", "post", "put", "delete", "patch"] {
            assert!(out.contains(&format!("    {method}: transport.{method},")), "{method}");
        }
        assert!(out.contains("op: createOperations(transport),"));
    }
}
