pub mod client;
pub mod errors;
pub mod helpers;
pub mod index;
pub mod instance;
pub mod operations;

use minijinja::{Environment, Value};

const TEMPLATES: [(&str, &str); 6] = [
    ("operations.ts.j2", include_str!("../../templates/operations.ts.j2")),
    ("helpers.ts.j2", include_str!("../../templates/helpers.ts.j2")),
    ("client.ts.j2", include_str!("../../templates/client.ts.j2")),
    ("errors.ts.j2", include_str!("../../templates/errors.ts.j2")),
    ("instance.ts.j2", include_str!("../../templates/instance.ts.j2")),
    ("index.ts.j2", include_str!("../../templates/index.ts.j2")),
];

/// Escape `*/` sequences that would prematurely close JSDoc comment blocks.
fn escape_jsdoc(value: &str) -> String {
    value.replace("*/", "*\\/")
}

fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    for (name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}

/// Render one of the bundled templates.
pub(crate) fn render(name: &str, ctx: Value) -> Result<String, minijinja::Error> {
    let env = environment()?;
    let tmpl = env.get_template(name)?;
    tmpl.render(ctx)
}

/// Render a JSDoc block at `indent`, or `None` when there is nothing to say.
pub(crate) fn jsdoc(summary: &str, description: &str, indent: &str) -> Option<String> {
    let lines = doc_lines(summary, description);
    match lines.as_slice() {
        [] => None,
        [line] => Some(format!("{indent}/** {} */", escape_jsdoc(line))),
        _ => {
            let mut out = format!("{indent}/**\n");
            for line in &lines {
                if line.is_empty() {
                    out.push_str(&format!("{indent} *\n"));
                } else {
                    out.push_str(&format!("{indent} * {}\n", escape_jsdoc(line)));
                }
            }
            out.push_str(&format!("{indent} */"));
            Some(out)
        }
    }
}

/// Split free text into JSDoc lines; blank input gives no lines.
fn doc_lines(summary: &str, description: &str) -> Vec<String> {
    let mut lines: Vec<String> = summary
        .lines()
        .map(|l| l.trim_end().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    let description = description.trim();
    if !description.is_empty() && description != summary.trim() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(description.lines().map(|l| l.trim_end().to_string()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_parse() {
        let env = environment().unwrap();
        for (name, _) in TEMPLATES {
            assert!(env.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_doc_lines() {
        assert!(doc_lines("", "  ").is_empty());
        assert_eq!(doc_lines("List pets", ""), vec!["List pets"]);
        assert_eq!(doc_lines("List pets", "List pets"), vec!["List pets"]);
        assert_eq!(
            doc_lines("Move", "First line.\nSecond line."),
            vec!["Move", "", "First line.", "Second line."]
        );
        assert_eq!(doc_lines("", "Only description"), vec!["Only description"]);
    }

    #[test]
    fn test_jsdoc() {
        assert_eq!(jsdoc("", "", "  "), None);
        assert_eq!(jsdoc("Ends */ early", "", "").unwrap(), "/** Ends *\\/ early */");
        assert_eq!(
            jsdoc("Move", "Details", "    ").unwrap(),
            "    /**\n     * Move\n     *\n     * Details\n     */"
        );
    }
}
