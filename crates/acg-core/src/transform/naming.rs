use heck::ToPascalCase;

/// Convert a snake- or kebab-case parameter name to camelCase.
///
/// Only a `-` or `_` directly followed by an ASCII lowercase letter is
/// collapsed (`user_id` → `userId`, `user-id` → `userId`). Everything else is
/// left alone, so the conversion is idempotent.
pub fn to_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if matches!(ch, '-' | '_')
            && let Some(&next) = chars.peek()
            && next.is_ascii_lowercase()
        {
            out.push(next.to_ascii_uppercase());
            chars.next();
            continue;
        }
        out.push(ch);
    }

    out
}

/// The synthetic path-parameter record for an operation: one
/// `string | number` field per distinct converted name, in path order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParamRecord {
    pub fields: Vec<String>,
}

/// Build the path-parameter record, or `None` when no argument is needed.
pub fn path_params_type(path_params: &[String]) -> Option<PathParamRecord> {
    if path_params.is_empty() {
        return None;
    }
    let mut fields: Vec<String> = Vec::with_capacity(path_params.len());
    for name in path_params.iter().map(|p| to_identifier(p)) {
        if !fields.contains(&name) {
            fields.push(name);
        }
    }
    Some(PathParamRecord { fields })
}

/// Whether `name` can be written bare as a TypeScript identifier / object key.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Render `name` as an object key, quoting it when it is not an identifier.
pub fn property_key(name: &str) -> String {
    if is_valid_identifier(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// PascalCase type-name stem for an operationId, e.g. `getUserById` → `GetUserById`.
pub fn type_name(operation_id: &str) -> String {
    let pascal = operation_id.to_pascal_case();
    if pascal.is_empty() {
        return "Unnamed".to_string();
    }
    if pascal.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Op{pascal}")
    } else {
        pascal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_and_kebab() {
        assert_eq!(to_identifier("user_id"), "userId");
        assert_eq!(to_identifier("user-id"), "userId");
        assert_eq!(to_identifier("org_member_id"), "orgMemberId");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(to_identifier("userId"), "userId");
        assert_eq!(to_identifier("id"), "id");
        assert_eq!(to_identifier("version_2"), "version_2");
        assert_eq!(to_identifier("User_Id"), "User_Id");
        assert_eq!(to_identifier("trailing_"), "trailing_");
        assert_eq!(to_identifier("_private"), "Private");
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "user_id", "a--b", "a-_b", "__x", "x__y_z", "already-Camel", "-", "", "ü_x", "a_b-c_d",
        ] {
            let once = to_identifier(raw);
            assert_eq!(to_identifier(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_repeated_separators() {
        assert_eq!(to_identifier("a--b"), "a-B");
        assert_eq!(to_identifier("a-_b"), "a-B");
    }

    #[test]
    fn test_path_params_type() {
        assert_eq!(path_params_type(&[]), None);
        let record = path_params_type(&[
            "user_id".to_string(),
            "postId".to_string(),
            "user-id".to_string(),
        ])
        .unwrap();
        assert_eq!(record.fields, vec!["userId", "postId"]);
    }

    #[test]
    fn test_property_key() {
        assert_eq!(property_key("getUser"), "getUser");
        assert_eq!(property_key("get-user"), "\"get-user\"");
        assert_eq!(property_key("2fa"), "\"2fa\"");
        assert_eq!(property_key("$ref"), "$ref");
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name("getUserById"), "GetUserById");
        assert_eq!(type_name("list_pets"), "ListPets");
        assert_eq!(type_name("2fa-verify"), "Op2faVerify");
    }
}
