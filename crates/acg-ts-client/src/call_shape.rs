//! How a generated accessor invokes the transport.
//!
//! The transport takes `(path, [body], [pathParams], config)`. The body slot
//! and the path-parameter slot are decided here and nowhere else; the
//! signature and the call are both derived from the same [`CallShape`].

use acg_core::OperationDescriptor;
use acg_core::ir::HttpMethod;

use crate::ast::TsExpr;

pub const PATH_PARAMS_ARG: &str = "pathParams";
pub const DATA_ARG: &str = "data";
pub const CONFIG_ARG: &str = "config";

/// What goes in the body position of the transport call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySlot {
    /// No body position at all (`get`, `delete`).
    Omitted,
    /// The caller's `data` argument.
    Data,
    /// An explicit `undefined`, keeping later positions stable.
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallShape {
    pub body: BodySlot,
    pub path_params: bool,
}

impl CallShape {
    pub fn for_operation(op: &OperationDescriptor) -> Self {
        Self::lookup(op.method, op.has_request_body, op.has_path_params())
    }

    /// The call-shape table keyed by `(method, has_request_body, has_path_params)`.
    pub fn lookup(method: HttpMethod, has_request_body: bool, has_path_params: bool) -> Self {
        let body = match (method, has_request_body) {
            (HttpMethod::Get | HttpMethod::Delete, _) => BodySlot::Omitted,
            (HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch, true) => BodySlot::Data,
            // The accessor has no `data` parameter to forward.
            (HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch, false) => BodySlot::Undefined,
        };
        Self {
            body,
            path_params: has_path_params,
        }
    }

    /// Whether the accessor takes a `data` parameter.
    pub fn takes_data(&self) -> bool {
        self.body == BodySlot::Data
    }

    /// Transport call arguments for `path`, in order.
    pub fn arguments(&self, path: &str) -> Vec<TsExpr> {
        let mut args = vec![TsExpr::Str(path.to_string())];
        match self.body {
            BodySlot::Omitted => {}
            BodySlot::Data => args.push(TsExpr::ident(DATA_ARG)),
            BodySlot::Undefined => args.push(TsExpr::Undefined),
        }
        if self.path_params {
            args.push(TsExpr::ident(PATH_PARAMS_ARG));
        }
        args.push(TsExpr::ident(CONFIG_ARG));
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Emit;

    fn rendered(method: HttpMethod, body: bool, params: bool) -> String {
        CallShape::lookup(method, body, params)
            .arguments("/p")
            .iter()
            .map(Emit::emit)
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[test]
    fn test_call_shape_table() {
        let cases = [
            (HttpMethod::Get, false, true, r#""/p", pathParams, config"#),
            (HttpMethod::Get, false, false, r#""/p", config"#),
            (HttpMethod::Delete, true, true, r#""/p", pathParams, config"#),
            (HttpMethod::Delete, false, false, r#""/p", config"#),
            (HttpMethod::Post, true, true, r#""/p", data, pathParams, config"#),
            (HttpMethod::Post, false, false, r#""/p", undefined, config"#),
            (HttpMethod::Put, true, false, r#""/p", data, config"#),
            (HttpMethod::Put, false, true, r#""/p", undefined, pathParams, config"#),
            (HttpMethod::Patch, false, true, r#""/p", undefined, pathParams, config"#),
            (HttpMethod::Patch, false, false, r#""/p", undefined, config"#),
            (HttpMethod::Patch, true, true, r#""/p", data, pathParams, config"#),
            (HttpMethod::Patch, true, false, r#""/p", data, config"#),
        ];
        for (method, body, params, expected) in cases {
            assert_eq!(rendered(method, body, params), expected, "{method} body={body} params={params}");
        }
    }

    #[test]
    fn test_patch_without_body_reserves_slot() {
        let shape = CallShape::lookup(HttpMethod::Patch, false, true);
        assert_eq!(shape.body, BodySlot::Undefined);
        assert!(!shape.takes_data());
    }
}
