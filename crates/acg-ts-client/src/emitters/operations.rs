use std::collections::HashSet;

use acg_core::OperationDescriptor;
use acg_core::ir::FieldKind;
use acg_core::transform::files::FILE_FIELD_HINTS;
use acg_core::transform::index_by_operation_id;
use acg_core::transform::naming::{path_params_type, property_key, type_name};
use minijinja::context;

use crate::ast::{Emit, TsExpr, TsParam, TsProp, TsType};
use crate::call_shape::{CONFIG_ARG, CallShape, DATA_ARG, PATH_PARAMS_ARG};

use super::{jsdoc, render};

/// Emit `operations.ts`: the conditional request/response types, one set of
/// aliases per operation, and the `createOperations` factory.
///
/// Operations sharing an `operationId` collapse to one accessor: the later
/// one wins, keeping the position of the first.
pub fn emit_operations(
    operations: &[OperationDescriptor],
    generated_at: &str,
    types_import: &str,
) -> Result<String, minijinja::Error> {
    let by_id = index_by_operation_id(operations);
    let mut stems = StemAllocator::default();

    let ops: Vec<minijinja::Value> = by_id
        .values()
        .map(|op| operation_ctx(op, &stems.allocate(&op.operation_id)))
        .collect();
    let multipart: Vec<minijinja::Value> = by_id.values().filter_map(multipart_ctx).collect();

    render(
        "operations.ts.j2",
        context! {
            generated_at => generated_at,
            types_import => types_import,
            file_hints => file_hint_union(),
            operations => ops,
            multipart => multipart,
        },
    )
}

/// `"image" | "file" | ...`, rendered from the same list the extractor
/// classifies with.
fn file_hint_union() -> String {
    TsType::Union(
        FILE_FIELD_HINTS
            .iter()
            .map(|hint| TsType::Literal(hint.to_string()))
            .collect(),
    )
    .emit()
}

/// Type names `operations.ts.j2` declares or imports at module scope.
const RESERVED_TYPE_NAMES: [&str; 19] = [
    "paths",
    "ApiResult",
    "Transport",
    "TransportConfig",
    "Method",
    "Op",
    "FileHint",
    "IsFileKey",
    "RemapFiles",
    "BodyContent",
    "PreferredBody",
    "RequestBody",
    "JsonContent",
    "Responses",
    "ResponseData",
    "QueryParams",
    "RequestConfig",
    "OperationIndex",
    "Operations",
];

/// Suffixes appended to a stem to name one operation's aliases.
const ALIAS_SUFFIXES: [&str; 4] = ["Response", "PathParams", "Body", "Query"];

/// Hands out distinct PascalCase type-name stems. A stem is taken only if
/// every alias it could produce is still free.
struct StemAllocator {
    used: HashSet<String>,
}

impl Default for StemAllocator {
    fn default() -> Self {
        Self {
            used: RESERVED_TYPE_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl StemAllocator {
    fn allocate(&mut self, operation_id: &str) -> String {
        let base = type_name(operation_id);
        let mut stem = base.clone();
        let mut n = 2;
        while !self.is_free(&stem) {
            stem = format!("{base}{n}");
            n += 1;
        }
        self.used.insert(stem.clone());
        self.used
            .extend(ALIAS_SUFFIXES.iter().map(|suffix| format!("{stem}{suffix}")));
        stem
    }

    fn is_free(&self, stem: &str) -> bool {
        !self.used.contains(stem)
            && ALIAS_SUFFIXES
                .iter()
                .all(|suffix| !self.used.contains(&format!("{stem}{suffix}")))
    }
}

fn operation_ctx(op: &OperationDescriptor, stem: &str) -> minijinja::Value {
    let shape = CallShape::for_operation(op);
    let keyed = |name: &str| {
        TsType::generic(
            name,
            vec![
                TsType::Literal(op.path.clone()),
                TsType::Literal(op.method.as_str().to_string()),
            ],
        )
    };

    let response = format!("{stem}Response");
    let mut aliases = vec![alias(&response, keyed("ResponseData"))];
    let mut params = Vec::new();

    if let Some(record) = path_params_type(&op.path_params) {
        let name = format!("{stem}PathParams");
        let fields = record
            .fields
            .into_iter()
            .map(|field| TsProp {
                name: field,
                optional: false,
                ty: TsType::string_or_number(),
            })
            .collect();
        aliases.push(alias(&name, TsType::Object(fields)));
        params.push(TsParam::required(PATH_PARAMS_ARG, TsType::named(name)));
    }

    if op.has_request_body {
        let name = format!("{stem}Body");
        aliases.push(alias(&name, keyed("RequestBody")));
        if shape.takes_data() {
            params.push(TsParam::required(DATA_ARG, TsType::named(name)));
        }
    }

    let config = if op.has_query_params {
        let name = format!("{stem}Query");
        aliases.push(alias(&name, keyed("QueryParams")));
        TsType::generic("RequestConfig", vec![TsType::named(name)])
    } else {
        TsType::named("RequestConfig")
    };
    params.push(TsParam::optional(CONFIG_ARG, config));

    let call = TsExpr::Call {
        callee: Box::new(TsExpr::member(TsExpr::ident("client"), op.method.as_str())),
        type_args: vec![TsType::named(&response)],
        args: shape.arguments(&op.path),
    };
    let accessor = TsExpr::Arrow {
        params,
        ret: Some(TsType::generic(
            "Promise",
            vec![TsType::generic("ApiResult", vec![TsType::named(&response)])],
        )),
        body: Box::new(call),
    };

    context! {
        key => property_key(&op.operation_id),
        doc => jsdoc(&op.summary, &op.description, "    "),
        aliases => aliases,
        accessor => accessor.emit(),
        path => TsType::Literal(op.path.clone()).emit(),
        method => op.method.as_str(),
    }
}

fn alias(name: &str, ty: TsType) -> minijinja::Value {
    context! {
        name => name,
        ty => ty.emit(),
    }
}

fn multipart_ctx(op: &OperationDescriptor) -> Option<minijinja::Value> {
    if op.file_fields.is_empty() {
        return None;
    }
    let fields: Vec<String> = op
        .file_fields
        .iter()
        .filter_map(|field| {
            let kind = match field.kind {
                FieldKind::File => "file",
                FieldKind::FileArray => "files",
                FieldKind::Plain => return None,
            };
            Some(format!("{}: \"{kind}\"", property_key(&field.name)))
        })
        .collect();
    Some(context! {
        key => TsType::Literal(format!("{} {}", op.method, op.path)).emit(),
        fields => fields.join(", "),
    })
}
