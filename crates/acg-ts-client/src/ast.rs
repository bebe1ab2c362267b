//! A small TypeScript AST covering what the emitted modules need: type
//! references, object types, arrow functions and calls.
//!
//! Every signature and call in `operations.ts` is built from these nodes and
//! serialized through [`Emit`].

use acg_core::transform::naming::property_key;

/// Serialize an AST node to TypeScript source.
pub trait Emit {
    fn emit(&self) -> String;
}

/// A type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// A named type, e.g. `RequestConfig`.
    Ref(String),
    /// A generic instantiation, e.g. `ApiResult<ListPetsResponse>`.
    Generic { name: String, args: Vec<TsType> },
    /// A string literal type, e.g. `"/pets"`.
    Literal(String),
    Union(Vec<TsType>),
    Object(Vec<TsProp>),
}

impl TsType {
    pub fn named(name: impl Into<String>) -> Self {
        TsType::Ref(name.into())
    }

    pub fn generic(name: impl Into<String>, args: Vec<TsType>) -> Self {
        TsType::Generic {
            name: name.into(),
            args,
        }
    }

    /// `string | number`, the value type of a path-parameter record field.
    pub fn string_or_number() -> Self {
        TsType::Union(vec![TsType::named("string"), TsType::named("number")])
    }
}

/// A property of an object type.
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    pub name: String,
    pub optional: bool,
    pub ty: TsType,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct TsParam {
    pub name: String,
    pub optional: bool,
    pub ty: TsType,
}

impl TsParam {
    pub fn required(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            optional: false,
            ty,
        }
    }

    pub fn optional(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            optional: true,
            ty,
        }
    }
}

/// A value expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TsExpr {
    Ident(String),
    Str(String),
    Undefined,
    Member {
        object: Box<TsExpr>,
        property: String,
    },
    Call {
        callee: Box<TsExpr>,
        type_args: Vec<TsType>,
        args: Vec<TsExpr>,
    },
    Arrow {
        params: Vec<TsParam>,
        ret: Option<TsType>,
        body: Box<TsExpr>,
    },
}

impl TsExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        TsExpr::Ident(name.into())
    }

    pub fn member(object: TsExpr, property: impl Into<String>) -> Self {
        TsExpr::Member {
            object: Box::new(object),
            property: property.into(),
        }
    }
}

fn string_literal(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn join<T: Emit>(items: &[T], sep: &str) -> String {
    items.iter().map(Emit::emit).collect::<Vec<_>>().join(sep)
}

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Ref(name) => name.clone(),
            TsType::Generic { name, args } => format!("{name}<{}>", join(args, ", ")),
            TsType::Literal(value) => string_literal(value),
            TsType::Union(types) => join(types, " | "),
            TsType::Object(props) if props.is_empty() => "{}".to_string(),
            TsType::Object(props) => format!("{{ {} }}", join(props, "; ")),
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let opt = if self.optional { "?" } else { "" };
        format!("{}{opt}: {}", property_key(&self.name), self.ty.emit())
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        let opt = if self.optional { "?" } else { "" };
        format!("{}{opt}: {}", self.name, self.ty.emit())
    }
}

impl Emit for TsExpr {
    fn emit(&self) -> String {
        match self {
            TsExpr::Ident(name) => name.clone(),
            TsExpr::Str(value) => string_literal(value),
            TsExpr::Undefined => "undefined".to_string(),
            TsExpr::Member { object, property } => format!("{}.{property}", object.emit()),
            TsExpr::Call {
                callee,
                type_args,
                args,
            } => {
                let generics = if type_args.is_empty() {
                    String::new()
                } else {
                    format!("<{}>", join(type_args, ", "))
                };
                format!("{}{generics}({})", callee.emit(), join(args, ", "))
            }
            TsExpr::Arrow { params, ret, body } => {
                let ret = ret
                    .as_ref()
                    .map(|t| format!(": {}", t.emit()))
                    .unwrap_or_default();
                format!("({}){ret} => {}", join(params, ", "), body.emit())
            }
        }
    }
}
