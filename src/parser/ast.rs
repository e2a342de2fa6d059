//! Abstract Syntax Tree types for scene scripts

use crate::scene::{ShapeKind, TransformKind};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Element name (alphanumeric + underscore, starts with letter/_)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Root AST node - a complete script
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Explicit `document W H { … }` header, if present
    pub header: Option<DocumentHeader>,
    pub statements: Vec<Spanned<Statement>>,
}

/// Size given in the `document` header
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentHeader {
    pub width: Spanned<f64>,
    pub height: Spanned<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Shape(ShapeDecl),
    Container(ContainerDecl),
}

/// What a shape statement creates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKeyword {
    Primitive(ShapeKind),
    LabeledCircle,
    RotatedText,
    Repeat,
}

impl ShapeKeyword {
    pub fn keyword(self) -> &'static str {
        match self {
            ShapeKeyword::Primitive(kind) => kind.keyword(),
            ShapeKeyword::LabeledCircle => "labeled_circle",
            ShapeKeyword::RotatedText => "rotated_text",
            ShapeKeyword::Repeat => "repeat",
        }
    }
}

/// `keyword name? arg* [modifiers]? transform*`
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDecl {
    pub keyword: Spanned<ShapeKeyword>,
    pub name: Option<Spanned<Identifier>>,
    pub args: Vec<Spanned<Arg>>,
    pub modifiers: Vec<Spanned<Modifier>>,
    pub transforms: Vec<Spanned<TransformCall>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContainerKind {
    Group,
    /// Hyperlink with its target
    Link(String),
    Defs,
}

/// `group|link "href"|defs name? [modifiers]? transform* { statement* }`
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerDecl {
    pub kind: Spanned<ContainerKind>,
    pub name: Option<Spanned<Identifier>>,
    pub modifiers: Vec<Spanned<Modifier>>,
    pub transforms: Vec<Spanned<TransformCall>>,
    pub children: Vec<Spanned<Statement>>,
}

/// Positional shape argument
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Number(f64),
    Text(String),
    Point(PointExpr),
}

/// `term (+|- term)*`
#[derive(Debug, Clone, PartialEq)]
pub struct PointExpr {
    pub first: Spanned<PointTerm>,
    pub rest: Vec<(PointOp, Spanned<PointTerm>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointTerm {
    /// `(x, y)`
    Literal { x: f64, y: f64 },
    /// `element.anchor`
    Anchor {
        element: Identifier,
        anchor: Identifier,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOp {
    Add,
    Subtract,
}

/// `[key: value]` entry
#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub key: Spanned<String>,
    pub value: Spanned<ModifierValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModifierValue {
    Number(f64),
    String(String),
    /// Hex color like #ff0000 or #f00
    Color(String),
    /// Bare word like `black` or `none`
    Keyword(String),
}

impl ModifierValue {
    /// The value as it is written into the attribute
    pub fn to_attribute_value(&self) -> String {
        match self {
            ModifierValue::Number(n) => n.to_string(),
            ModifierValue::String(s) | ModifierValue::Color(s) | ModifierValue::Keyword(s) => {
                s.clone()
            }
        }
    }
}

/// `translate(…)`, `rotate(…)`, …
#[derive(Debug, Clone, PartialEq)]
pub struct TransformCall {
    pub kind: TransformKind,
    pub args: Vec<Spanned<TransformArg>>,
}

/// A transform argument; points expand to two numbers
#[derive(Debug, Clone, PartialEq)]
pub enum TransformArg {
    Number(f64),
    Point(PointExpr),
}
