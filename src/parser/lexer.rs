//! Lexer for scene scripts using logos

use logos::Logos;

use super::ast::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Container keywords
    #[token("document")]
    Document,
    #[token("group")]
    Group,
    #[token("link")]
    Link,
    #[token("defs")]
    Defs,

    // Shape keywords
    #[token("rect")]
    Rect,
    #[token("circle")]
    Circle,
    #[token("ellipse")]
    Ellipse,
    #[token("line")]
    Line,
    #[token("arrow")]
    Arrow,
    #[token("polyline")]
    Polyline,
    #[token("polygon")]
    Polygon,
    #[token("path")]
    Path,
    #[token("text")]
    Text,
    #[token("image")]
    Image,
    #[token("use")]
    Use,
    #[token("star")]
    Star,
    #[token("regular_polygon")]
    RegularPolygon,
    #[token("balloon")]
    Balloon,
    #[token("bezier")]
    Bezier,
    #[token("bent_line")]
    BentLine,
    #[token("grid")]
    Grid,

    // Composite keywords
    #[token("labeled_circle")]
    LabeledCircle,
    #[token("rotated_text")]
    RotatedText,
    #[token("repeat")]
    Repeat,

    // Transform functions
    #[token("translate")]
    Translate,
    #[token("scale")]
    Scale,
    #[token("rotate")]
    Rotate,
    #[token("skew_x")]
    #[token("skewX")]
    SkewX,
    #[token("skew_y")]
    #[token("skewY")]
    SkewY,
    #[token("matrix")]
    Matrix,

    // Point operators, `-` also negates numbers and joins hyphenated keys
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,

    // Delimiters
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,

    /// `name.anchor`, an attachment point of a named element
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*\.[a-zA-Z_][a-zA-Z0-9_]*", |lex| {
        lex.slice()
            .split_once('.')
            .map(|(element, anchor)| (element.to_string(), anchor.to_string()))
    })]
    PointRef((String, String)),

    // Literals - identifiers must come after keywords
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    String(String),

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r"#[0-9a-fA-F]{3,6}", |lex| lex.slice().to_string())]
    HexColor(String),

    // Comments (skip)
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/", logos::skip)]
    BlockComment,
}

impl Token {
    /// Source text of a reserved keyword, `None` for other tokens
    pub fn keyword(&self) -> Option<&'static str> {
        let keyword = match self {
            Token::Document => "document",
            Token::Group => "group",
            Token::Link => "link",
            Token::Defs => "defs",
            Token::Rect => "rect",
            Token::Circle => "circle",
            Token::Ellipse => "ellipse",
            Token::Line => "line",
            Token::Arrow => "arrow",
            Token::Polyline => "polyline",
            Token::Polygon => "polygon",
            Token::Path => "path",
            Token::Text => "text",
            Token::Image => "image",
            Token::Use => "use",
            Token::Star => "star",
            Token::RegularPolygon => "regular_polygon",
            Token::Balloon => "balloon",
            Token::Bezier => "bezier",
            Token::BentLine => "bent_line",
            Token::Grid => "grid",
            Token::LabeledCircle => "labeled_circle",
            Token::RotatedText => "rotated_text",
            Token::Repeat => "repeat",
            Token::Translate => "translate",
            Token::Scale => "scale",
            Token::Rotate => "rotate",
            Token::SkewX => "skew_x",
            Token::SkewY => "skew_y",
            Token::Matrix => "matrix",
            _ => return None,
        };
        Some(keyword)
    }
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| match tok {
            Ok(t) => Some((t, span)),
            Err(()) => {
                log::debug!("skipping unrecognized input at {:?}", span);
                None
            }
        })
}

/// Spans of input that match no token
pub fn unrecognized(input: &str) -> Vec<Span> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.is_err().then_some(span))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_shape_keywords() {
        assert_eq!(
            tokens("rect circle regular_polygon bent_line text"),
            vec![
                Token::Rect,
                Token::Circle,
                Token::RegularPolygon,
                Token::BentLine,
                Token::Text
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(
            tokens("text_anchor rects"),
            vec![
                Token::Ident("text_anchor".to_string()),
                Token::Ident("rects".to_string())
            ]
        );
    }

    #[test]
    fn test_transform_keywords() {
        assert_eq!(
            tokens("translate scale rotate skew_x skewY matrix"),
            vec![
                Token::Translate,
                Token::Scale,
                Token::Rotate,
                Token::SkewX,
                Token::SkewY,
                Token::Matrix
            ]
        );
    }

    #[test]
    fn test_point_reference() {
        assert_eq!(
            tokens("box.br - (2, 0)"),
            vec![
                Token::PointRef(("box".to_string(), "br".to_string())),
                Token::Minus,
                Token::ParenOpen,
                Token::Number(2.0),
                Token::Comma,
                Token::Number(0.0),
                Token::ParenClose
            ]
        );
    }

    #[test]
    fn test_identifiers_and_strings() {
        assert_eq!(
            tokens(r#"box "https://example.org""#),
            vec![
                Token::Ident("box".to_string()),
                Token::String("https://example.org".to_string())
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(tokens("rect // comment\ncircle"), vec![Token::Rect, Token::Circle]);
        assert_eq!(
            tokens("rect /* block comment */ circle"),
            vec![Token::Rect, Token::Circle]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("42 3.14 -10"),
            vec![
                Token::Number(42.0),
                Token::Number(3.14),
                Token::Minus,
                Token::Number(10.0)
            ]
        );
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(
            tokens("#fff #ff0000"),
            vec![
                Token::HexColor("#fff".to_string()),
                Token::HexColor("#ff0000".to_string())
            ]
        );
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            tokens("{ } [ ] ( ) , : +"),
            vec![
                Token::BraceOpen,
                Token::BraceClose,
                Token::BracketOpen,
                Token::BracketClose,
                Token::ParenOpen,
                Token::ParenClose,
                Token::Comma,
                Token::Colon,
                Token::Plus
            ]
        );
    }

    #[test]
    fn test_unrecognized_spans() {
        assert_eq!(unrecognized("rect (0, 0) 1 1 @ 2 $"), vec![16..17, 20..21]);
        assert!(unrecognized("rect (0, 0) 1 1 // @ in a comment").is_empty());
    }

    #[test]
    fn test_spans() {
        let spans: Vec<Span> = lex("rect box").map(|(_, s)| s).collect();
        assert_eq!(spans, vec![0..4, 5..8]);
    }
}
