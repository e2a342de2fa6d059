//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::scene::{ShapeKind, TransformKind};

/// Parse a scene script into an AST
pub fn parse(input: &str) -> Result<Document, Vec<crate::ParseError>> {
    let unrecognized = crate::parser::lexer::unrecognized(input);
    if !unrecognized.is_empty() {
        return Err(unrecognized
            .into_iter()
            .map(|span| crate::ParseError::Syntax {
                message: format!("Unrecognized input '{}'", input.get(span.clone()).unwrap_or_default()),
                span,
                expected: Vec::new(),
            })
            .collect());
    }

    let len = input.len();

    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Split (Token, SimpleSpan) pairs into the token and span parts chumsky expects
    let token_stream = Stream::from_iter(token_iter).map((len..len).into(), |(t, s): (_, _)| (t, s));

    document_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn document_parser<'a, I>() -> impl Parser<'a, I, Document, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let identifier = select! {
        Token::Ident(s) => Identifier::new(s),
    }
    .map_with(|id, e| Spanned::new(id, span_range(&e.span())));

    let string_literal = select! {
        Token::String(s) => s,
    };

    let number = select! {
        Token::Number(n) => n,
    };

    // Negative numbers are a Minus token followed by a Number
    let signed_number = just(Token::Minus)
        .or_not()
        .then(number.clone())
        .map(|(neg, n)| if neg.is_some() { -n } else { n });

    // Points: `(x, y)` and `name.anchor`, combined with + and -
    let point_literal = signed_number
        .clone()
        .then_ignore(just(Token::Comma))
        .then(signed_number.clone())
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
        .map(|(x, y)| PointTerm::Literal { x, y });

    let anchor_ref = select! {
        Token::PointRef((element, anchor)) => PointTerm::Anchor {
            element: Identifier::new(element),
            anchor: Identifier::new(anchor),
        },
    };

    let point_term = choice((point_literal, anchor_ref))
        .map_with(|term, e| Spanned::new(term, span_range(&e.span())));

    let point_op = choice((
        just(Token::Plus).to(PointOp::Add),
        just(Token::Minus).to(PointOp::Subtract),
    ));

    // A failed `op term` pair backtracks, so `(0, 0) -5` reads as a point
    // followed by a negative number
    let point_expr = point_term
        .clone()
        .then(point_op.then(point_term).repeated().collect::<Vec<_>>())
        .map(|(first, rest)| PointExpr { first, rest });

    let arg = choice((
        point_expr.clone().map(Arg::Point),
        signed_number.clone().map(Arg::Number),
        string_literal.clone().map(Arg::Text),
    ))
    .map_with(|a, e| Spanned::new(a, span_range(&e.span())));

    // Modifier keys may be written with hyphens: stroke-width, clip-path
    let key_part = select! {
        Token::Ident(s) => s,
        Token::Path => "path".to_string(),
        Token::Text => "text".to_string(),
    };
    let modifier_key = key_part
        .clone()
        .then(
            just(Token::Minus)
                .ignore_then(key_part)
                .repeated()
                .collect::<Vec<_>>(),
        )
        .map_with(|(first, rest), e| {
            let key = std::iter::once(first).chain(rest).collect::<Vec<_>>().join("-");
            Spanned::new(key, span_range(&e.span()))
        });

    let modifier_value = choice((
        select! { Token::HexColor(c) => ModifierValue::Color(c) },
        string_literal.clone().map(ModifierValue::String),
        signed_number.clone().map(ModifierValue::Number),
        select! { Token::Ident(s) => ModifierValue::Keyword(s) },
    ))
    .map_with(|v, e| Spanned::new(v, span_range(&e.span())));

    let modifier = modifier_key
        .then_ignore(just(Token::Colon))
        .then(modifier_value)
        .map_with(|(key, value), e| Spanned::new(Modifier { key, value }, span_range(&e.span())));

    let modifier_block = modifier
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::BracketOpen), just(Token::BracketClose));

    // Transform calls
    let transform_kind = select! {
        Token::Translate => TransformKind::Translate,
        Token::Scale => TransformKind::Scale,
        Token::Rotate => TransformKind::Rotate,
        Token::SkewX => TransformKind::SkewX,
        Token::SkewY => TransformKind::SkewY,
        Token::Matrix => TransformKind::Matrix,
    };

    let transform_arg = choice((
        point_expr.map(TransformArg::Point),
        signed_number.map(TransformArg::Number),
    ))
    .map_with(|a, e| Spanned::new(a, span_range(&e.span())));

    let transform_call = transform_kind
        .then(
            transform_arg
                .separated_by(just(Token::Comma))
                .allow_trailing()
                .collect::<Vec<_>>()
                .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
        )
        .map_with(|(kind, args), e| Spanned::new(TransformCall { kind, args }, span_range(&e.span())));

    let transforms = transform_call.repeated().collect::<Vec<_>>();

    // Shape statements
    let shape_keyword = select! {
        Token::Rect => ShapeKeyword::Primitive(ShapeKind::Rect),
        Token::Circle => ShapeKeyword::Primitive(ShapeKind::Circle),
        Token::Ellipse => ShapeKeyword::Primitive(ShapeKind::Ellipse),
        Token::Line => ShapeKeyword::Primitive(ShapeKind::Line),
        Token::Arrow => ShapeKeyword::Primitive(ShapeKind::Arrow),
        Token::Polyline => ShapeKeyword::Primitive(ShapeKind::Polyline),
        Token::Polygon => ShapeKeyword::Primitive(ShapeKind::Polygon),
        Token::Path => ShapeKeyword::Primitive(ShapeKind::Path),
        Token::Text => ShapeKeyword::Primitive(ShapeKind::Text),
        Token::Image => ShapeKeyword::Primitive(ShapeKind::Image),
        Token::Use => ShapeKeyword::Primitive(ShapeKind::Use),
        Token::Star => ShapeKeyword::Primitive(ShapeKind::Star),
        Token::RegularPolygon => ShapeKeyword::Primitive(ShapeKind::RegularPolygon),
        Token::Balloon => ShapeKeyword::Primitive(ShapeKind::Balloon),
        Token::Bezier => ShapeKeyword::Primitive(ShapeKind::Bezier),
        Token::BentLine => ShapeKeyword::Primitive(ShapeKind::BentLine),
        Token::Grid => ShapeKeyword::Primitive(ShapeKind::Grid),
        Token::LabeledCircle => ShapeKeyword::LabeledCircle,
        Token::RotatedText => ShapeKeyword::RotatedText,
        Token::Repeat => ShapeKeyword::Repeat,
    }
    .map_with(|k, e| Spanned::new(k, span_range(&e.span())));

    let shape_decl = shape_keyword
        .then(identifier.clone().or_not())
        .then(arg.repeated().collect::<Vec<_>>())
        .then(modifier_block.clone().or_not())
        .then(transforms.clone())
        .map(|((((keyword, name), args), modifiers), transforms)| ShapeDecl {
            keyword,
            name,
            args,
            modifiers: modifiers.unwrap_or_default(),
            transforms,
        });

    // Recursive statement parser
    let statement = recursive(|stmt| {
        let container_kind = choice((
            just(Token::Group).to(ContainerKind::Group),
            just(Token::Link)
                .ignore_then(string_literal.clone())
                .map(ContainerKind::Link),
            just(Token::Defs).to(ContainerKind::Defs),
        ))
        .map_with(|k, e| Spanned::new(k, span_range(&e.span())));

        let container_decl = container_kind
            .then(identifier.clone().or_not())
            .then(modifier_block.clone().or_not())
            .then(transforms.clone())
            .then(
                stmt.clone()
                    .repeated()
                    .collect::<Vec<_>>()
                    .delimited_by(just(Token::BraceOpen), just(Token::BraceClose)),
            )
            .map(|((((kind, name), modifiers), transforms), children)| ContainerDecl {
                kind,
                name,
                modifiers: modifiers.unwrap_or_default(),
                transforms,
                children,
            });

        choice((
            container_decl.map(Statement::Container),
            shape_decl.clone().map(Statement::Shape),
        ))
        .map_with(|s, e| Spanned::new(s, span_range(&e.span())))
        .boxed()
    });

    let header = just(Token::Document)
        .ignore_then(number.clone().map_with(|n, e| Spanned::new(n, span_range(&e.span()))))
        .then(number.map_with(|n, e| Spanned::new(n, span_range(&e.span()))))
        .map(|(width, height)| DocumentHeader { width, height });

    let with_header = header
        .then(
            statement
                .clone()
                .repeated()
                .collect::<Vec<_>>()
                .delimited_by(just(Token::BraceOpen), just(Token::BraceClose)),
        )
        .map(|(header, statements)| Document {
            header: Some(header),
            statements,
        });

    let bare = statement
        .repeated()
        .collect::<Vec<_>>()
        .map(|statements| Document {
            header: None,
            statements,
        });

    choice((with_header, bare)).then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_shape(source: &str) -> ShapeDecl {
        let doc = parse(source).expect("Should parse");
        assert_eq!(doc.statements.len(), 1);
        match doc.statements.into_iter().next().map(|s| s.node) {
            Some(Statement::Shape(s)) => s,
            other => panic!("Expected shape, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_shape() {
        let s = single_shape("rect box (10, 10) 80 40");
        assert_eq!(s.keyword.node, ShapeKeyword::Primitive(ShapeKind::Rect));
        assert_eq!(s.name.as_ref().unwrap().node.as_str(), "box");
        assert_eq!(s.args.len(), 3);
        assert!(matches!(
            &s.args[0].node,
            Arg::Point(PointExpr { first, rest }) if rest.is_empty()
                && first.node == PointTerm::Literal { x: 10.0, y: 10.0 }
        ));
        assert_eq!(s.args[1].node, Arg::Number(80.0));
    }

    #[test]
    fn test_parse_negative_numbers() {
        let s = single_shape("rect (-5, 0) -4 2");
        assert!(matches!(
            &s.args[0].node,
            Arg::Point(p) if p.first.node == PointTerm::Literal { x: -5.0, y: 0.0 }
        ));
        assert_eq!(s.args[1].node, Arg::Number(-4.0));
    }

    #[test]
    fn test_parse_point_arithmetic() {
        let s = single_shape("line box.br c.mc - (2, 0)");
        assert_eq!(s.args.len(), 2);
        match &s.args[1].node {
            Arg::Point(p) => {
                assert_eq!(
                    p.first.node,
                    PointTerm::Anchor {
                        element: Identifier::new("c"),
                        anchor: Identifier::new("mc"),
                    }
                );
                assert_eq!(p.rest.len(), 1);
                assert_eq!(p.rest[0].0, PointOp::Subtract);
            }
            other => panic!("Expected point, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_point_followed_by_negative_number() {
        let s = single_shape("circle (0, 0) -5");
        assert_eq!(s.args.len(), 2);
        assert_eq!(s.args[1].node, Arg::Number(-5.0));
    }

    #[test]
    fn test_parse_modifiers() {
        let s = single_shape(r##"circle c 5 [fill: "#eee", stroke: #ff0000, stroke-width: 2, onclick: "go()"]"##);
        assert_eq!(s.modifiers.len(), 4);
        assert_eq!(s.modifiers[0].node.key.node, "fill");
        assert_eq!(
            s.modifiers[1].node.value.node,
            ModifierValue::Color("#ff0000".to_string())
        );
        assert_eq!(s.modifiers[2].node.key.node, "stroke-width");
        assert_eq!(s.modifiers[2].node.value.node, ModifierValue::Number(2.0));
    }

    #[test]
    fn test_parse_modifier_key_with_keyword_part() {
        let s = single_shape(r#"text "a" (0, 0) [text-anchor: middle, clip-path: "url(#c)"]"#);
        assert_eq!(s.modifiers[0].node.key.node, "text-anchor");
        assert_eq!(s.modifiers[1].node.key.node, "clip-path");
    }

    #[test]
    fn test_parse_transforms() {
        let s = single_shape("text \"hi\" (0, 0) translate(5, 5) rotate(30, (50, 50))");
        assert_eq!(s.transforms.len(), 2);
        assert_eq!(s.transforms[0].node.kind, TransformKind::Translate);
        assert_eq!(s.transforms[1].node.kind, TransformKind::Rotate);
        assert!(matches!(s.transforms[1].node.args[1].node, TransformArg::Point(_)));
    }

    #[test]
    fn test_parse_group() {
        let doc = parse("group g rotate(30) { circle c (0, 0) 10 rect (1, 1) 2 2 }").expect("Should parse");
        assert_eq!(doc.statements.len(), 1);
        match &doc.statements[0].node {
            Statement::Container(c) => {
                assert_eq!(c.kind.node, ContainerKind::Group);
                assert_eq!(c.name.as_ref().unwrap().node.as_str(), "g");
                assert_eq!(c.transforms.len(), 1);
                assert_eq!(c.children.len(), 2);
            }
            _ => panic!("Expected container"),
        }
    }

    #[test]
    fn test_parse_link_and_defs() {
        let doc = parse(r#"link "https://example.org" { text "home" (5, 290) } defs { star s 5 (0, 0) 10 }"#)
            .expect("Should parse");
        assert_eq!(doc.statements.len(), 2);
        match &doc.statements[0].node {
            Statement::Container(c) => {
                assert_eq!(c.kind.node, ContainerKind::Link("https://example.org".to_string()))
            }
            _ => panic!("Expected link"),
        }
        match &doc.statements[1].node {
            Statement::Container(c) => assert_eq!(c.kind.node, ContainerKind::Defs),
            _ => panic!("Expected defs"),
        }
    }

    #[test]
    fn test_parse_document_header() {
        let doc = parse("document 400 300 { rect (0, 0) 1 1 }").expect("Should parse");
        let header = doc.header.expect("header");
        assert_eq!(header.width.node, 400.0);
        assert_eq!(header.height.node, 300.0);
        assert_eq!(doc.statements.len(), 1);
    }

    #[test]
    fn test_parse_without_header() {
        let doc = parse("circle 5 circle 6").expect("Should parse");
        assert!(doc.header.is_none());
        assert_eq!(doc.statements.len(), 2);
    }

    #[test]
    fn test_parse_composites() {
        let doc = parse(r#"labeled_circle a (10, 10) 5 "A" rotated_text "t" (0, 0) 45 repeat "s" 3 (10, 0)"#)
            .expect("Should parse");
        let keywords: Vec<_> = doc
            .statements
            .iter()
            .map(|s| match &s.node {
                Statement::Shape(s) => s.keyword.node,
                _ => panic!("Expected shape"),
            })
            .collect();
        assert_eq!(
            keywords,
            vec![
                ShapeKeyword::LabeledCircle,
                ShapeKeyword::RotatedText,
                ShapeKeyword::Repeat
            ]
        );
    }

    #[test]
    fn test_parse_empty() {
        let doc = parse("// nothing here").expect("Should parse");
        assert!(doc.statements.is_empty());
    }

    #[test]
    fn test_parse_error_unclosed_group() {
        let errors = parse("group { rect (0, 0) 1 1").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_parse_error_unrecognized_input() {
        let errors = parse("rect (0, 0) 1 1 @\ncircle (5, 5) 2").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), &(16..17));
        assert!(errors[0].to_string().contains("Unrecognized input '@'"));
    }

    #[test]
    fn test_parse_error_modifier_without_colon() {
        let errors = parse("rect box (0, 0) 1 1 [fill red]").unwrap_err();
        assert!(!errors.is_empty());
    }
}
