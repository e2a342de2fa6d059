//! Error types for parsing, and source-located reports

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::lexer::Token;
use crate::scene::SceneError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ParseError {
    pub fn span(&self) -> &Span {
        match self {
            ParseError::Syntax { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            ParseError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };
                let label = format!("{}{}", message, expected_str);
                write_report(source, filename, span, message, &label, None)
            }
        }
    }
}

/// Format a scene error with source context.
///
/// Errors without a span are rendered as a plain message.
pub fn format_scene_error(err: &SceneError, source: &str, filename: &str) -> String {
    let Some(span) = err.span() else {
        return format!("Error: {}\n", err);
    };
    let help = err
        .suggestions()
        .filter(|s| !s.is_empty())
        .map(|s| format!("did you mean {}?", quoted_list(s)));
    let message = err.to_string();
    write_report(source, filename, span, &message, &message, help)
}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_report(
    source: &str,
    filename: &str,
    span: &Span,
    message: &str,
    label: &str,
    help: Option<String>,
) -> String {
    let mut buf = Vec::new();
    let mut report = Report::build(ReportKind::Error, filename, span.start)
        .with_message(message)
        .with_label(
            Label::new((filename, span.clone()))
                .with_message(label)
                .with_color(Color::Red),
        );
    if let Some(help) = help {
        report = report.with_help(help);
    }
    if let Err(e) = report
        .finish()
        .write((filename, Source::from(source)), &mut buf)
    {
        log::debug!("failed to write report: {}", e);
        return format!("Error: {}\n", message);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::{RichPattern, RichReason};

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found.as_deref() {
                Some(tok) if tok.keyword().is_some() => format!(
                    "Unexpected {} - keywords cannot be used as names",
                    format_token(tok)
                ),
                Some(tok) => format!("Unexpected {}", format_token(tok)),
                None => "Unexpected end of input".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of input".to_string()),
                RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                RichPattern::Any => Some("any token".to_string()),
                RichPattern::SomethingElse => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    if let Some(keyword) = tok.keyword() {
        return format!("keyword '{}'", keyword);
    }
    match tok {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::PointRef((element, anchor)) => format!("anchor reference '{}.{}'", element, anchor),
        Token::String(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
        Token::HexColor(c) => format!("color {}", c),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::BraceOpen => "'{'".to_string(),
        Token::BraceClose => "'}'".to_string(),
        Token::BracketOpen => "'['".to_string(),
        Token::BracketClose => "']'".to_string(),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Colon => "':'".to_string(),
        _ => format!("{:?}", tok),
    }
}
