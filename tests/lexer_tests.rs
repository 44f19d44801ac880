//! Lexer tests

use eva::SyntaxError;
use eva::lexer::{TokenKind, lex};

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).unwrap().into_iter().map(|t| t.kind).collect()
}

fn texts(source: &str) -> Vec<String> {
    lex(source)
        .unwrap()
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.text)
        .collect()
}

#[test]
fn test_lex_empty() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
    assert_eq!(kinds("   \n\t"), vec![TokenKind::Eof]);
}

#[test]
fn test_lex_parens() {
    assert_eq!(
        kinds("(())"),
        vec![
            TokenKind::LParen,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_lex_numbers() {
    assert_eq!(texts("42 3.14 -7 0"), vec!["42", "3.14", "-7", "0"]);
    assert_eq!(
        kinds("42 3.14 -7"),
        vec![
            TokenKind::Number,
            TokenKind::Number,
            TokenKind::Number,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_lex_strings() {
    let tokens = lex(r#""hello" "with \"escape\"""#).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, r#""hello""#);
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!(tokens[1].text, r#""with \"escape\"""#);
}

#[test]
fn test_lex_operator_symbols() {
    assert_eq!(
        texts("+ - * / % < <= > >= = == != ++ -- += -="),
        vec![
            "+", "-", "*", "/", "%", "<", "<=", ">", ">=", "=", "==", "!=", "++", "--", "+=", "-="
        ]
    );
    assert!(
        kinds("+ <= ++ -=")
            .iter()
            .take(4)
            .all(|k| *k == TokenKind::Symbol)
    );
}

#[test]
fn test_lex_identifiers() {
    assert_eq!(
        texts("x foo_bar Point3D isUser?"),
        vec!["x", "foo_bar", "Point3D", "isUser?"]
    );
}

#[test]
fn test_lex_form() {
    assert_eq!(
        texts(r#"(var x (+ 1 "a"))"#),
        vec!["(", "var", "x", "(", "+", "1", "\"a\"", ")", ")"]
    );
}

#[test]
fn test_lex_comments() {
    let source = "; leading comment\n(+ 1 2) ; trailing\n";
    assert_eq!(texts(source), vec!["(", "+", "1", "2", ")"]);
}

#[test]
fn test_lex_spans() {
    let tokens = lex("(var x 10)").unwrap();
    assert_eq!(tokens[1].span.start, 1);
    assert_eq!(tokens[1].span.end, 4);
    assert_eq!(tokens[3].span.start, 7);
    assert_eq!(tokens[3].span.end, 9);

    let eof = tokens.last().unwrap();
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!(eof.span.start, 10);
}

#[test]
fn test_lex_unterminated_string() {
    assert!(matches!(
        lex(r#"(print "oops)"#),
        Err(SyntaxError::InvalidToken { .. })
    ));
}
