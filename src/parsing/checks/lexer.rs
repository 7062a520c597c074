use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn simple_variable_declaration() {
    let tokens = tokenize("var x: integer;").unwrap();

    assert_eq!(
        tokens,
        vec![
            Token {
                kind: TokenKind::Keyword(Keyword::Var),
                text: "var",
                line: 1,
                column: 1,
                offset: 0
            },
            Token {
                kind: TokenKind::Identifier,
                text: "x",
                line: 1,
                column: 5,
                offset: 4
            },
            Token {
                kind: TokenKind::Punctuation(Punctuation::Colon),
                text: ":",
                line: 1,
                column: 6,
                offset: 5
            },
            Token {
                kind: TokenKind::Keyword(Keyword::Integer),
                text: "integer",
                line: 1,
                column: 8,
                offset: 7
            },
            Token {
                kind: TokenKind::Punctuation(Punctuation::Semicolon),
                text: ";",
                line: 1,
                column: 15,
                offset: 14
            },
            Token {
                kind: TokenKind::EndOfInput,
                text: "",
                line: 1,
                column: 16,
                offset: 15
            },
        ]
    );
}

#[test]
fn keywords_are_case_insensitive() {
    assert_eq!(
        kinds("PROCEDURE Begin eNd"),
        vec![
            TokenKind::Keyword(Keyword::Procedure),
            TokenKind::Keyword(Keyword::Begin),
            TokenKind::Keyword(Keyword::End),
            TokenKind::EndOfInput
        ]
    );

    // but identifiers keep their spelling
    let tokens = tokenize("MyProc").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].text, "MyProc");
}

#[test]
fn range_dots_before_punctuation() {
    assert_eq!(
        kinds("array[1..10]"),
        vec![
            TokenKind::Keyword(Keyword::Array),
            TokenKind::Punctuation(Punctuation::OpenBracket),
            TokenKind::Number,
            TokenKind::Range,
            TokenKind::Number,
            TokenKind::Punctuation(Punctuation::CloseBracket),
            TokenKind::EndOfInput
        ]
    );
}

#[test]
fn maximal_runs() {
    let tokens = tokenize("x_1y 0042").unwrap();
    assert_eq!(tokens[0].text, "x_1y");
    assert_eq!(tokens[1].text, "0042");
    assert_eq!(tokens[1].kind, TokenKind::Number);

    // a digit run ends at the first letter
    let tokens = tokenize("12ab").unwrap();
    assert_eq!(tokens[0].text, "12");
    assert_eq!(tokens[1].text, "ab");
}

#[test]
fn positions_across_lines() {
    let source = "procedure P;\n  begin\n\tend;";
    let tokens = tokenize(source).unwrap();

    let begin = tokens[3];
    assert_eq!(begin.text, "begin");
    assert_eq!((begin.line, begin.column, begin.offset), (2, 3, 15));

    let end = tokens[4];
    assert_eq!(end.text, "end");
    assert_eq!((end.line, end.column), (3, 2));

    let last = tokens
        .last()
        .unwrap();
    assert_eq!(last.kind, TokenKind::EndOfInput);
    assert_eq!((last.line, last.column), (3, 6));
}

#[test]
fn offsets_strictly_increase() {
    let tokens = tokenize("function f(a, b: real): integer; forward;").unwrap();

    for pair in tokens.windows(2) {
        assert!(pair[0].offset < pair[1].offset);
        if pair[0].kind != TokenKind::EndOfInput {
            assert!(!pair[0]
                .text
                .is_empty());
        }
    }
}

#[test]
fn comments_are_skipped() {
    let source = "// a line comment\nvar { brace\ncomment } x: char;";
    let tokens = tokenize(source).unwrap();

    assert_eq!(tokens[0].text, "var");
    assert_eq!(tokens[0].line, 2);
    assert_eq!(tokens[1].text, "x");
    assert_eq!((tokens[1].line, tokens[1].column), (3, 11));
}

#[test]
fn invalid_characters() {
    assert_eq!(
        tokenize("var x: integer = 5;"),
        Err(LexicalError::InvalidCharacter(15, '='))
    );
    assert_eq!(
        tokenize("var _x: integer;"),
        Err(LexicalError::InvalidCharacter(4, '_'))
    );
    assert_eq!(
        tokenize("a.b"),
        Err(LexicalError::InvalidCharacter(1, '.'))
    );
    assert_eq!(
        tokenize("var x { oops"),
        Err(LexicalError::UnterminatedComment(6))
    );
}

#[test]
fn empty_input() {
    let tokens = tokenize("").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EndOfInput);
    assert_eq!((tokens[0].line, tokens[0].column), (1, 1));

    let tokens = tokenize("  \n\n ").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!((tokens[0].line, tokens[0].column), (3, 2));
}

#[test]
fn line_index_columns_count_characters() {
    let source = "é\nab";
    let index = LineIndex::new(source);

    // 'é' is two bytes wide
    assert_eq!(index.locate(2), Position::new(1, 2, 2));
    assert_eq!(index.locate(3), Position::new(2, 1, 3));
    assert_eq!(index.locate(4), Position::new(2, 2, 4));
}
