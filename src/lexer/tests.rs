use super::*;

fn tokenize_whole(input: &str) -> Vec<Token> {
    Tokenizer::new().tokenize(input, true)
}

fn tokenize_chunks(chunks: &[&str]) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new();
    let mut tokens = Vec::new();
    for chunk in chunks {
        tokens.extend(tokenizer.tokenize(chunk, false));
    }
    tokens.extend(tokenizer.tokenize("", true));
    tokens
}

fn concat(tokens: &[Token]) -> String {
    tokens.iter().map(|token| token.content.as_str()).collect()
}

#[test]
fn tokenizes_mixed_document() {
    let tokens = tokenize_whole("# Hello\nWorld!\n```code```\n*emphasis*");

    assert_eq!(
        tokens,
        vec![
            Token::header("# Hello"),
            Token::text("\nWorld!\n"),
            Token::code_block("```code```"),
            Token::text("\n"),
            Token::emphasis("*emphasis*"),
        ]
    );
}

#[test]
fn tokenizes_emphasis_markers() {
    let tokens = tokenize_whole("This is *emphasized* and _also emphasized_");

    assert_eq!(
        tokens,
        vec![
            Token::text("This is "),
            Token::emphasis("*emphasized*"),
            Token::text(" and "),
            Token::emphasis("_also emphasized_"),
        ]
    );
}

#[test]
fn keeps_code_block_with_language_as_one_token() {
    let input = "```typescript\nconst x = 42;\n```";
    assert_eq!(tokenize_whole(input), vec![Token::code_block(input)]);
}

#[test]
fn streamed_header_matches_single_call() {
    let mut tokenizer = Tokenizer::new();

    assert!(tokenizer.tokenize("# He", false).is_empty());
    assert_eq!(tokenizer.scan_state(), ScanState::Header);

    let second = tokenizer.tokenize("llo\nWor", false);
    assert_eq!(second, vec![Token::header("# Hello")]);
    assert_eq!(tokenizer.pending(), "\nWor");

    let third = tokenizer.tokenize("ld!", true);
    assert_eq!(third, vec![Token::text("\nWorld!")]);

    let mut streamed = second;
    streamed.extend(third);
    assert_eq!(streamed, tokenize_whole("# Hello\nWorld!"));
}

#[test]
fn defers_lone_hash_until_more_input() {
    let mut tokenizer = Tokenizer::new();

    assert!(tokenizer.tokenize("#", false).is_empty());
    assert_eq!(tokenizer.pending(), "#");
    assert_eq!(tokenizer.scan_state(), ScanState::Header);

    assert_eq!(tokenizer.tokenize("", true), vec![Token::header("#")]);
    assert!(tokenizer.pending().is_empty());
}

#[test]
fn fence_split_across_chunks() {
    let mut tokenizer = Tokenizer::new();

    assert!(tokenizer.tokenize("``", false).is_empty());
    assert_eq!(tokenizer.scan_state(), ScanState::Scanning);

    assert!(tokenizer.tokenize("`rust\nfn x\n``", false).is_empty());
    assert_eq!(tokenizer.scan_state(), ScanState::CodeBlock);

    assert_eq!(
        tokenizer.tokenize("`", false),
        vec![Token::code_block("```rust\nfn x\n```")]
    );
    assert!(tokenizer.pending().is_empty());
}

#[test]
fn pending_code_block_records_search_cursor() {
    let mut tokenizer = Tokenizer::new();
    assert!(tokenizer.tokenize("```abcdef", false).is_empty());

    let state = tokenizer.snapshot();
    assert_eq!(state.state, ScanState::CodeBlock);
    assert_eq!(state.buffer, "```abcdef");
    assert_eq!(state.cursor, 7);
}

#[test]
fn hash_inside_line_is_text() {
    assert_eq!(tokenize_whole("a # b"), vec![Token::text("a # b")]);
    assert_eq!(
        tokenize_whole("a\n# b"),
        vec![Token::text("a\n"), Token::header("# b")]
    );
}

#[test]
fn header_trailing_whitespace_moves_to_text() {
    let tokens = tokenize_whole("# Title  \nbody");
    assert_eq!(
        tokens,
        vec![Token::header("# Title"), Token::text("  \nbody")]
    );
    assert_eq!(concat(&tokens), "# Title  \nbody");
}

#[test]
fn plain_text_waits_for_a_trigger() {
    let mut tokenizer = Tokenizer::new();

    assert!(tokenizer.tokenize("plain text", false).is_empty());
    assert_eq!(tokenizer.pending(), "plain text");

    assert_eq!(
        tokenizer.tokenize(" and *more*", false),
        vec![Token::text("plain text and "), Token::emphasis("*more*")]
    );
    assert!(tokenizer.tokenize("", true).is_empty());
}

#[test]
fn short_backtick_runs_are_text() {
    assert_eq!(tokenize_whole("a `b` c"), vec![Token::text("a `b` c")]);

    let mut tokenizer = Tokenizer::new();
    assert!(tokenizer.tokenize("a ``", false).is_empty());
    assert_eq!(tokenizer.tokenize("x", true), vec![Token::text("a ``x")]);
}

#[test]
fn unterminated_constructs_are_forced_at_end() {
    assert_eq!(tokenize_whole("```abc"), vec![Token::code_block("```abc")]);
    assert_eq!(tokenize_whole("*abc"), vec![Token::emphasis("*abc")]);
    assert_eq!(
        tokenize_whole("a *b _c_"),
        vec![Token::text("a "), Token::emphasis("*b _c_")]
    );
}

#[test]
fn literal_policy_turns_unmatched_marker_into_text() {
    let config = TokenizerConfig {
        unterminated_emphasis: UnterminatedEmphasis::Literal,
        ..TokenizerConfig::default()
    };

    let mut tokenizer = Tokenizer::with_config(config.clone());
    assert_eq!(
        tokenizer.tokenize("a *b _c_", true),
        vec![
            Token::text("a "),
            Token::text("*b "),
            Token::emphasis("_c_")
        ]
    );

    let mut streamed = Tokenizer::with_config(config);
    let mut tokens = streamed.tokenize("a *b", false);
    tokens.extend(streamed.tokenize(" _c_", true));
    assert_eq!(
        tokens,
        vec![
            Token::text("a "),
            Token::text("*b "),
            Token::emphasis("_c_")
        ]
    );
}

#[test]
fn double_markers_pair_up_immediately() {
    assert_eq!(
        tokenize_whole("**bold**"),
        vec![
            Token::emphasis("**"),
            Token::text("bold"),
            Token::emphasis("**")
        ]
    );
}

#[test]
fn token_contents_reproduce_input() {
    let input = "# One \n\ntext with `tick` and _u_\n```\ncode * _\n```\n## Two\n*open";
    assert_eq!(concat(&tokenize_whole(input)), input);

    let chunks: Vec<String> = input.chars().map(String::from).collect();
    let chunk_refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
    let streamed = tokenize_chunks(&chunk_refs);
    assert_eq!(concat(&streamed), input);
    assert_eq!(streamed, tokenize_whole(input));
}

#[test]
fn tracks_position_of_unconsumed_input() {
    let mut tokenizer = Tokenizer::new();
    let tokens = tokenizer.tokenize("line one\n# Head\n", false);

    assert_eq!(
        tokens,
        vec![Token::text("line one\n"), Token::header("# Head")]
    );
    assert_eq!(tokenizer.pending(), "\n");
    let position = tokenizer.position();
    assert_eq!((position.line, position.column, position.offset), (2, 7, 15));
}

#[test]
fn restored_state_continues_identically() {
    let mut tokenizer = Tokenizer::new();
    let mut tokens = tokenizer.tokenize("intro *", false);
    tokens.extend(tokenizer.tokenize("em", false));

    let json = serde_json::to_string(&tokenizer.snapshot()).expect("state serializes");
    let state: TokenizerState = serde_json::from_str(&json).expect("state deserializes");
    assert_eq!(state.state, ScanState::Emphasis);

    let mut resumed = Tokenizer::restore(TokenizerConfig::default(), state);
    tokens.extend(resumed.tokenize("ph* done", true));

    assert_eq!(tokens, tokenize_whole("intro *emph* done"));
}

#[test]
fn empty_input_yields_nothing() {
    let mut tokenizer = Tokenizer::new();
    assert!(tokenizer.tokenize("", false).is_empty());
    assert!(tokenizer.tokenize("", true).is_empty());
}
