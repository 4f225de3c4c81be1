use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use lazy_static::lazy_static;
use regex::Regex;

use mdflow::{
    EngineConfig, LineBreakMode, MarkdownEngine, MarkdownStream, StreamEvent, UnterminatedEmphasis,
    WhitespaceMode,
};

// -----------------------------------------------------------------------------
// Constants & Helpers
// -----------------------------------------------------------------------------

lazy_static! {
    static ref CASE_DELIMITER_RE: Regex =
        Regex::new(r"^````+\s+case\s+(?P<name>\S+)(?:\s+(?P<config>\S+))?\s*$").expect("regex");
}

static CASES_FILE: &str = "tests/rendering/cases.txt";

/// One rendering case from the fixture file.
#[derive(Debug, Clone)]
struct RenderCase {
    section: String,
    name: String,
    config_name: String,
    markdown: String,
    expected_html: String,
}

#[allow(clippy::while_let_on_iterator)]
fn load_cases(path: &Path) -> anyhow::Result<Vec<RenderCase>> {
    let fixture =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut section = String::from("Unknown");
    let mut cases = Vec::new();

    let mut lines = fixture.lines();
    while let Some(line) = lines.next() {
        if let Some(title) = line.strip_prefix("## ") {
            section = title.trim().to_string();
            continue;
        }

        if !line.starts_with('`') {
            continue;
        }

        let caps = CASE_DELIMITER_RE
            .captures(line)
            .ok_or_else(|| anyhow!("malformed case header: {line:?}"))?;
        let name = caps["name"].to_string();
        let config_name = caps
            .name("config")
            .map_or("default", |m| m.as_str())
            .to_string();

        let mut markdown_lines = Vec::new();
        let mut terminated = false;
        while let Some(markdown_line) = lines.next() {
            if markdown_line == "." {
                terminated = true;
                break;
            }
            markdown_lines.push(markdown_line);
        }
        if !terminated {
            bail!("case {name} has no `.` separator");
        }

        let mut expected_lines = Vec::new();
        while let Some(expected_line) = lines.next() {
            if expected_line.starts_with("````") {
                break;
            }
            expected_lines.push(expected_line);
        }

        cases.push(RenderCase {
            section: section.clone(),
            name,
            config_name,
            markdown: markdown_lines.join("\n"),
            expected_html: expected_lines.join("\n"),
        });
    }

    Ok(cases)
}

fn config_for(name: &str) -> anyhow::Result<EngineConfig> {
    let builder = EngineConfig::builder();
    let config = match name {
        "default" => builder.build(),
        "preserve-structural" => builder
            .whitespace_mode(WhitespaceMode::Preserve)
            .default_line_breaks(LineBreakMode::Structural)
            .build(),
        "preserve-paragraph" => builder
            .whitespace_mode(WhitespaceMode::Preserve)
            .default_line_breaks(LineBreakMode::Paragraph)
            .build(),
        "literal" => builder
            .unterminated_emphasis(UnterminatedEmphasis::Literal)
            .build(),
        "html" => builder.xhtml_style(false).build(),
        other => bail!("unknown case configuration {other:?}"),
    };
    Ok(config)
}

fn should_run_case(case: &RenderCase) -> bool {
    match env::var("MDFLOW_CASE") {
        Ok(filter) => case.name.contains(&filter) || case.section.to_lowercase().contains(&filter.to_lowercase()),
        Err(_) => true,
    }
}

// -----------------------------------------------------------------------------
// Pipelines
// -----------------------------------------------------------------------------

fn run_one_shot(config: &EngineConfig, markdown: &str) -> anyhow::Result<String> {
    Ok(MarkdownEngine::with_config(config.clone()).parse_to_html(markdown)?)
}

fn run_per_char(config: &EngineConfig, markdown: &str) -> anyhow::Result<String> {
    let mut stream = MarkdownStream::with_config(config.clone(), Vec::<StreamEvent>::new());
    let mut buffer = [0u8; 4];
    for ch in markdown.chars() {
        stream.write(ch.encode_utf8(&mut buffer))?;
    }
    stream.end()?;
    Ok(StreamEvent::collect_html(stream.sink()))
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[test]
fn rendering_cases() -> anyhow::Result<()> {
    let path = PathBuf::from(CASES_FILE);
    let cases = load_cases(&path)?;
    assert!(!cases.is_empty(), "no cases found in {}", path.display());

    let mut failures = Vec::new();
    let mut ran = 0;
    for case in cases.iter().filter(|case| should_run_case(case)) {
        ran += 1;
        let config = config_for(&case.config_name)?;

        let one_shot = run_one_shot(&config, &case.markdown)?;
        if one_shot != case.expected_html {
            failures.push(format!(
                "[{}] {} (one-shot)\n  input:    {:?}\n  expected: {}\n  actual:   {}",
                case.section, case.name, case.markdown, case.expected_html, one_shot
            ));
        }

        let streamed = run_per_char(&config, &case.markdown)?;
        if streamed != case.expected_html {
            failures.push(format!(
                "[{}] {} (per-char stream)\n  input:    {:?}\n  expected: {}\n  actual:   {}",
                case.section, case.name, case.markdown, case.expected_html, streamed
            ));
        }
    }

    eprintln!("Ran {ran} rendering cases");
    assert!(failures.is_empty(), "{} failures:\n{}", failures.len(), failures.join("\n"));
    Ok(())
}

#[test]
fn fixture_names_are_unique() -> anyhow::Result<()> {
    let cases = load_cases(Path::new(CASES_FILE))?;
    let mut names: Vec<&str> = cases.iter().map(|case| case.name.as_str()).collect();
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), total, "duplicate case names in {CASES_FILE}");
    Ok(())
}
