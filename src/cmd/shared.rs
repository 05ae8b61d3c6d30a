/*!
shared.rs - helpers used by both subcommands.

  - parse_headers: `-H` values (literal mapping or KEY=VALUE / "Key: Value")
  - prompt_line / resolve_data_name: stdin prompts for missing input
  - prompt_output: where prompts go (stderr under --json)
  - Reporter: one place deciding between JSON and styled human output
*/

use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};

use crate::cmd::format::{Role, StyleOptions, box_header, color, emoji};

/* ---- Header Parsing ---- */

/// Parse every `-H` occurrence into ordered `(name, value)` pairs.
///
/// Each occurrence is either
///   - a literal mapping: `{"Accept": "application/json"}` or the
///     single-quoted `{'Accept': 'application/json'}` form, or
///   - a single pair: `Accept=application/json` or `Accept: application/json`.
///
/// Non-string mapping values (numbers, booleans) are rendered as text.
pub fn parse_headers(raw: &[String]) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for item in raw {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('{') {
            out.extend(parse_header_mapping(trimmed)?);
        } else {
            out.push(parse_header_pair(trimmed)?);
        }
    }
    Ok(out)
}

fn parse_header_mapping(raw: &str) -> Result<Vec<(String, String)>> {
    // YAML flow mappings accept both JSON and single-quoted dict literals.
    let value: serde_yaml::Value = serde_yaml::from_str(raw)
        .with_context(|| format!("invalid header mapping: {raw}"))?;
    let Some(map) = value.as_mapping() else {
        bail!("header mapping must be an object: {raw}");
    };
    let mut out = Vec::with_capacity(map.len());
    for (k, v) in map {
        let key = scalar_text(k).with_context(|| format!("invalid header name in {raw}"))?;
        let val = scalar_text(v).with_context(|| format!("invalid value for header '{key}'"))?;
        out.push((key, val));
    }
    Ok(out)
}

fn scalar_text(v: &serde_yaml::Value) -> Result<String> {
    match v {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => bail!("expected a scalar, got {other:?}"),
    }
}

fn parse_header_pair(raw: &str) -> Result<(String, String)> {
    let split = match (raw.find('='), raw.find(':')) {
        (Some(e), Some(c)) => Some(e.min(c)),
        (Some(i), None) | (None, Some(i)) => Some(i),
        (None, None) => None,
    };
    let Some(idx) = split else {
        bail!("invalid header (expected KEY=VALUE, 'Key: Value' or a mapping): {raw}");
    };
    let key = raw[..idx].trim();
    if key.is_empty() {
        bail!("invalid header (empty name): {raw}");
    }
    Ok((key.to_string(), raw[idx + 1..].trim().to_string()))
}

/* ---- Prompts ---- */

/// Prompts go to stderr when stdout carries JSON results.
pub fn prompt_output(json: bool) -> Box<dyn Write> {
    if json {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    }
}

/// Print `question` and read one line. `None` on end of input.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> Result<Option<String>> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line).context("failed to read from stdin")? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Use the `-n` value when given, otherwise ask for it. Prompted names are
/// lower-cased. An empty answer is an error.
pub fn resolve_data_name<R: BufRead, W: Write>(
    given: Option<&str>,
    question: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    if let Some(name) = given
        && !name.trim().is_empty()
    {
        return Ok(name.trim().to_string());
    }
    match prompt_line(input, output, question)? {
        Some(answer) if !answer.is_empty() => Ok(answer.to_lowercase()),
        _ => bail!("no data name given (use -n/--data-name)"),
    }
}

/* ---- Output ---- */

/// Routes results to stdout as JSON objects or styled text.
pub struct Reporter {
    pub json: bool,
    pub style: StyleOptions,
}

impl Reporter {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            style: StyleOptions::detect(),
        }
    }

    /// Success: print `payload` merged with `"status":"ok"` in JSON mode,
    /// otherwise a green line with `message`.
    pub fn ok(&self, message: &str, payload: serde_json::Value) {
        if self.json {
            let mut obj = serde_json::Map::new();
            obj.insert("status".into(), "ok".into());
            if let serde_json::Value::Object(extra) = payload {
                obj.extend(extra);
            }
            print_json(&serde_json::Value::Object(obj));
        } else {
            println!(
                "{} {}",
                emoji("success", &self.style),
                color(Role::Success, message, &self.style)
            );
        }
    }

    /// Failure report. Does not decide the exit code.
    pub fn error(&self, title: &str, message: &str, kind: &str) {
        if self.json {
            print_json(&serde_json::json!({
                "status": "error",
                "kind": kind,
                "error": message,
            }));
        } else {
            let title = format!("{} {title}", emoji("error", &self.style));
            println!("{}", box_header(title, None::<&str>, &self.style));
            println!("{}", color(Role::Error, message, &self.style));
        }
    }

    pub fn note(&self, message: &str) {
        if !self.json {
            println!(
                "{} {}",
                emoji("info", &self.style),
                color(Role::Dim, message, &self.style)
            );
        }
    }
}

fn print_json(v: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn header_pairs() {
        let h = parse_headers(&strings(&["Accept=application/json", "Authorization: Bearer a=b"]))
            .unwrap();
        assert_eq!(
            h,
            vec![
                ("Accept".into(), "application/json".into()),
                ("Authorization".into(), "Bearer a=b".into()),
            ]
        );
    }

    #[test]
    fn header_json_mapping() {
        let h = parse_headers(&strings(&[r#"{"X-Api-Key": "k1", "X-Page": 2}"#])).unwrap();
        assert_eq!(
            h,
            vec![
                ("X-Api-Key".into(), "k1".into()),
                ("X-Page".into(), "2".into())
            ]
        );
    }

    #[test]
    fn header_single_quoted_mapping() {
        let h = parse_headers(&strings(&["{'Authorization': 'Token abc', 'Accept': '*/*'}"]))
            .unwrap();
        assert_eq!(h[0], ("Authorization".into(), "Token abc".into()));
        assert_eq!(h[1], ("Accept".into(), "*/*".into()));
    }

    #[test]
    fn header_errors() {
        assert!(parse_headers(&strings(&["novalue"])).is_err());
        assert!(parse_headers(&strings(&["=x"])).is_err());
        assert!(parse_headers(&strings(&["{'a': ['nested']}"])).is_err());
        assert!(parse_headers(&strings(&["{broken"])).is_err());
    }

    #[test]
    fn empty_header_args_are_skipped() {
        assert!(parse_headers(&strings(&["", "  "])).unwrap().is_empty());
    }

    #[test]
    fn data_name_prefers_flag() {
        let mut input = Cursor::new("ignored\n");
        let mut out = Vec::new();
        let n = resolve_data_name(Some("Users"), "? ", &mut input, &mut out).unwrap();
        assert_eq!(n, "Users");
        assert!(out.is_empty(), "no prompt when the flag is set");
    }

    #[test]
    fn data_name_prompted_and_lowercased() {
        let mut input = Cursor::new("  MyData \n");
        let mut out = Vec::new();
        let n = resolve_data_name(None, "name? ", &mut input, &mut out).unwrap();
        assert_eq!(n, "mydata");
        assert_eq!(String::from_utf8(out).unwrap(), "name? ");
    }

    #[test]
    fn prompts_write_through_boxed_sink() {
        let mut input = Cursor::new("Name\n");
        let mut sink = prompt_output(true);
        let n = resolve_data_name(None, "", &mut input, &mut sink).unwrap();
        assert_eq!(n, "name");
    }

    #[test]
    fn data_name_missing_on_eof() {
        let mut input = Cursor::new("");
        let mut out = Vec::new();
        assert!(resolve_data_name(None, "? ", &mut input, &mut out).is_err());
    }
}
