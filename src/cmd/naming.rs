/*!
Per-item output naming for `convert`.

Strategies:
  index   <dataset>_<n>, n = 1-based element position (default)
  field   value at a dotted path inside the source element
  prompt  ask on stdin for every item

`field` and `prompt` fall back to the index name when they cannot produce a
usable file stem.
*/

use anyhow::Result;
use serde_json::Value;
use std::fmt;
use std::io::{BufRead, Write};

use crate::cmd::shared::prompt_line;
use crate::morph::resolve;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum NamingStrategy {
    /// Sequential `<dataset>_<n>` names
    #[default]
    Index,
    /// Value of `--name-field` in each source element
    Field,
    /// Ask for a file name per item
    Prompt,
}

impl fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NamingStrategy::Index => "index",
            NamingStrategy::Field => "field",
            NamingStrategy::Prompt => "prompt",
        })
    }
}

/// Default name for the element at 0-based `index`. The dataset part goes
/// through [`sanitize_stem`]; `item` stands in when nothing usable is left.
pub fn index_name(dataset: &str, index: usize) -> String {
    let base = sanitize_stem(dataset).unwrap_or_else(|| "item".to_string());
    format!("{base}_{}", index + 1)
}

/// Turn user- or data-provided text into a single file stem.
///
/// Trims, drops a trailing `.json`, replaces path separators and reserved
/// characters with `_`. Returns `None` for empty, `.` and `..`.
pub fn sanitize_stem(raw: &str) -> Option<String> {
    let mut s = raw.trim();
    if let Some(cut) = s.len().checked_sub(5)
        && s.get(cut..).is_some_and(|tail| tail.eq_ignore_ascii_case(".json"))
    {
        s = s[..cut].trim_end();
    }
    let cleaned: String = s
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => None,
        _ => Some(cleaned),
    }
}

/// Scalar at `path` rendered as a file stem.
pub fn field_name(source: &Value, path: &str) -> Option<String> {
    let text = match resolve(source, path)? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    sanitize_stem(&text)
}

/// Produces one file stem per converted item.
pub struct ItemNamer<R, W> {
    strategy: NamingStrategy,
    dataset: String,
    field: Option<String>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ItemNamer<R, W> {
    pub fn new(
        strategy: NamingStrategy,
        dataset: &str,
        field: Option<String>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            strategy,
            dataset: dataset.to_string(),
            field,
            input,
            output,
        }
    }

    pub fn strategy(&self) -> NamingStrategy {
        self.strategy
    }

    /// Name for element `index` whose source value is `source`.
    pub fn name_for(&mut self, index: usize, source: &Value) -> Result<String> {
        let fallback = index_name(&self.dataset, index);
        match self.strategy {
            NamingStrategy::Index => Ok(fallback),
            NamingStrategy::Field => {
                let path = self.field.as_deref().unwrap_or_default();
                match field_name(source, path) {
                    Some(name) => Ok(name),
                    None => {
                        crate::log_warn!(
                            "item {}: '{}' did not resolve to a usable name; using {}",
                            index + 1,
                            path,
                            fallback
                        );
                        Ok(fallback)
                    }
                }
            }
            NamingStrategy::Prompt => self.prompt(index, fallback),
        }
    }

    fn prompt(&mut self, index: usize, fallback: String) -> Result<String> {
        let question = format!(
            "Enter a filename for the converted data #{} (without \".json\"): ",
            index + 1
        );
        loop {
            let Some(answer) = prompt_line(&mut self.input, &mut self.output, &question)? else {
                crate::log_warn!("end of input; naming item {} as {}", index + 1, fallback);
                return Ok(fallback);
            };
            match sanitize_stem(&answer) {
                Some(name) => return Ok(name),
                None => writeln!(self.output, "  (a file name is required)")?,
            }
        }
    }
}
