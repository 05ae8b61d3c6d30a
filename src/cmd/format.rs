/*!
format.rs

Human-output styling for `json-morph`.

  - StyleOptions::detect()  NO_COLOR / NO_EMOJI / COLUMNS
  - color(role, text)       ANSI roles, plain when color is off
  - emoji(tag)              small status glyphs
  - banner()                startup "JSON-MORPH" box
  - box_header(title, sub)  single boxed line
  - table(headers, rows)    two-space separated columns with truncation

JSON output paths never go through these helpers.
*/

use std::borrow::Cow;

/* ---- Style Options ---- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub use_emoji: bool,
    pub term_width: usize,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self::detect()
    }
}

impl StyleOptions {
    pub fn detect() -> Self {
        let term_width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);
        StyleOptions {
            use_color: std::env::var_os("NO_COLOR").is_none(),
            use_emoji: std::env::var_os("NO_EMOJI").is_none(),
            term_width,
        }
    }

    /// No color, no emoji; fixed width.
    #[cfg(test)]
    pub fn plain(term_width: usize) -> Self {
        StyleOptions {
            use_color: false,
            use_emoji: false,
            term_width,
        }
    }
}

/* ---- Color / Emoji ---- */

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Banner,
    Secondary,
    Accent,
    Success,
    Error,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Banner => "1;38;5;196", // bold red
        Role::Secondary => "38;5;250",
        Role::Accent => "38;5;213",
        Role::Success => "38;5;82",
        Role::Error => "38;5;196",
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

pub fn emoji(tag: &str, style: &StyleOptions) -> &'static str {
    if !style.use_emoji {
        return "";
    }
    match tag {
        "success" => "✔",
        "error" => "✖",
        "info" => "ℹ",
        _ => "",
    }
}

/* ---- Boxes ---- */

pub fn banner(style: &StyleOptions) -> String {
    let title = color(Role::Banner, "J S O N - M O R P H", style);
    box_header(title, Some("fetch • reshape • save"), style)
}

/// One boxed line: `title  subtitle`, truncated to the terminal width.
pub fn box_header(
    title: impl AsRef<str>,
    subtitle: Option<impl AsRef<str>>,
    style: &StyleOptions,
) -> String {
    let mut inner = title.as_ref().to_string();
    if let Some(sub) = subtitle {
        inner.push_str("  ");
        inner.push_str(&color(Role::Secondary, sub.as_ref(), style));
    }

    let max_inner = style.term_width.saturating_sub(4).max(10);
    if display_width(&inner) > max_inner {
        inner = truncate_ellipsis(&strip_ansi(&inner), max_inner);
    }
    let width = display_width(&inner);
    let bar = "─".repeat(width + 2);
    format!("┌{bar}┐\n│ {inner} │\n└{bar}┘")
}

/* ---- Table ---- */

/// Render rows under `headers`. Columns shrink (widest first) when the total
/// exceeds the terminal width; overflowing cells end in `…`.
pub fn table(headers: &[&str], rows: &[Vec<String>], style: &StyleOptions) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let total: usize = widths.iter().sum::<usize>() + (cols - 1) * 2;
    if total > style.term_width {
        let mut overflow = total - style.term_width;
        let mut order: Vec<usize> = (0..cols).collect();
        order.sort_by(|a, b| widths[*b].cmp(&widths[*a]));
        for idx in order {
            if overflow == 0 {
                break;
            }
            let shrink = widths[idx].saturating_sub(4).min(overflow);
            widths[idx] -= shrink;
            overflow -= shrink;
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(color(Role::Accent, render_row(headers, &widths), style));
    let sep = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(color(Role::Dim, sep, style));
    for row in rows {
        let cells: Vec<&str> = (0..cols)
            .map(|i| row.get(i).map(String::as_str).unwrap_or(""))
            .collect();
        lines.push(render_row(&cells, &widths));
    }
    lines.join("\n")
}

fn render_row(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(c, w)| pad(&truncate_ellipsis(c, *w), *w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn pad(s: &str, width: usize) -> String {
    let len = display_width(s);
    if len >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - len))
    }
}

/* ---- Text Helpers ---- */

pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    match max_chars {
        0 => String::new(),
        1 => "…".into(),
        n => {
            let mut out: String = s.chars().take(n - 1).collect();
            out.push('…');
            out
        }
    }
}

fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for t in chars.by_ref() {
                if t.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    Cow::Owned(out)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_style_has_no_escapes() {
        let style = StyleOptions::plain(80);
        assert_eq!(color(Role::Error, "x", &style), "x");
        assert_eq!(emoji("success", &style), "");
    }

    #[test]
    fn box_header_contains_title_and_subtitle() {
        let style = StyleOptions::plain(80);
        let b = box_header("Saved", Some("users.json"), &style);
        let lines: Vec<&str> = b.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "│ Saved  users.json │");
        assert_eq!(lines[0].chars().count(), lines[1].chars().count());
    }

    #[test]
    fn box_header_truncates_long_lines() {
        let style = StyleOptions::plain(40);
        let b = box_header("x".repeat(100), None::<&str>, &style);
        assert!(b.lines().all(|l| l.chars().count() <= 40));
        assert!(b.contains('…'));
    }

    #[test]
    fn banner_mentions_name() {
        assert!(banner(&StyleOptions::plain(80)).contains("J S O N - M O R P H"));
    }

    #[test]
    fn table_aligns_columns() {
        let style = StyleOptions::plain(80);
        let t = table(
            &["#", "FILE"],
            &[
                vec!["1".into(), "a.json".into()],
                vec!["10".into(), "bb.json".into()],
            ],
            &style,
        );
        let lines: Vec<&str> = t.lines().collect();
        assert_eq!(lines[0], "#   FILE");
        assert_eq!(lines[1], "--  -------");
        assert_eq!(lines[2], "1   a.json");
        assert_eq!(lines[3], "10  bb.json");
    }

    #[test]
    fn table_shrinks_to_width() {
        let style = StyleOptions::plain(40);
        let t = table(&["A", "B"], &[vec!["y".repeat(60), "z".into()]], &style);
        assert!(t.lines().all(|l| l.chars().count() <= 40));
    }

    #[test]
    fn truncate_and_strip() {
        assert_eq!(truncate_ellipsis("abcdef", 4), "abc…");
        assert_eq!(truncate_ellipsis("abc", 4), "abc");
        assert_eq!(strip_ansi("\x1b[31mRED\x1b[0m"), "RED");
    }
}
