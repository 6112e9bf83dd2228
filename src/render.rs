//! Template rendering: token substitution, body assembly, and stack dumps.
//!
//! Rendering builds the styled line first and derives the plain line by
//! stripping every ANSI SGR sequence from it, so both sinks always carry the
//! same text.
//!
//! Substitution order is level, date, time, file. Each step replaces the
//! first occurrence of its token in the text built so far, which means a
//! template that repeats a placeholder keeps the later copies as literal text,
//! and two placeholders glued together (`%date%%time%`) share one token whose
//! second placeholder never gets substituted.

use std::borrow::Cow;
use std::fmt::{self, Write};
use std::sync::OnceLock;

use owo_colors::{OwoColorize, Style};
use regex::Regex;

use crate::clock::{self, Clock};
use crate::format::{
    DATE_PLACEHOLDER, FILE_PLACEHOLDER, FormatTable, LEVEL_PLACEHOLDER, TIME_PLACEHOLDER,
};
use crate::frame::Introspect;
use crate::level::Level;

/// Indentation of each stack-dump line.
const STACK_INDENT: &str = "    ";

/// Substituted for `%file%` when the caller cannot be resolved.
const UNRESOLVED_LOCATION: &str = "???";

fn re_ansi() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\x1b\[[0-9;]*m")
            .expect("re_ansi: pattern is valid and should always compile")
    })
}

/// Remove every ANSI SGR escape sequence from `s`.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    re_ansi().replace_all(s, "")
}

fn timestamp_style() -> Style {
    Style::new().white().bold()
}

fn location_style() -> Style {
    Style::new().cyan().bold()
}

/// Join display arguments with single spaces.
pub fn join_args(args: &[&dyn fmt::Display]) -> String {
    let mut body = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            body.push(' ');
        }
        let _ = write!(body, "{arg}");
    }
    body
}

/// One rendered log line in both sink encodings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// ANSI-styled text for the interactive sink.
    pub styled: String,
    /// The same text with every escape sequence removed, for the file sink.
    pub plain: String,
}

impl Rendered {
    fn from_styled(styled: String) -> Self {
        let plain = strip_ansi(&styled).into_owned();
        Self { styled, plain }
    }
}

/// Everything a render reads from its logger.
pub struct RenderContext<'a> {
    pub formats: &'a FormatTable,
    pub prefix: &'a str,
    /// Extra frames between the logging call and the caller to report.
    pub call_depth: usize,
    pub clock: &'a dyn Clock,
    pub introspector: &'a dyn Introspect,
}

/// Replace the first `token` in `out` with the token's text after swapping its
/// placeholder for `value`, wrapped in `style`.
fn substitute(out: &mut String, token: &str, placeholder: &str, value: &str, style: Style) {
    if token.is_empty() {
        return;
    }
    let text = token.replacen(placeholder, value, 1);
    *out = out.replacen(token, &text.style(style).to_string(), 1);
}

/// Render `body` at `level` through the context's format table.
pub fn render(
    ctx: &RenderContext<'_>,
    level: Level,
    body: &str,
    append_newline: bool,
) -> Rendered {
    let format = ctx.formats.format(level);
    let mut out = format.raw().to_string();

    substitute(
        &mut out,
        format.level_token(),
        LEVEL_PLACEHOLDER,
        level.name(),
        level.style(),
    );

    let needs_now = !format.date_token().is_empty() || !format.time_token().is_empty();
    if needs_now {
        let now = ctx.clock.now();
        substitute(
            &mut out,
            format.date_token(),
            DATE_PLACEHOLDER,
            &clock::format_date(&now),
            timestamp_style(),
        );
        substitute(
            &mut out,
            format.time_token(),
            TIME_PLACEHOLDER,
            &clock::format_time(&now),
            timestamp_style(),
        );
    }

    if !format.file_token().is_empty() {
        let location = ctx
            .introspector
            .resolve_caller(ctx.call_depth)
            .map(|frame| frame.location())
            .unwrap_or_else(|| UNRESOLVED_LOCATION.to_string());
        substitute(
            &mut out,
            format.file_token(),
            FILE_PLACEHOLDER,
            &location,
            location_style(),
        );
    }

    if !ctx.prefix.is_empty() {
        out.push_str(ctx.prefix);
        out.push(' ');
    }

    out.push_str(body);
    if append_newline {
        out.push('\n');
    }

    if level.carries_stack() {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        for frame in ctx.introspector.capture_stack(ctx.call_depth) {
            let _ = writeln!(out, "{STACK_INDENT}{frame}");
        }
    }

    Rendered::from_styled(out)
}
