// SPDX-License-Identifier: MIT
//
// quill: terminal preview of the editor core.
//
// Loads a file (or stdin), applies `:set` directives and edits, then prints
// what an editor view would draw:
//
//   quill-text   → buffer, classification, attribute runs
//   quill-layout → wrap indent, tab stops, gutter numbers, line breaking
//
// Each run is drawn in its attribute color, continuation lines are
// indented under their opening bracket, and tabs stop where the layout
// metrics put them.
//
//   ┌────┬────────────────────────────────────┐
//   │  1 │ int main(int argc,                 │
//   │    │          char **argv)              │  ← wrap indent
//   │  2 │ // comment                         │
//   └────┴────────────────────────────────────┘

mod logging;

use std::env;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process;

use log::info;
use quill_layout::{
    paragraph_labels, Applied, GlyphLayout, LayoutConfig, LayoutMetrics, LineFragment, Monospace,
    MonospaceLayout, Point,
};
use quill_text::paragraph::is_terminator;
use quill_text::{AttributedCache, CharRange, Classifier, Color, Font, TextBuffer};

const USAGE: &str = "\
usage: quill [options] [FILE]

Reads FILE (or stdin) and prints it with syntax colors, paragraph numbers,
wrap indents and tab stops.

options:
  --set <directives>       apply :set directives, e.g. \"nonu ts=8 gfn=Menlo:13\"
  --width <cols>           wrap width in columns (default 80)
  --replace <s>:<e>:<text> replace chars s..e with text (\\n and \\t escapes)
  --plain                  no ANSI colors
  -h, --help               show this help";

const DEFAULT_WIDTH: usize = 80;

// ─── Arguments ──────────────────────────────────────────────────────────────

/// A `--replace` edit.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Replace {
    range: CharRange,
    text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Options {
    sets: Vec<String>,
    width: usize,
    replaces: Vec<Replace>,
    plain: bool,
    help: bool,
    file: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sets: Vec::new(),
            width: DEFAULT_WIDTH,
            replaces: Vec::new(),
            plain: false,
            help: false,
            file: None,
        }
    }
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut opts = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{flag} needs a value"))
        };
        match arg.as_str() {
            "-h" | "--help" => opts.help = true,
            "--plain" => opts.plain = true,
            "--set" => opts.sets.push(value("--set")?),
            "--width" => {
                let raw = value("--width")?;
                opts.width = raw
                    .parse()
                    .ok()
                    .filter(|&w| w > 0)
                    .ok_or_else(|| format!("invalid width: {raw}"))?;
            }
            "--replace" => opts.replaces.push(parse_replace(&value("--replace")?)?),
            flag if flag.starts_with('-') && flag != "-" => {
                return Err(format!("unknown option: {flag}"));
            }
            path => {
                if opts.file.is_some() {
                    return Err(format!("unexpected argument: {path}"));
                }
                if path != "-" {
                    opts.file = Some(PathBuf::from(path));
                }
            }
        }
    }
    Ok(opts)
}

/// `start:end:text`. The text may itself contain colons.
fn parse_replace(spec: &str) -> Result<Replace, String> {
    let invalid = || format!("invalid replace: {spec} (expected start:end:text)");
    let mut parts = spec.splitn(3, ':');
    let (Some(start), Some(end), Some(text)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    let start: usize = start.parse().map_err(|_| invalid())?;
    let end: usize = end.parse().map_err(|_| invalid())?;
    if start > end {
        return Err(invalid());
    }
    Ok(Replace {
        range: CharRange::new(start, end),
        text: unescape(text),
    })
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

// ─── Rendering ──────────────────────────────────────────────────────────────

/// Column index for an x position in monospace cells.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn columns(x: f32, cell: f32) -> usize {
    (x / cell).round().max(0.0) as usize
}

/// ANSI foreground for a run. Black is the "no highlight" color, so it is
/// left to the terminal's default foreground.
fn sgr(color: Option<Color>) -> String {
    match color {
        None | Some(Color::BLACK) => "\x1b[39m".to_string(),
        Some(Color { r, g, b }) => format!("\x1b[38;2;{r};{g};{b}m"),
    }
}

/// Draw every line fragment as one terminal line.
fn render(
    cache: &AttributedCache,
    metrics: &LayoutMetrics,
    layout: &MonospaceLayout,
    color: bool,
) -> quill_text::Result<String> {
    let font = cache.font();
    let cell = Monospace::cell_width(font);
    let height = Monospace::line_height(font);
    let gutter_cols = if metrics.config().gutter_enabled {
        columns(metrics.config().gutter_width, cell)
    } else {
        0
    };

    let mut out = String::new();
    for fragment in layout.fragments() {
        let label = paragraph_labels(
            metrics,
            cache,
            std::slice::from_ref(fragment),
            Point::ZERO,
            height,
        )?;

        let mut line = String::new();
        if gutter_cols > 0 {
            let width = gutter_cols.saturating_sub(1);
            match label.first() {
                Some(l) => {
                    let number = format!("{:>width$} ", l.number);
                    if color {
                        line.push_str("\x1b[2m");
                        line.push_str(&number);
                        line.push_str("\x1b[22m");
                    } else {
                        line.push_str(&number);
                    }
                }
                None => line.push_str(&" ".repeat(gutter_cols)),
            }
        }
        let indent = columns(fragment.rect.origin.x, cell).saturating_sub(gutter_cols);
        line.push_str(&" ".repeat(indent));

        draw_text(cache, metrics, layout, fragment, color, &mut line)?;
        if color {
            line.push_str("\x1b[0m");
        }
        out.push_str(line.trim_end_matches(' '));
        out.push('\n');
    }
    Ok(out)
}

fn draw_text(
    cache: &AttributedCache,
    metrics: &LayoutMetrics,
    layout: &MonospaceLayout,
    fragment: &LineFragment,
    color: bool,
    line: &mut String,
) -> quill_text::Result<()> {
    let Some(buffer) = cache.content() else {
        return Ok(());
    };
    let font = cache.font();
    let cell = Monospace::cell_width(font);

    for run in cache.runs(fragment.chars)? {
        if color {
            line.push_str(&sgr(run.attributes.color));
        }
        for (offset, ch) in buffer.chars_in(run.range)?.chars().enumerate() {
            if is_terminator(ch) {
                continue;
            }
            if ch == '\t' {
                let x = layout.glyph_position(run.range.start + offset).x;
                let tab = metrics.tab_stop_rect_for_font(Point::new(x, 0.0), &Monospace, font);
                line.push_str(&" ".repeat(columns(tab.size.width, cell)));
            } else {
                line.push(ch);
            }
        }
    }
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn load(file: Option<&PathBuf>) -> Result<String, String> {
    match file {
        Some(path) => fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("stdin: {e}"))?;
            Ok(text)
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let opts = parse_args(args)?;
    if opts.help {
        println!("{USAGE}");
        return Ok(());
    }

    let text = load(opts.file.as_ref())?;
    let mut cache = AttributedCache::new(Classifier::default(), Font::default());
    cache
        .set_content(TextBuffer::from_text(&text))
        .map_err(|e| e.to_string())?;
    info!("loaded {} chars", cache.len());

    let mut metrics = LayoutMetrics::new(LayoutConfig {
        gutter_enabled: true,
        tab_width: 4,
        ..LayoutConfig::default()
    });
    for set in &opts.sets {
        let applied = quill_layout::apply_all(set, &mut metrics, &mut cache)
            .map_err(|e| format!("--set {set}: {e}"))?;
        for result in applied {
            if let Applied::Report(report) = result {
                eprintln!("{report}");
            }
        }
    }
    for edit in &opts.replaces {
        cache
            .apply_edit(edit.range, &edit.text)
            .map_err(|e| format!("--replace {}: {e}", edit.range))?;
    }

    #[allow(clippy::cast_precision_loss)]
    let width = opts.width as f32 * Monospace::cell_width(cache.font());
    let layout = MonospaceLayout::build(&cache, &metrics, width).map_err(|e| e.to_string())?;
    let color = !opts.plain && io::stdout().is_terminal();
    let output = render(&cache, &metrics, &layout, color).map_err(|e| e.to_string())?;

    io::stdout()
        .lock()
        .write_all(output.as_bytes())
        .map_err(|e| format!("stdout: {e}"))
}

fn main() {
    logging::init();
    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("quill: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
