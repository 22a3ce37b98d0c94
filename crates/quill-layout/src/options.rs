//! Editor options: the `:set` system.
//!
//! Parses `:set`-style directives and applies them to a [`LayoutMetrics`]
//! and an [`AttributedCache`]. Layout options answer with an
//! [`Invalidation`]; the font option re-attributes the cache and answers
//! with its [`StorageChange`].
//!
//! # Supported syntax
//!
//! | Syntax          | Effect                        |
//! |-----------------|-------------------------------|
//! | `option`        | Enable boolean / show valued  |
//! | `nooption`      | Disable boolean               |
//! | `option!`       | Toggle boolean                |
//! | `option?`       | Query current value           |
//! | `option=value`  | Assign a value                |
//! | (empty)         | Show changed options          |
//! | `all`           | Show all options              |
//!
//! # Option names
//!
//! | Full name     | Abbrev | Type    | Default    |
//! |---------------|--------|---------|------------|
//! | `number`      | `nu`   | bool    | false      |
//! | `tabstop`     | `ts`   | integer | 2          |
//! | `lineheight`  | `lh`   | number  | 1          |
//! | `gutterwidth` | `gw`   | number  | 16         |
//! | `guifont`     | `gfn`  | font    | `Menlo:13` |
//!
//! Fonts are written `Family:size` or `Family:hsize`. An underscore in the
//! family stands for a space, since directives are split on whitespace.

use quill_text::{AttributedCache, Font, StorageChange};

use crate::error::ConfigError;
use crate::metrics::{Invalidation, LayoutConfig, LayoutMetrics};

/// A parsed `:set` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `option`: enable a boolean option.
    On(String),

    /// `nooption`: disable a boolean option.
    Off(String),

    /// `option!`: toggle a boolean option.
    Toggle(String),

    /// `option?`: query the current value.
    Query(String),

    /// `option=value`: assign a value.
    Assign(String, String),

    /// No arguments: show changed options.
    ShowChanged,

    /// `all`: show all options.
    ShowAll,
}

/// What applying a directive did.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// A layout option was set.
    Layout(Invalidation),
    /// The font was set; `None` when there was no content to re-attribute.
    Storage(Option<StorageChange>),
    /// A query; the text to show.
    Report(String),
}

// ---------------------------------------------------------------------------
// Option names
// ---------------------------------------------------------------------------

/// Full name for a known option or abbreviation.
#[must_use]
pub fn canonical_name(name: &str) -> Option<&'static str> {
    Some(match name {
        "number" | "nu" => "number",
        "tabstop" | "ts" => "tabstop",
        "lineheight" | "lh" => "lineheight",
        "gutterwidth" | "gw" => "gutterwidth",
        "guifont" | "gfn" => "guifont",
        _ => return None,
    })
}

/// Returns `true` if `name` is a known boolean option.
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    canonical_name(name) == Some("number")
}

/// Returns `true` if `name` is a known option that takes a value.
#[must_use]
pub fn is_valued_option(name: &str) -> bool {
    canonical_name(name).is_some() && !is_bool_option(name)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a whole `:set` argument string. Arguments are separated by
/// whitespace; an empty string is [`SetDirective::ShowChanged`].
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single `:set` argument.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }

    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }

    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }

    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }

    // `number` starts with "no", so only strip it when what remains is a
    // boolean option.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }

    // A bare valued option shows its value.
    if is_valued_option(arg) {
        return SetDirective::Query(arg.to_string());
    }

    SetDirective::On(arg.to_string())
}

/// Parse `Family:size` or `Family:hsize`.
///
/// # Errors
///
/// [`ConfigError::InvalidValue`] when the size is missing, not a number,
/// or not positive.
pub fn parse_font(value: &str) -> Result<Font, ConfigError> {
    let invalid = || ConfigError::invalid("guifont", value);
    let (family, size) = value.rsplit_once(':').ok_or_else(invalid)?;
    let size = size.strip_prefix('h').unwrap_or(size);
    let size: f32 = size.parse().map_err(|_| invalid())?;
    if family.is_empty() || !size.is_finite() || size <= 0.0 {
        return Err(invalid());
    }
    Ok(Font::new(&family.replace('_', " "), size))
}

/// `"name"` when true, `"noname"` when false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Applying
// ---------------------------------------------------------------------------

/// Apply one directive.
///
/// # Errors
///
/// A [`ConfigError`] for unknown options, bad values, or boolean-only
/// forms used on valued options. Nothing changes on error.
pub fn apply(
    directive: &SetDirective,
    metrics: &mut LayoutMetrics,
    cache: &mut AttributedCache,
) -> Result<Applied, ConfigError> {
    match directive {
        SetDirective::On(name) => set_bool(name, metrics, |_| true),
        SetDirective::Off(name) => set_bool(name, metrics, |_| false),
        SetDirective::Toggle(name) => set_bool(name, metrics, |on| !on),
        SetDirective::Query(name) => {
            let name = known(name)?;
            Ok(Applied::Report(show(name, metrics, cache)))
        }
        SetDirective::Assign(name, value) => assign(known(name)?, value, metrics, cache),
        SetDirective::ShowChanged => Ok(Applied::Report(show_many(metrics, cache, true))),
        SetDirective::ShowAll => Ok(Applied::Report(show_many(metrics, cache, false))),
    }
}

/// Parse and apply every directive in `args`, stopping at the first error.
///
/// # Errors
///
/// The first directive's [`ConfigError`]. Directives before it stay applied.
pub fn apply_all(
    args: &str,
    metrics: &mut LayoutMetrics,
    cache: &mut AttributedCache,
) -> Result<Vec<Applied>, ConfigError> {
    parse_set(args)
        .iter()
        .map(|d| apply(d, metrics, cache))
        .collect()
}

fn known(name: &str) -> Result<&'static str, ConfigError> {
    canonical_name(name).ok_or_else(|| ConfigError::UnknownOption(name.to_string()))
}

fn set_bool(
    name: &str,
    metrics: &mut LayoutMetrics,
    value: impl FnOnce(bool) -> bool,
) -> Result<Applied, ConfigError> {
    match known(name)? {
        "number" => {
            let on = value(metrics.config().gutter_enabled);
            Ok(Applied::Layout(metrics.set_gutter_enabled(on)))
        }
        other => Err(ConfigError::NotBoolean(other.to_string())),
    }
}

fn assign(
    name: &'static str,
    value: &str,
    metrics: &mut LayoutMetrics,
    cache: &mut AttributedCache,
) -> Result<Applied, ConfigError> {
    let invalid = || ConfigError::invalid(name, value);
    match name {
        "tabstop" => {
            let width = value.parse().map_err(|_| invalid())?;
            Ok(Applied::Layout(metrics.set_tab_width(width)?))
        }
        "lineheight" => {
            let multiplier = value.parse().map_err(|_| invalid())?;
            Ok(Applied::Layout(metrics.set_line_height_multiplier(multiplier)?))
        }
        "gutterwidth" => {
            let width = value.parse().map_err(|_| invalid())?;
            Ok(Applied::Layout(metrics.set_gutter_width(width)?))
        }
        "guifont" => {
            let font = parse_font(value)?;
            Ok(Applied::Storage(cache.set_font(font)?))
        }
        _ => Err(invalid()),
    }
}

fn show(name: &str, metrics: &LayoutMetrics, cache: &AttributedCache) -> String {
    let config = metrics.config();
    match name {
        "number" => format_bool(name, config.gutter_enabled),
        "tabstop" => format!("{name}={}", config.tab_width),
        "lineheight" => format!("{name}={}", config.line_height_multiplier),
        "gutterwidth" => format!("{name}={}", config.gutter_width),
        _ => format!("{name}={}", cache.font()),
    }
}

fn show_many(metrics: &LayoutMetrics, cache: &AttributedCache, changed_only: bool) -> String {
    let config = metrics.config();
    let defaults = LayoutConfig::default();
    let changed = [
        ("number", config.gutter_enabled != defaults.gutter_enabled),
        ("tabstop", config.tab_width != defaults.tab_width),
        (
            "lineheight",
            (config.line_height_multiplier - defaults.line_height_multiplier).abs() > f32::EPSILON,
        ),
        (
            "gutterwidth",
            (config.gutter_width - defaults.gutter_width).abs() > f32::EPSILON,
        ),
        ("guifont", *cache.font() != Font::default()),
    ];
    changed
        .iter()
        .filter(|(_, differs)| !changed_only || *differs)
        .map(|(name, _)| show(name, metrics, cache))
        .collect::<Vec<_>>()
        .join("  ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
