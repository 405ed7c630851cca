//! Console report of pending callbacks

use crate::highlight::AnsiHighlighter;
use active_handles::{Descriptor, HostView, Probe, ProbeOptions};
use rustc_hash::FxHashMap;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

const UNKNOWN_LOCATION: &str = "Unknown location";

/// Resolve colour use from the environment: `NO_COLOR` disables it.
pub fn color_choice() -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

/// Write one block per descriptor.
///
/// Each block has the name, location, kind and descriptor number, followed by
/// the highlighted source when `highlight` is set. Source for a location that
/// was already printed is replaced by a running count.
pub fn render<W: WriteColor>(descriptors: &[Descriptor], highlight: bool, out: &mut W) -> io::Result<()> {
    let mut printed: FxHashMap<String, usize> = FxHashMap::default();

    for d in descriptors {
        let location = d
            .location
            .as_ref()
            .map(|l| l.to_string())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

        writeln!(out)?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{}:", d.name)?;
        out.reset()?;
        write!(out, " ")?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Black)).set_intense(true))?;
        write!(out, "{}", location)?;
        out.reset()?;
        write!(out, " ({}", d.kind)?;
        if let Some(fd) = d.file_descriptor {
            write!(out, ", fd = {}", fd)?;
        }
        writeln!(out, ")")?;

        let seen = printed.entry(location).or_insert(0);
        if highlight {
            if *seen > 0 {
                writeln!(out, "Count: {}. Source printed above", *seen + 1)?;
            } else if let Some(source) = &d.highlighted {
                writeln!(out, "{}", source)?;
            }
        }
        *seen += 1;
    }

    out.flush()
}

/// Probe `host` and print the report to stdout.
///
/// Raw source is never collected; highlighted source follows
/// `options.include_highlighted`.
pub fn print<H: HostView + ?Sized>(host: &H, options: &ProbeOptions) -> io::Result<()> {
    let options = ProbeOptions {
        include_source: false,
        ..options.clone()
    };
    let choice = color_choice();
    let highlighter = match choice {
        ColorChoice::Never => AnsiHighlighter::plain(),
        _ => AnsiHighlighter::new(),
    };

    let descriptors = Probe::new(host)
        .with_highlighter(&highlighter)
        .enumerate(&options);
    let mut stdout = StandardStream::stdout(choice);
    render(&descriptors, options.include_highlighted, &mut stdout)
}

/// Machine-readable rendering of descriptors.
pub fn to_json(descriptors: &[Descriptor]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(descriptors)
}
