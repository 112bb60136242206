use colored::*;
use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

pub fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS)
}

/// Turns `span` into the scan spinner.
pub fn attach(span: &Span, message: &str) {
    span.pb_set_style(&style());
    span.pb_set_message(message);
}

pub fn report_discovery_progress(span: &Span, count: usize) {
    span.pb_set_message(&format!(
        "Identified {} hosts so far...",
        count.to_string().green().bold()
    ));
}
