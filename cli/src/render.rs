//! Plain-text rendering of a form view.

use subscription_runtime::{Indicator, View};

fn indicator_glyph(indicator: Indicator) -> &'static str {
    match indicator {
        Indicator::Send => "[subscribe]",
        Indicator::Spinner => "[ ... ]",
        Indicator::Check => "[  ok  ]",
        Indicator::Cross => "[  !!  ]",
    }
}

/// One line for the input row, plus one for the error text when present.
pub fn render(view: &View) -> String {
    let value = if view.value.is_empty() {
        "Your email..."
    } else {
        view.value.as_str()
    };
    let border = if view.highlight_error() { '!' } else { '|' };
    let mut line = format!(
        "{:<8} {border} {value:<40} {border} {}",
        view.state.as_str(),
        indicator_glyph(view.indicator)
    );
    if view.read_only {
        line.push_str(" (read-only)");
    }
    if !view.error_text.is_empty() {
        line.push_str("\n         ");
        line.push_str(&view.error_text);
    }
    line
}
