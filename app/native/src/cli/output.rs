//! CLI output formatting.
//!
//! Renders the probe report either as a colored listing or as highlighted
//! JSON.

use std::io::{self, Write};

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use crate::pip::{Availability, Notification, ProbeTarget, Selector};

/// What `float probe` prints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    pub class_name: String,
    pub framework_path: String,
    pub enabled: bool,
    pub present: bool,
    pub supported_selectors: Vec<Selector>,
    pub missing_selectors: Vec<Selector>,
    pub notifications: Vec<Notification>,
}

impl ProbeReport {
    #[must_use]
    pub fn new(target: &ProbeTarget, availability: &Availability) -> Self {
        let missing_selectors = if availability.is_present() {
            availability.missing_selectors().collect()
        } else {
            Vec::new()
        };

        Self {
            class_name: target.class_name.clone(),
            framework_path: target.framework_path.clone(),
            enabled: target.enabled,
            present: availability.is_present(),
            supported_selectors: availability.supported_selectors().iter().copied().collect(),
            missing_selectors,
            notifications: availability.notifications().iter().copied().collect(),
        }
    }
}

/// Prints the report as a colored listing.
///
/// # Errors
///
/// Returns an error if stdout cannot be written (for example a closed pipe).
pub fn print_report(report: &ProbeReport) -> io::Result<()> {
    writeln!(io::stdout().lock(), "{}", render_report(report))
}

fn render_report(report: &ProbeReport) -> String {
    let mut lines = Vec::new();

    let status = if !report.enabled {
        "disabled".yellow().to_string()
    } else if report.present {
        "available".green().to_string()
    } else {
        "not available".red().to_string()
    };
    lines.push(format!("{} {} {status}", format_bool(report.present), report.class_name.bold()));
    lines.push(format!("  framework: {}", report.framework_path.dimmed()));

    if !report.present {
        return lines.join("\n");
    }

    lines.push(String::new());
    lines.push("Selectors".bold().to_string());
    let mut selectors: Vec<(Selector, bool)> = report
        .supported_selectors
        .iter()
        .map(|selector| (*selector, true))
        .chain(report.missing_selectors.iter().map(|selector| (*selector, false)))
        .collect();
    selectors.sort();
    for (selector, supported) in selectors {
        lines.push(format!("  {} {selector}", format_bool(supported)));
    }

    lines.push(String::new());
    lines.push("Notifications".bold().to_string());
    for notification in Notification::ALL {
        let wired = report.notifications.contains(&notification);
        lines.push(format!("  {} {notification}", format_bool(wired)));
    }

    lines.join("\n")
}

/// Prints JSON with syntax highlighting.
///
/// Keys are cyan, strings green, numbers yellow, booleans and null magenta.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn print_highlighted_json(value: &Value) -> io::Result<()> {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    writeln!(io::stdout().lock(), "{out}")
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => out.push_str(&"null".magenta().to_string()),
        Value::Bool(flag) => out.push_str(&flag.to_string().magenta().to_string()),
        Value::Number(number) => out.push_str(&number.to_string().yellow().to_string()),
        Value::String(text) => out.push_str(&quote(text).green().to_string()),
        Value::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                out.push_str(if i == 0 { "\n" } else { ",\n" });
                indent(out, depth + 1);
                write_value(out, item, depth + 1);
            }
            out.push('\n');
            indent(out, depth);
            out.push(']');
        }
        Value::Object(fields) => {
            if fields.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push('{');
            for (i, (key, item)) in fields.iter().enumerate() {
                out.push_str(if i == 0 { "\n" } else { ",\n" });
                indent(out, depth + 1);
                out.push_str(&quote(key).cyan().to_string());
                out.push_str(": ");
                write_value(out, item, depth + 1);
            }
            out.push('\n');
            indent(out, depth);
            out.push('}');
        }
    }
}

fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""))
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Formats a boolean as a colored check mark.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value { "✓".green().to_string() } else { "✗".red().to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain<T>(f: impl FnOnce() -> T) -> T {
        colored::control::set_override(false);
        f()
    }

    fn present_availability() -> Availability {
        Availability::new(
            true,
            [Selector::Init, Selector::SetDelegate, Selector::PresentAsPictureInPicture],
            [Notification::DidClose],
        )
    }

    #[test]
    fn test_report_lists_missing_selectors_only_when_present() {
        let target = ProbeTarget::default();

        let absent = ProbeReport::new(&target, &Availability::absent());
        assert!(!absent.present);
        assert!(absent.missing_selectors.is_empty());

        let present = ProbeReport::new(&target, &present_availability());
        assert!(present.present);
        assert_eq!(present.supported_selectors.len(), 3);
        assert_eq!(present.missing_selectors.len(), Selector::ALL.len() - 3);
        assert_eq!(present.notifications, vec![Notification::DidClose]);
    }

    #[test]
    fn test_report_serializes_selector_names() {
        let report = ProbeReport::new(&ProbeTarget::default(), &present_availability());
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["className"], "PIPViewController");
        assert_eq!(value["present"], true);
        assert_eq!(value["supportedSelectors"][1], "setDelegate:");
        assert_eq!(value["notifications"][0], "pipDidClose:");
    }

    #[test]
    fn test_render_absent_report() {
        let report = ProbeReport::new(&ProbeTarget::default(), &Availability::absent());
        let text = plain(|| render_report(&report));
        assert!(text.contains("PIPViewController"));
        assert!(text.contains("not available"));
        assert!(!text.contains("Selectors"));
    }

    #[test]
    fn test_render_present_report() {
        let report = ProbeReport::new(&ProbeTarget::default(), &present_availability());
        let text = plain(|| render_report(&report));
        assert!(text.contains("available"));
        assert!(text.contains("✓ setDelegate:"));
        assert!(text.contains("✗ setPlaying:"));
        assert!(text.contains("✓ pipDidClose:"));
        assert!(text.contains("✗ pipWillClose:"));
    }

    #[test]
    fn test_json_rendering_round_trips_without_color() {
        let value = serde_json::json!({ "a": [1, true, null], "b": { "c": "x\"y" }, "d": [] });
        let text = plain(|| {
            let mut out = String::new();
            write_value(&mut out, &value, 0);
            out
        });
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), value);
    }

    #[test]
    fn test_format_bool() {
        assert!(format_bool(true).contains('✓'));
        assert!(format_bool(false).contains('✗'));
    }
}
