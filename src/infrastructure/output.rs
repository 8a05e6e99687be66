use crate::domain::entities::ResponseSummary;
use colored::{Color, Colorize};
use hyper::StatusCode;
use std::fmt::Write;

const BANNER: &str = "===== HTTP Response =====";
const PREVIEW_LIMIT: usize = 500;

/// Visual emphasis class for a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Warning,
    Error,
}

impl From<StatusCode> for StatusClass {
    fn from(status: StatusCode) -> Self {
        match status.as_u16() {
            400..=499 => StatusClass::Warning,
            code if code >= 500 => StatusClass::Error,
            _ => StatusClass::Success,
        }
    }
}

/// Colours used by the report, or none at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    enabled: bool,
}

impl Theme {
    pub fn colored() -> Self {
        Self { enabled: true }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn banner(&self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    fn label(&self, text: &str) -> String {
        self.paint(text, Color::Cyan)
    }

    fn status(&self, text: &str, class: StatusClass) -> String {
        let color = match class {
            StatusClass::Success => Color::Green,
            StatusClass::Warning => Color::Yellow,
            StatusClass::Error => Color::Red,
        };
        self.paint(text, color)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::colored()
    }
}

/// Formats a [`ResponseSummary`] as a human-readable report
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryRenderer {
    theme: Theme,
}

impl SummaryRenderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn render(&self, summary: &ResponseSummary) -> String {
        let theme = &self.theme;
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}", theme.banner(BANNER));
        let _ = writeln!(out, "{}        {}", theme.label("Method:"), summary.method);
        let _ = writeln!(out, "{}           {}", theme.label("URL:"), summary.url);
        let status = summary.status.as_u16().to_string();
        let _ = writeln!(
            out,
            "{}   {}",
            theme.label("Status Code:"),
            theme.status(&status, StatusClass::from(summary.status))
        );
        let _ = writeln!(out, "{}      {:?}", theme.label("Duration:"), summary.duration);
        let _ = writeln!(
            out,
            "{}          {} bytes",
            theme.label("Size:"),
            summary.content_length()
        );

        if !summary.headers.is_empty() {
            let _ = writeln!(out, "{}", theme.label("Headers:"));
            for (name, value) in &summary.headers {
                let _ = writeln!(out, "  {name}: {value}");
            }
        }

        if !summary.body.is_empty() {
            let _ = writeln!(out, "{}", theme.label("Body (preview):"));
            let _ = writeln!(out, "{}", Self::body_preview(summary));
        }

        out.push('\n');
        out
    }

    fn body_preview(summary: &ResponseSummary) -> String {
        let is_json = summary
            .content_type()
            .is_some_and(|content_type| content_type.contains("application/json"));
        let text = String::from_utf8_lossy(&summary.body);

        if is_json {
            return serde_json::from_slice::<serde_json::Value>(&summary.body)
                .and_then(|json| serde_json::to_string_pretty(&json))
                .unwrap_or_else(|_| text.into_owned());
        }

        let preview = if text.chars().count() > PREVIEW_LIMIT {
            let head: String = text.chars().take(PREVIEW_LIMIT).collect();
            format!("{head}...")
        } else {
            text.into_owned()
        };
        preview.trim().to_string()
    }
}

/// Writes the rendered report to standard output
pub fn print_summary(summary: &ResponseSummary, theme: Theme) {
    print!("{}", SummaryRenderer::new(theme).render(summary));
}
