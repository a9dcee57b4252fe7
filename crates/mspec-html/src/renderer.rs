//! Template rendering for the HTML report.
//!
//! Uses Handlebars with custom helpers:
//! - duration: Format milliseconds (1234 -> "1.234s", 56 -> "56ms")
//! - percent: Share of a total as a percentage
//! - status_label: Human label for a specification status
//! - default: Fallback for missing values

use handlebars::{
    handlebars_helper, Context, Handlebars, Helper, HelperDef, HelperResult, Output,
    RenderContext,
};
use serde::Serialize;
use std::io::Write;

use crate::templates::TemplatesFile;

/// Compiled renderer with registered helpers
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Create a renderer from a templates file; every template is also a partial
    pub fn new(templates: TemplatesFile) -> Result<Self, String> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);

        handlebars.register_helper("duration", Box::new(duration));
        handlebars.register_helper("percent", Box::new(percent));
        handlebars.register_helper("status_label", Box::new(status_label));
        handlebars.register_helper("default", Box::new(DefaultHelper));

        for (name, template) in &templates.templates {
            handlebars
                .register_template_string(name, &template.template)
                .map_err(|e| format!("Template '{}' does not compile: {}", name, e))?;
        }

        Ok(TemplateRenderer { handlebars })
    }

    /// Render a named template into a string
    pub fn render<T: Serialize>(&self, template_name: &str, data: &T) -> Result<String, String> {
        self.handlebars
            .render(template_name, data)
            .map_err(|e| format!("Render error: {}", e))
    }

    /// Render a named template straight into a writer
    pub fn render_to<T: Serialize, W: Write>(
        &self,
        template_name: &str,
        data: &T,
        writer: W,
    ) -> Result<(), String> {
        self.handlebars
            .render_to_write(template_name, data, writer)
            .map_err(|e| format!("Render error: {}", e))
    }
}

// ============================================================================
// Custom Helpers
// ============================================================================

pub fn format_duration(ms: u64) -> String {
    if ms >= 1000 {
        format!("{}.{:03}s", ms / 1000, ms % 1000)
    } else {
        format!("{}ms", ms)
    }
}

handlebars_helper!(duration: |ms: u64| format_duration(ms));

handlebars_helper!(percent: |part: u64, total: u64| {
    if total == 0 {
        "0%".to_string()
    } else {
        format!("{}%", (part as f64 / total as f64 * 100.0).round() as u64)
    }
});

handlebars_helper!(status_label: |status: str| match status {
    "passed" => "passed",
    "failed" => "failed",
    "not_implemented" => "not implemented",
    "ignored" => "ignored",
    _ => "unknown",
});

/// Default value helper
struct DefaultHelper;

impl HelperDef for DefaultHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let value = h.param(0).map(|v| v.value());
        let default = h.param(1).and_then(|v| v.value().as_str()).unwrap_or("");

        match value {
            Some(v) if !v.is_null() => {
                let text = match v.as_str() {
                    Some(s) => s.to_string(),
                    None => v.to_string(),
                };
                out.write(&handlebars::html_escape(&text))?;
            }
            _ => out.write(default)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_templates() -> TemplatesFile {
        TemplatesFile::from_yaml(
            r#"
version: "1.0"
templates:
  report:
    description: Entry point
    template: "{{#each items}}{{> item}}{{/each}}"
  item:
    description: Partial
    template: "[{{status_label status}} {{duration ms}}]"
  share:
    description: Percent
    template: "{{percent part total}}"
  fallback:
    description: Default
    template: "{{default subject \"none\"}}"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(56), "56ms");
        assert_eq!(format_duration(1234), "1.234s");
        assert_eq!(format_duration(60_005), "60.005s");
    }

    #[test]
    fn test_partials_and_helpers() {
        let renderer = TemplateRenderer::new(test_templates()).unwrap();
        let out = renderer
            .render(
                "report",
                &json!({ "items": [
                    { "status": "not_implemented", "ms": 5 },
                    { "status": "passed", "ms": 1500 }
                ]}),
            )
            .unwrap();
        assert_eq!(out, "[not implemented 5ms][passed 1.500s]");
    }

    #[test]
    fn test_percent_helper() {
        let renderer = TemplateRenderer::new(test_templates()).unwrap();
        assert_eq!(renderer.render("share", &json!({ "part": 3, "total": 4 })).unwrap(), "75%");
        assert_eq!(renderer.render("share", &json!({ "part": 0, "total": 0 })).unwrap(), "0%");
    }

    #[test]
    fn test_default_helper() {
        let renderer = TemplateRenderer::new(test_templates()).unwrap();
        assert_eq!(renderer.render("fallback", &json!({})).unwrap(), "none");
        assert_eq!(
            renderer.render("fallback", &json!({ "subject": "<Cart>" })).unwrap(),
            "&lt;Cart&gt;"
        );
    }

    #[test]
    fn test_broken_template_is_rejected() {
        let templates = TemplatesFile::from_yaml(
            r#"
version: "1.0"
templates:
  report:
    description: Unclosed block
    template: "{{#each items}}"
"#,
        )
        .unwrap();
        assert!(TemplateRenderer::new(templates).is_err());
    }
}
