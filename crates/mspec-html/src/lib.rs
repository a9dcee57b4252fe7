//! MSpec HTML: handlebars backend for specification reports
//!
//! This crate renders an annotated [`Run`] into a self-contained HTML
//! document. Anchors use the identifiers assigned by the annotation
//! pipeline, and failure/not-implemented navigation links become `#spec-n`
//! hrefs.
//!
//! # Example
//!
//! ```ignore
//! use mspec_core::{AnnotationPipeline, Renderer, Run};
//! use mspec_html::HtmlRenderer;
//!
//! let mut run = Run::from_json(&json)?;
//! AnnotationPipeline::standard().run(&mut run)?;
//!
//! let renderer = HtmlRenderer::bundled()?;
//! let mut out = Vec::new();
//! renderer.render(&run, &mut out)?;
//! ```

pub mod renderer;
pub mod templates;

use mspec_core::{Assembly, Context, Renderer, ReportError, Resource, Run, Summary};
use once_cell::sync::Lazy;
use renderer::TemplateRenderer;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use templates::{TemplatesFile, REPORT_TEMPLATE};

static STYLE_CSS: Lazy<Vec<u8>> = Lazy::new(|| include_bytes!("../resources/style.css").to_vec());

/// Title used when a report covers more than one assembly
const COMBINED_TITLE: &str = "Specification Report";

/// Data handed to the templates.
///
/// Timing data is stripped here when the run does not ask for it, so the
/// templates only test for presence.
#[derive(Debug, Serialize)]
pub struct ReportView {
    pub title: String,
    pub generated_at: String,
    pub include_timing_info: bool,
    pub summary: SummaryView,
    pub assemblies: Vec<AssemblyView>,
}

#[derive(Debug, Serialize)]
pub struct AssemblyView {
    #[serde(flatten)]
    pub assembly: Assembly,
    pub summary: SummaryView,
}

#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub not_implemented: usize,
    pub ignored: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

impl SummaryView {
    fn new(summary: Summary, include_timing_info: bool) -> Self {
        SummaryView {
            total: summary.total,
            passed: summary.passed,
            failed: summary.failed,
            not_implemented: summary.not_implemented,
            ignored: summary.ignored,
            elapsed_ms: include_timing_info.then_some(summary.duration_ms),
        }
    }
}

impl ReportView {
    pub fn new(run: &Run) -> Self {
        let timing = run.meta.include_timing_info;
        let title = match run.assemblies.as_slice() {
            [only] => only.name.clone(),
            _ => COMBINED_TITLE.to_string(),
        };

        ReportView {
            title,
            generated_at: run.meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            include_timing_info: timing,
            summary: SummaryView::new(run.summary(), timing),
            assemblies: run
                .assemblies
                .iter()
                .map(|assembly| {
                    let mut assembly = assembly.clone();
                    if !timing {
                        assembly.contexts.iter_mut().for_each(strip_durations);
                    }
                    AssemblyView {
                        summary: SummaryView::new(assembly.summary(), timing),
                        assembly,
                    }
                })
                .collect(),
        }
    }
}

fn strip_durations(context: &mut Context) {
    for spec in &mut context.specifications {
        spec.duration_ms = None;
    }
    context.contexts.iter_mut().for_each(strip_durations);
}

/// Default report backend
pub struct HtmlRenderer {
    templates: TemplateRenderer,
}

impl HtmlRenderer {
    /// Renderer using the templates shipped with this crate
    pub fn bundled() -> Result<Self, ReportError> {
        let templates = TemplatesFile::bundled().map_err(ReportError::Config)?;
        Self::with_templates(templates)
    }

    /// Renderer using a templates YAML file on disk
    pub fn from_templates_path(path: &Path) -> Result<Self, ReportError> {
        let templates = TemplatesFile::load(path).map_err(ReportError::Config)?;
        Self::with_templates(templates)
    }

    pub fn with_templates(templates: TemplatesFile) -> Result<Self, ReportError> {
        let templates = TemplateRenderer::new(templates).map_err(ReportError::Config)?;
        Ok(HtmlRenderer { templates })
    }

    /// Render a run into a string
    pub fn render_string(&self, run: &Run) -> Result<String, ReportError> {
        self.templates
            .render(REPORT_TEMPLATE, &ReportView::new(run))
            .map_err(ReportError::Render)
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, run: &Run, sink: &mut dyn Write) -> Result<(), ReportError> {
        self.templates
            .render_to(REPORT_TEMPLATE, &ReportView::new(run), sink)
            .map_err(ReportError::Render)
    }

    fn resources(&self) -> Vec<Resource> {
        vec![Resource::new("style.css", STYLE_CSS.clone())]
    }
}
