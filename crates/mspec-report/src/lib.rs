//! MSpec Report: turns an annotated run into HTML report files
//!
//! The generator classifies the configured output path:
//! a directory gets one `{assembly}_{MMDDYYYY_HHMMSS}.html` per assembly,
//! a file path gets the whole run. Both share a freshly recreated
//! `resources` directory.

pub mod config;
pub mod fs;
pub mod generator;
pub mod naming;

pub use config::{GeneratorConfig, UnclassifiedPathPolicy};
pub use fs::{FileSystemGateway, StdFileSystem};
pub use generator::{OutputTarget, ReportGenerator, ReportOutcome};

use mspec_core::ReportError;
use mspec_html::HtmlRenderer;

/// Generator wired to the real filesystem and the HTML backend.
pub fn default_generator(
    config: &GeneratorConfig,
) -> Result<ReportGenerator<StdFileSystem, HtmlRenderer>, ReportError> {
    let renderer = match &config.templates_path {
        Some(path) => HtmlRenderer::from_templates_path(path)?,
        None => HtmlRenderer::bundled()?,
    };
    Ok(ReportGenerator::new(config, StdFileSystem, renderer))
}
