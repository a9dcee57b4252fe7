//! Report Generator: annotates a run and dispatches it to one or many files
use mspec_core::{AnnotationPipeline, PassRecord, Renderer, ReportError, Run};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{GeneratorConfig, UnclassifiedPathPolicy};
use crate::fs::FileSystemGateway;
use crate::naming::{self, RESOURCE_DIR_NAME};

/// How the configured output path was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// One report per assembly inside this directory
    Directory(PathBuf),
    /// The whole run in this file
    File(PathBuf),
    /// Neither; nothing was written
    Unclassified(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub target: OutputTarget,
    pub resource_dir: Option<PathBuf>,
    /// Written reports, in assembly order
    pub reports: Vec<PathBuf>,
    pub passes: Vec<PassRecord>,
}

pub struct ReportGenerator<F, R> {
    output_path: PathBuf,
    include_timing_info: bool,
    unclassified_path: UnclassifiedPathPolicy,
    fs: F,
    renderer: R,
    pipeline: AnnotationPipeline,
}

impl<F: FileSystemGateway, R: Renderer> ReportGenerator<F, R> {
    pub fn new(config: &GeneratorConfig, fs: F, renderer: R) -> Self {
        Self {
            output_path: config.output_path.clone(),
            include_timing_info: config.include_timing_info,
            unclassified_path: config.unclassified_path,
            fs,
            renderer,
            pipeline: AnnotationPipeline::standard(),
        }
    }

    /// Replace the pipeline, e.g. one extended with [`AnnotationPipeline::then`].
    pub fn with_pipeline(mut self, pipeline: AnnotationPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Annotate `run` in place and write its report(s).
    pub fn generate_report(&self, run: &mut Run) -> Result<ReportOutcome, ReportError> {
        run.meta.include_timing_info = self.include_timing_info;
        let passes = self.pipeline.run(run)?;
        let path = self.output_path.as_path();

        let outcome = if self.fs.is_valid_directory_path(path) {
            let planned = naming::plan_directory_reports(path, run)?;
            let resource_dir = self.create_resource_directory_in(path)?;

            let mut reports = Vec::with_capacity(planned.len());
            for (assembly_run, report_path) in run.split_by_assembly().iter().zip(planned) {
                self.write_report(assembly_run, &report_path)?;
                reports.push(report_path);
            }

            ReportOutcome {
                target: OutputTarget::Directory(path.to_path_buf()),
                resource_dir: Some(resource_dir),
                reports,
                passes,
            }
        } else if self.fs.is_valid_file_path(path) {
            naming::check_file_target(path)?;
            let resource_dir = self.create_resource_directory_in(&naming::parent_dir(path))?;
            self.write_report(run, path)?;

            ReportOutcome {
                target: OutputTarget::File(path.to_path_buf()),
                resource_dir: Some(resource_dir),
                reports: vec![path.to_path_buf()],
                passes,
            }
        } else {
            match self.unclassified_path {
                UnclassifiedPathPolicy::Error => {
                    return Err(ReportError::UnclassifiedPath(path.to_path_buf()))
                }
                UnclassifiedPathPolicy::Ignore => {
                    tracing::warn!(
                        path = %path.display(),
                        "output path is neither a directory nor a file, no report written"
                    );
                    ReportOutcome {
                        target: OutputTarget::Unclassified(path.to_path_buf()),
                        resource_dir: None,
                        reports: Vec::new(),
                        passes,
                    }
                }
            }
        };

        tracing::info!(
            target_path = %path.display(),
            reports = outcome.reports.len(),
            "report generation finished"
        );
        Ok(outcome)
    }

    fn create_resource_directory_in(&self, directory: &Path) -> Result<PathBuf, ReportError> {
        let resource_dir = directory.join(RESOURCE_DIR_NAME);
        self.fs
            .create_or_overwrite_directory(&resource_dir)
            .map_err(|e| ReportError::io(&resource_dir, e))?;

        for resource in self.renderer.resources() {
            let target = resource_dir.join(&resource.name);
            let mut stream = self
                .fs
                .open_write_stream(&target)
                .map_err(|e| ReportError::io(&target, e))?;
            stream
                .write_all(&resource.contents)
                .and_then(|_| stream.flush())
                .map_err(|e| ReportError::io(&target, e))?;
        }

        Ok(resource_dir)
    }

    /// Overwrites any existing file; the stream is dropped on every path.
    fn write_report(&self, run: &Run, path: &Path) -> Result<(), ReportError> {
        self.fs
            .delete_file_if_exists(path)
            .map_err(|e| ReportError::io(path, e))?;

        let mut stream = self
            .fs
            .open_write_stream(path)
            .map_err(|e| ReportError::io(path, e))?;
        self.renderer.render(run, &mut *stream)?;
        stream.flush().map_err(|e| ReportError::io(path, e))?;

        tracing::debug!(path = %path.display(), assemblies = run.assemblies.len(), "report written");
        Ok(())
    }
}
