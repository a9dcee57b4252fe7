//! Output naming: report file names and the shared resources directory
use chrono::{DateTime, Utc};
use mspec_core::{ReportError, Run};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Directory holding the static assets next to the reports
pub const RESOURCE_DIR_NAME: &str = "resources";

/// `MMDDYYYY_HHMMSS`
pub const REPORT_TIMESTAMP_FORMAT: &str = "%m%d%Y_%H%M%S";

pub const REPORT_EXTENSION: &str = "html";

/// `{assembly}_{MMDDYYYY_HHMMSS}.html`
pub fn report_file_name(
    assembly_name: &str,
    generated_at: &DateTime<Utc>,
) -> Result<String, ReportError> {
    check_assembly_name(assembly_name)?;
    Ok(format!(
        "{}_{}.{}",
        assembly_name,
        generated_at.format(REPORT_TIMESTAMP_FORMAT),
        REPORT_EXTENSION
    ))
}

/// One report path per assembly, in assembly order.
///
/// Fails before anything is written when a name would escape `dir` or two
/// assemblies would land on the same file.
pub fn plan_directory_reports(dir: &Path, run: &Run) -> Result<Vec<PathBuf>, ReportError> {
    let mut seen = HashSet::new();
    let mut paths = Vec::with_capacity(run.assemblies.len());

    for assembly in &run.assemblies {
        let file_name = report_file_name(&assembly.name, &run.meta.generated_at)?;
        if !seen.insert(file_name.clone()) {
            return Err(ReportError::MalformedTree(format!(
                "two assemblies named '{}' would both write {}",
                assembly.name, file_name
            )));
        }
        paths.push(dir.join(file_name));
    }

    Ok(paths)
}

/// A file report shares its parent with the `resources` directory, so it
/// cannot take that name.
pub fn check_file_target(file: &Path) -> Result<(), ReportError> {
    if file.file_name().map_or(false, |name| name == RESOURCE_DIR_NAME) {
        return Err(ReportError::Config(format!(
            "report file {} collides with the {} directory",
            file.display(),
            RESOURCE_DIR_NAME
        )));
    }
    Ok(())
}

/// Directory a file report lives in; a bare file name lives in the current directory.
pub fn parent_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn check_assembly_name(name: &str) -> Result<(), ReportError> {
    let mut components = Path::new(name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if name.is_empty() || !single_normal || name.contains(['/', '\\']) {
        return Err(ReportError::MalformedTree(format!(
            "assembly name '{}' cannot be used as a file name",
            name
        )));
    }
    Ok(())
}
