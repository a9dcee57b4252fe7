//! Renderer contract: turns an annotated run into a document on a sink
use crate::error::ReportError;
use crate::model::Run;
use std::io::Write;

/// Static asset the rendered documents reference (styles, scripts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// File name inside the resources directory
    pub name: String,
    pub contents: Vec<u8>,
}

impl Resource {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

pub trait Renderer {
    /// Write one complete document for `run`, which is already annotated.
    fn render(&self, run: &Run, sink: &mut dyn Write) -> Result<(), ReportError>;

    /// Assets to place in the resources directory next to the reports.
    fn resources(&self) -> Vec<Resource> {
        Vec::new()
    }
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn render(&self, run: &Run, sink: &mut dyn Write) -> Result<(), ReportError> {
        (**self).render(run, sink)
    }

    fn resources(&self) -> Vec<Resource> {
        (**self).resources()
    }
}
