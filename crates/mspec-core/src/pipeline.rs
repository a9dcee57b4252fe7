//! Annotation Pipeline: applies the annotators in their fixed order
use crate::annotate::{
    FailedSpecificationLinker, IdentifierAssigner, NotImplementedSpecificationLinker,
    TreeAnnotator,
};
use crate::error::ReportError;
use crate::model::Run;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// What one pass did to the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassRecord {
    pub name: String,
    pub annotated: usize,
    pub latency_ms: u64,
}

pub struct AnnotationPipeline {
    passes: Vec<Box<dyn TreeAnnotator>>,
}

impl AnnotationPipeline {
    /// identifiers → failed links → not-implemented links
    pub fn standard() -> Self {
        Self {
            passes: vec![
                Box::new(IdentifierAssigner),
                Box::new(FailedSpecificationLinker),
                Box::new(NotImplementedSpecificationLinker),
            ],
        }
    }

    /// Append a pass after the standard ones.
    pub fn then(mut self, pass: Box<dyn TreeAnnotator>) -> Self {
        self.passes.push(pass);
        self
    }

    pub fn run(&self, run: &mut Run) -> Result<Vec<PassRecord>, ReportError> {
        let mut records = Vec::with_capacity(self.passes.len());

        for pass in &self.passes {
            let start = Instant::now();
            let annotated = pass.visit(run)?;
            let latency_ms = start.elapsed().as_millis() as u64;

            tracing::debug!(pass = pass.name(), annotated, latency_ms, "annotation pass done");
            records.push(PassRecord {
                name: pass.name().to_string(),
                annotated,
                latency_ms,
            });
        }

        Ok(records)
    }

    pub fn pipeline_id(&self) -> String {
        self.passes
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join("→")
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for AnnotationPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Assembly, Context, Specification, Status};

    struct CountContexts;

    impl TreeAnnotator for CountContexts {
        fn name(&self) -> &'static str {
            "count-contexts"
        }

        fn visit(&self, run: &mut Run) -> Result<usize, ReportError> {
            let missing = run
                .assemblies
                .iter()
                .flat_map(|a| &a.contexts)
                .filter(|c| c.id.is_none())
                .count();
            if missing > 0 {
                return Err(ReportError::MalformedTree("context without id".to_string()));
            }
            Ok(run.assemblies.iter().map(|a| a.contexts.len()).sum())
        }
    }

    fn run_with_failure() -> Run {
        Run::new(vec![Assembly::new(
            "Auth.Specs",
            vec![Context::new(
                "when logging in",
                vec![
                    Specification::failed("should issue a token", "expired key"),
                    Specification::new("should audit", Status::NotImplemented),
                ],
            )],
        )])
    }

    #[test]
    fn test_standard_order() {
        let pipeline = AnnotationPipeline::standard();
        assert_eq!(pipeline.len(), 3);
        assert_eq!(
            pipeline.pipeline_id(),
            "identifiers→failed-links→not-implemented-links"
        );
    }

    #[test]
    fn test_run_records_each_pass() {
        let mut run = run_with_failure();
        let records = AnnotationPipeline::standard().run(&mut run).unwrap();

        let summary: Vec<(&str, usize)> = records
            .iter()
            .map(|r| (r.name.as_str(), r.annotated))
            .collect();
        assert_eq!(
            summary,
            vec![("identifiers", 4), ("failed-links", 1), ("not-implemented-links", 1)]
        );

        let specs = &run.assemblies[0].contexts[0].specifications;
        assert!(specs[0].failure_link.is_some());
        assert!(specs[1].not_implemented_link.is_some());
    }

    #[test]
    fn test_extra_pass_sees_identifiers() {
        let mut run = run_with_failure();
        let pipeline = AnnotationPipeline::standard().then(Box::new(CountContexts));
        let records = pipeline.run(&mut run).unwrap();
        assert_eq!(records.last().unwrap().annotated, 1);
    }

    #[test]
    fn test_failing_pass_aborts() {
        let mut run = run_with_failure();
        let pipeline = AnnotationPipeline {
            passes: vec![Box::new(CountContexts), Box::new(IdentifierAssigner)],
        };
        assert!(pipeline.run(&mut run).is_err());
        assert!(run.assemblies[0].id.is_none());
    }
}
