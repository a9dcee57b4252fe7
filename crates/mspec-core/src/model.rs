//! Run Tree Model: Run → Assembly → Context → Specification
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::error::ReportError;

/// One test execution, across possibly multiple assemblies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub assemblies: Vec<Assembly>,
    #[serde(default)]
    pub meta: Meta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Fixed at construction, copied unchanged into per-assembly runs
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub include_timing_info: bool,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            generated_at: Utc::now(),
            include_timing_info: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    pub name: String,
    /// Path of the compiled test module
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub contexts: Vec<Context>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_failed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_not_implemented: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub specifications: Vec<Specification>,
    #[serde(default)]
    pub contexts: Vec<Context>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    pub name: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_link: Option<NavigationLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_implemented_link: Option<NavigationLink>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Passed,
    Failed,
    NotImplemented,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

/// Cross-reference attached to a failed or not-implemented specification.
///
/// `previous`/`next` point at the neighbouring specification with the same
/// status inside the same assembly, so every per-assembly report stays
/// self-contained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationLink {
    pub assembly_id: String,
    pub context_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Totals by status, used by report headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub not_implemented: usize,
    pub ignored: usize,
    pub duration_ms: u64,
}

impl Summary {
    fn record(&mut self, spec: &Specification) {
        self.total += 1;
        match spec.status {
            Status::Passed => self.passed += 1,
            Status::Failed => self.failed += 1,
            Status::NotImplemented => self.not_implemented += 1,
            Status::Ignored => self.ignored += 1,
        }
        self.duration_ms += spec.duration_ms.unwrap_or(0);
    }

    fn merge(&mut self, other: Summary) {
        self.total += other.total;
        self.passed += other.passed;
        self.failed += other.failed;
        self.not_implemented += other.not_implemented;
        self.ignored += other.ignored;
        self.duration_ms += other.duration_ms;
    }
}

/// A specification borrowed mutably together with its containing context.
pub struct SpecSlot<'a> {
    pub context_id: Option<&'a str>,
    pub context_name: &'a str,
    pub spec: &'a mut Specification,
}

impl Run {
    pub fn new(assemblies: Vec<Assembly>) -> Self {
        Self::with_generated_at(assemblies, Utc::now())
    }

    pub fn with_generated_at(assemblies: Vec<Assembly>, generated_at: DateTime<Utc>) -> Self {
        Self {
            assemblies,
            meta: Meta {
                generated_at,
                include_timing_info: false,
            },
        }
    }

    /// Parse a run produced by an execution engine.
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        serde_json::from_str(json).map_err(|e| ReportError::MalformedTree(e.to_string()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReportError> {
        serde_json::from_reader(reader).map_err(|e| ReportError::MalformedTree(e.to_string()))
    }

    /// One single-assembly run per assembly, each carrying this run's meta.
    pub fn split_by_assembly(&self) -> Vec<Run> {
        self.assemblies
            .iter()
            .map(|assembly| Run {
                assemblies: vec![assembly.clone()],
                meta: self.meta.clone(),
            })
            .collect()
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for assembly in &self.assemblies {
            summary.merge(assembly.summary());
        }
        summary
    }
}

impl Assembly {
    pub fn new(name: impl Into<String>, contexts: Vec<Context>) -> Self {
        Self {
            name: name.into(),
            location: None,
            contexts,
            id: None,
            first_failed: None,
            first_not_implemented: None,
        }
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for context in &self.contexts {
            summary.merge(context.summary());
        }
        summary
    }

    /// Every specification of this assembly in traversal order.
    pub fn specifications_mut(&mut self) -> Vec<SpecSlot<'_>> {
        let mut slots = Vec::new();
        for context in &mut self.contexts {
            collect_slots(context, &mut slots);
        }
        slots
    }
}

fn collect_slots<'a>(context: &'a mut Context, slots: &mut Vec<SpecSlot<'a>>) {
    let Context {
        name,
        specifications,
        contexts,
        id,
        ..
    } = context;

    let id: &'a Option<String> = id;
    let name: &'a String = name;
    for spec in specifications.iter_mut() {
        slots.push(SpecSlot {
            context_id: id.as_deref(),
            context_name: name.as_str(),
            spec,
        });
    }
    for child in contexts.iter_mut() {
        collect_slots(child, slots);
    }
}

impl Context {
    pub fn new(name: impl Into<String>, specifications: Vec<Specification>) -> Self {
        Self {
            name: name.into(),
            subject: None,
            specifications,
            contexts: Vec::new(),
            id: None,
        }
    }

    pub fn with_contexts(mut self, contexts: Vec<Context>) -> Self {
        self.contexts = contexts;
        self
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for spec in &self.specifications {
            summary.record(spec);
        }
        for child in &self.contexts {
            summary.merge(child.summary());
        }
        summary
    }
}

impl Specification {
    pub fn new(name: impl Into<String>, status: Status) -> Self {
        Self {
            name: name.into(),
            status,
            duration_ms: None,
            failure: None,
            id: None,
            failure_link: None,
            not_implemented_link: None,
        }
    }

    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut spec = Self::new(name, Status::Failed);
        spec.failure = Some(Failure {
            message: message.into(),
            stack_trace: None,
        });
        spec
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_run() -> Run {
        Run::with_generated_at(
            vec![
                Assembly::new(
                    "Billing.Specs",
                    vec![Context::new(
                        "when charging a card",
                        vec![
                            Specification::new("should debit", Status::Passed).with_duration(12),
                            Specification::failed("should email", "smtp down").with_duration(30),
                        ],
                    )
                    .with_contexts(vec![Context::new(
                        "and the card is expired",
                        vec![Specification::new("should decline", Status::NotImplemented)],
                    )])],
                ),
                Assembly::new(
                    "Catalog.Specs",
                    vec![Context::new(
                        "when listing",
                        vec![Specification::new("should page", Status::Ignored)],
                    )],
                ),
            ],
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_summary_counts_nested_contexts() {
        let summary = sample_run().summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.not_implemented, 1);
        assert_eq!(summary.ignored, 1);
        assert_eq!(summary.duration_ms, 42);
    }

    #[test]
    fn test_split_keeps_meta() {
        let mut run = sample_run();
        run.meta.include_timing_info = true;

        let parts = run.split_by_assembly();
        assert_eq!(parts.len(), 2);
        for (part, assembly) in parts.iter().zip(&run.assemblies) {
            assert_eq!(part.assemblies, vec![assembly.clone()]);
            assert_eq!(part.meta, run.meta);
        }
    }

    #[test]
    fn test_specifications_mut_traversal_order() {
        let mut run = sample_run();
        let names: Vec<(String, String)> = run.assemblies[0]
            .specifications_mut()
            .into_iter()
            .map(|slot| (slot.context_name.to_string(), slot.spec.name.clone()))
            .collect();

        assert_eq!(
            names,
            vec![
                ("when charging a card".to_string(), "should debit".to_string()),
                ("when charging a card".to_string(), "should email".to_string()),
                ("and the card is expired".to_string(), "should decline".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_json() {
        let run = Run::from_json(
            r#"{
                "assemblies": [{
                    "name": "SampleTests",
                    "contexts": [{
                        "name": "when adding",
                        "specifications": [
                            { "name": "should sum", "status": "passed", "duration_ms": 3 },
                            { "name": "should carry", "status": "not_implemented" }
                        ]
                    }]
                }],
                "meta": { "generated_at": "2024-01-15T10:30:00Z" }
            }"#,
        )
        .unwrap();

        assert_eq!(run.assemblies[0].name, "SampleTests");
        assert_eq!(run.summary().not_implemented, 1);
        assert!(!run.meta.include_timing_info);
    }

    #[test]
    fn test_from_json_rejects_null_specification() {
        let err = Run::from_json(
            r#"{ "assemblies": [{ "name": "A", "contexts": [{ "name": "c", "specifications": [null] }] }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::MalformedTree(_)));
    }
}
