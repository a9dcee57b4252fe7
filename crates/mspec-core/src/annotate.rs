//! Annotators: tree passes that enrich a run without restructuring it
//!
//! Traversal order is fixed: assemblies in order, then each context
//! depth-first, a context's own specifications before its nested contexts.
use crate::error::ReportError;
use crate::model::{Assembly, Context, NavigationLink, Run, Specification, Status};

/// Contract shared by every annotation pass.
pub trait TreeAnnotator: Send + Sync {
    /// Short name used in pass records and logs (ex: "identifiers")
    fn name(&self) -> &'static str;

    /// Annotate `run` in place, returning how many nodes were annotated.
    fn visit(&self, run: &mut Run) -> Result<usize, ReportError>;
}

/// Assigns `asm-{n}`, `ctx-{n}` and `spec-{n}` from one shared counter.
#[derive(Debug, Default)]
pub struct IdentifierAssigner;

impl TreeAnnotator for IdentifierAssigner {
    fn name(&self) -> &'static str {
        "identifiers"
    }

    fn visit(&self, run: &mut Run) -> Result<usize, ReportError> {
        let mut counter = IdCounter::default();
        for assembly in &mut run.assemblies {
            assembly.id = Some(counter.next("asm"));
            for context in &mut assembly.contexts {
                assign_context(context, &mut counter);
            }
        }
        Ok(counter.issued)
    }
}

#[derive(Default)]
struct IdCounter {
    issued: usize,
}

impl IdCounter {
    fn next(&mut self, prefix: &str) -> String {
        self.issued += 1;
        format!("{}-{}", prefix, self.issued)
    }
}

fn assign_context(context: &mut Context, counter: &mut IdCounter) {
    context.id = Some(counter.next("ctx"));
    for spec in &mut context.specifications {
        spec.id = Some(counter.next("spec"));
    }
    for child in &mut context.contexts {
        assign_context(child, counter);
    }
}

/// Links every failed specification to its containers and to its
/// neighbouring failures.
#[derive(Debug, Default)]
pub struct FailedSpecificationLinker;

impl TreeAnnotator for FailedSpecificationLinker {
    fn name(&self) -> &'static str {
        "failed-links"
    }

    fn visit(&self, run: &mut Run) -> Result<usize, ReportError> {
        link_by_status(run, Status::Failed, failure_slot, first_failed_slot)
    }
}

/// Same as [`FailedSpecificationLinker`] for not-implemented specifications.
#[derive(Debug, Default)]
pub struct NotImplementedSpecificationLinker;

impl TreeAnnotator for NotImplementedSpecificationLinker {
    fn name(&self) -> &'static str {
        "not-implemented-links"
    }

    fn visit(&self, run: &mut Run) -> Result<usize, ReportError> {
        link_by_status(
            run,
            Status::NotImplemented,
            not_implemented_slot,
            first_not_implemented_slot,
        )
    }
}

type LinkSlot = fn(&mut Specification) -> &mut Option<NavigationLink>;
type EntrySlot = fn(&mut Assembly) -> &mut Option<String>;

fn failure_slot(spec: &mut Specification) -> &mut Option<NavigationLink> {
    &mut spec.failure_link
}

fn not_implemented_slot(spec: &mut Specification) -> &mut Option<NavigationLink> {
    &mut spec.not_implemented_link
}

fn first_failed_slot(assembly: &mut Assembly) -> &mut Option<String> {
    &mut assembly.first_failed
}

fn first_not_implemented_slot(assembly: &mut Assembly) -> &mut Option<String> {
    &mut assembly.first_not_implemented
}

/// Links are scoped to one assembly; identifiers must already be assigned.
fn link_by_status(
    run: &mut Run,
    status: Status,
    slot: LinkSlot,
    entry: EntrySlot,
) -> Result<usize, ReportError> {
    let mut linked = 0;

    for assembly in &mut run.assemblies {
        let assembly_id = assembly
            .id
            .clone()
            .ok_or_else(|| ReportError::missing_id("assembly", &assembly.name))?;

        let mut matching = Vec::new();
        for found in assembly.specifications_mut() {
            if found.spec.status != status {
                continue;
            }
            let spec_id = found
                .spec
                .id
                .clone()
                .ok_or_else(|| ReportError::missing_id("specification", &found.spec.name))?;
            let context_id = found
                .context_id
                .ok_or_else(|| ReportError::missing_id("context", found.context_name))?
                .to_string();
            matching.push((spec_id, context_id, found.spec));
        }

        let ids: Vec<String> = matching.iter().map(|(id, _, _)| id.clone()).collect();
        for (index, (_, context_id, spec)) in matching.into_iter().enumerate() {
            *slot(spec) = Some(NavigationLink {
                assembly_id: assembly_id.clone(),
                context_id,
                previous: index.checked_sub(1).map(|prev| ids[prev].clone()),
                next: ids.get(index + 1).cloned(),
            });
        }

        linked += ids.len();
        *entry(assembly) = ids.into_iter().next();
    }

    Ok(linked)
}
