//! Offering and planning state transitions.

use tracing::debug;

use crate::domain::document::{
    states, Document, DocumentStats, DocumentType, ProcessRoot, Section, SectionType,
};
use crate::domain::foundation::{AgentId, UnitHash};

use super::{Unit, UnitError};

/// A stored process template document and its tree path.
#[derive(Debug, Clone, Copy)]
pub struct Template<'a> {
    pub path: &'a str,
    pub document: &'a Document,
}

/// Transitions shown to `agent`: none unless they steward the unit and the
/// current document has no empty sections.
pub fn offered_transitions(
    unit: &Unit,
    agent: &AgentId,
    state: &str,
    stats: &DocumentStats,
) -> Vec<String> {
    if !unit.is_steward(agent) || !stats.allows_advance() {
        return Vec::new();
    }
    unit.machine().next_states_from(state).to_vec()
}

/// Validates a transition and builds the document for `new_state`.
///
/// The result is a successor of `current` in the new state, extended with
/// empty copies of the Process sections declared along the new state's
/// template lineage. When a name occurs at several depths, the deepest
/// template wins; sections already on the document are kept as they are.
pub fn plan_advance(
    unit: &Unit,
    agent: &AgentId,
    current: &Document,
    new_state: &str,
    root: &ProcessRoot,
    templates: &[Template<'_>],
) -> Result<Document, UnitError> {
    let from = current.state();
    if !unit.machine().contains_state(from) {
        return Err(UnitError::UnknownState(from.to_string()));
    }
    if !unit.machine().can_transition(from, new_state) {
        return Err(UnitError::IllegalTransition {
            from: from.to_string(),
            to: new_state.to_string(),
        });
    }
    if !unit.is_steward(agent) {
        return Err(UnitError::NotSteward(agent.clone()));
    }
    let stats = current.stats();
    if !stats.allows_advance() {
        return Err(UnitError::EmptySections(stats.empty_sections));
    }

    let mut next = current.successor_in_state(new_state);
    let Some(process_path) = unit.process_path(root, new_state) else {
        return Ok(next);
    };

    let mut picked: Vec<Section> = Vec::new();
    for node in root.template_lineage(&process_path).iter().rev() {
        let Some(template) = templates.iter().find(|t| t.path == node.as_str()) else {
            continue;
        };
        for section in template.document.inheritable_sections(&[SectionType::Process]) {
            let taken = next.get_section(section.name()).is_some()
                || picked.iter().any(|s| s.name() == section.name());
            if !taken {
                picked.push(section.inherited(node, Some(template.document.unit_hash().clone())));
            }
        }
    }
    debug!(
        from = %from,
        to = %new_state,
        process = %process_path,
        sections = picked.len(),
        "picked up process sections"
    );
    next.append_sections(picked)?;
    Ok(next)
}

/// First document of a new unit, in `define`.
///
/// Requirement and Process sections of the parent's current document come
/// first as empty slots sourced from the parent, then the unit's own
/// sections. An own section may not reuse an inherited name.
pub fn initial_document(
    unit_hash: UnitHash,
    parent: Option<Template<'_>>,
    own: Vec<Section>,
) -> Result<Document, UnitError> {
    let mut document = Document::new(unit_hash, DocumentType::Document, states::DEFINE);
    if let Some(parent) = parent {
        let inherited = parent
            .document
            .inheritable_sections(&[SectionType::Requirement, SectionType::Process])
            .into_iter()
            .map(|s| s.inherited(parent.path, Some(parent.document.unit_hash().clone())))
            .collect();
        document.append_sections(inherited)?;
    }
    document.append_sections(own)?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{states, DocumentType};
    use crate::domain::foundation::{DocumentHash, UnitHash};
    use crate::domain::unit::ProcessRef;

    fn agent(name: &str) -> AgentId {
        AgentId::new(name).unwrap()
    }

    fn unit() -> Unit {
        Unit::new("core", "Core")
            .unwrap()
            .with_steward(agent("alice"))
            .with_process(ProcessRef::new("align", "vote"))
            .persisted(UnitHash::new("unit-1").unwrap())
    }

    fn current(state: &str, body: &str) -> Document {
        Document::new(UnitHash::new("unit-1").unwrap(), DocumentType::Document, state)
            .with_sections(vec![Section::markdown("body", body).unwrap()])
            .unwrap()
            .persisted(DocumentHash::new("doc-1").unwrap(), vec![])
    }

    fn process_section(name: &str, content: &str) -> Section {
        Section::new(name, SectionType::Process, "text/markdown")
            .unwrap()
            .with_content(content)
    }

    fn template(sections: Vec<Section>) -> Document {
        Document::new(UnitHash::new("proc-unit").unwrap(), DocumentType::Document, "_alive")
            .with_sections(sections)
            .unwrap()
    }

    #[test]
    fn stewards_see_next_states_when_complete() {
        let stats = current(states::ALIGN, "text").stats();
        assert_eq!(
            offered_transitions(&unit(), &agent("alice"), states::ALIGN, &stats),
            vec!["_alive", "_defunct"]
        );
    }

    #[test]
    fn nothing_offered_to_non_stewards_or_with_empty_sections() {
        let full = current(states::ALIGN, "text").stats();
        let empty = current(states::ALIGN, "").stats();
        assert!(offered_transitions(&unit(), &agent("bob"), states::ALIGN, &full).is_empty());
        assert!(offered_transitions(&unit(), &agent("alice"), states::ALIGN, &empty).is_empty());
    }

    #[test]
    fn advance_picks_up_process_sections() {
        let root = ProcessRoot::default();
        let state_node = template(vec![process_section("rationale", "why?")]);
        let vote_node = template(vec![
            process_section("ballot", "how to vote"),
            Section::markdown("notes", "template prose").unwrap(),
        ]);
        let templates = [
            Template {
                path: "root.proc.align",
                document: &state_node,
            },
            Template {
                path: "root.proc.align.vote",
                document: &vote_node,
            },
        ];

        let next = plan_advance(
            &unit(),
            &agent("alice"),
            &current(states::REFINE, "text"),
            states::ALIGN,
            &root,
            &templates,
        )
        .unwrap();

        assert_eq!(next.state(), "align");
        assert!(next.document_hash().is_none());
        let ballot = next.get_section("ballot").unwrap();
        assert!(ballot.is_empty());
        assert_eq!(ballot.source_path(), "root.proc.align.vote");
        assert_eq!(ballot.source_unit().map(|u| u.as_str()), Some("proc-unit"));
        assert_eq!(
            next.get_section("rationale").unwrap().source_path(),
            "root.proc.align"
        );
        assert!(next.get_section("notes").is_none());
        assert!(next.is_editable("ballot", &root));
        assert!(!next.is_editable("body", &root));
    }

    #[test]
    fn deepest_template_wins_name_clash() {
        let root = ProcessRoot::default();
        let shallow = template(vec![process_section("ballot", "shallow")]);
        let deep = template(vec![process_section("ballot", "deep")]);
        let templates = [
            Template {
                path: "root.proc.align",
                document: &shallow,
            },
            Template {
                path: "root.proc.align.vote",
                document: &deep,
            },
        ];
        let next = plan_advance(
            &unit(),
            &agent("alice"),
            &current(states::REFINE, "text"),
            states::ALIGN,
            &root,
            &templates,
        )
        .unwrap();
        assert_eq!(
            next.get_section("ballot").unwrap().source_path(),
            "root.proc.align.vote"
        );
    }

    #[test]
    fn state_without_process_adds_nothing() {
        let next = plan_advance(
            &unit(),
            &agent("alice"),
            &current(states::ALIGN, "text"),
            states::ALIVE,
            &ProcessRoot::default(),
            &[],
        )
        .unwrap();
        assert_eq!(next.sections().len(), 1);
        assert_eq!(next.state(), "_alive");
    }

    #[test]
    fn rejects_illegal_transition() {
        let err = plan_advance(
            &unit(),
            &agent("alice"),
            &current(states::DEFINE, "text"),
            states::ALIGN,
            &ProcessRoot::default(),
            &[],
        )
        .unwrap_err();
        assert_eq!(
            err,
            UnitError::IllegalTransition {
                from: "define".to_string(),
                to: "align".to_string()
            }
        );
    }

    #[test]
    fn rejects_non_steward() {
        let err = plan_advance(
            &unit(),
            &agent("bob"),
            &current(states::REFINE, "text"),
            states::ALIGN,
            &ProcessRoot::default(),
            &[],
        )
        .unwrap_err();
        assert_eq!(err, UnitError::NotSteward(agent("bob")));
    }

    #[test]
    fn rejects_empty_sections() {
        let err = plan_advance(
            &unit(),
            &agent("alice"),
            &current(states::REFINE, ""),
            states::ALIGN,
            &ProcessRoot::default(),
            &[],
        )
        .unwrap_err();
        assert_eq!(err, UnitError::EmptySections(1));
    }

    #[test]
    fn rejects_state_outside_table() {
        let err = plan_advance(
            &unit(),
            &agent("alice"),
            &current("limbo", "text"),
            states::ALIGN,
            &ProcessRoot::default(),
            &[],
        )
        .unwrap_err();
        assert_eq!(err, UnitError::UnknownState("limbo".to_string()));
    }

    #[test]
    fn initial_document_inherits_parent_requirements() {
        let parent = Document::new(UnitHash::new("unit-0").unwrap(), DocumentType::Document, "_alive")
            .with_sections(vec![
                Section::new("scope", SectionType::Requirement, "text/markdown")
                    .unwrap()
                    .with_content("parent scope"),
                Section::markdown("history", "parent prose").unwrap(),
            ])
            .unwrap();

        let doc = initial_document(
            UnitHash::new("unit-1").unwrap(),
            Some(Template {
                path: "std",
                document: &parent,
            }),
            vec![Section::markdown("body", "").unwrap()],
        )
        .unwrap();

        assert_eq!(doc.state(), "define");
        let names: Vec<&str> = doc.sections().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["scope", "body"]);
        let scope = doc.get_section("scope").unwrap();
        assert!(scope.is_empty());
        assert_eq!(scope.source_path(), "std");
        assert_eq!(scope.source_unit().map(|u| u.as_str()), Some("unit-0"));
    }

    #[test]
    fn initial_document_rejects_name_clash_with_parent() {
        let parent = Document::new(UnitHash::new("unit-0").unwrap(), DocumentType::Document, "_alive")
            .with_sections(vec![Section::new("scope", SectionType::Requirement, "text/markdown").unwrap()])
            .unwrap();
        let err = initial_document(
            UnitHash::new("unit-1").unwrap(),
            Some(Template {
                path: "std",
                document: &parent,
            }),
            vec![Section::markdown("scope", "mine").unwrap()],
        )
        .unwrap_err();
        assert!(matches!(err, UnitError::Document(_)));
    }
}
