//! Genealogy transformer — parsed records to memorial candidates.
//!
//! A pure second pass over [`ParsedGedcom`]: builds id-keyed maps, infers
//! spouse/child/parent edges per individual, normalises event dates, and
//! splits the candidate set into deceased (importable) and living
//! (excluded). Dangling references degrade to "fewer relationships", never
//! to a failure.

use std::collections::HashMap;

use memoria_core::candidate::{Candidate, RelationKind, RelationshipEdge};

use crate::{
  date::normalize_date,
  parse::{EventDetail, GedcomFamily, GedcomIndividual, ParsedGedcom},
};

/// The result of transforming a parsed file.
///
/// `memorials` holds only the deceased subset; the living are counted but
/// never returned (they remain resolvable as relationship targets).
#[derive(Debug, Clone)]
pub struct TransformOutcome {
  pub total:     u32,
  pub deceased:  u32,
  pub living:    u32,
  pub families:  u32,
  pub memorials: Vec<Candidate>,
}

fn event_date(event: Option<&EventDetail>) -> Option<chrono::NaiveDate> {
  event.and_then(|e| e.date.as_deref()).and_then(normalize_date)
}

fn event_place(event: Option<&EventDetail>) -> Option<String> {
  event.and_then(|e| e.place.clone())
}

/// Resolve the partner on the other side of a family, keyed off the
/// individual's own `SEX` tag: a male's spouse is the family's wife,
/// everyone else (female, unknown) gets the husband. Same-sex couples and
/// sexless records resolve wrong under this rule; GEDCOM 5.5 families carry
/// no better signal than the HUSB/WIFE slots.
fn spouse_of<'a>(
  individual: &GedcomIndividual,
  family: &'a GedcomFamily,
) -> Option<&'a str> {
  if individual.sex.as_deref() == Some("M") {
    family.wife.as_deref()
  } else {
    family.husband.as_deref()
  }
}

fn infer_relationships(
  individual: &GedcomIndividual,
  individuals: &HashMap<&str, &GedcomIndividual>,
  families: &HashMap<&str, &GedcomFamily>,
) -> Vec<RelationshipEdge> {
  let mut edges = Vec::new();

  // Families where this individual is a spouse: emit the partner (when it
  // resolves) and every child of the family.
  for family_id in &individual.spouse_families {
    let Some(family) = families.get(family_id.as_str()) else {
      continue;
    };

    if let Some(spouse_id) = spouse_of(individual, family)
      && let Some(spouse) = individuals.get(spouse_id)
    {
      edges.push(RelationshipEdge {
        kind:        RelationKind::Spouse,
        label:       None,
        target_id:   spouse.id.clone(),
        target_name: spouse.name.clone(),
      });
    }

    for child_id in &family.children {
      if let Some(child) = individuals.get(child_id.as_str()) {
        edges.push(RelationshipEdge {
          kind:        RelationKind::Child,
          label:       None,
          target_id:   child.id.clone(),
          target_name: child.name.clone(),
        });
      }
    }
  }

  // The family where this individual is a child: parents, labelled.
  if let Some(family_id) = &individual.child_of_family
    && let Some(family) = families.get(family_id.as_str())
  {
    if let Some(father) = family.husband.as_deref().and_then(|id| individuals.get(id))
    {
      edges.push(RelationshipEdge {
        kind:        RelationKind::Parent,
        label:       Some("Father".to_string()),
        target_id:   father.id.clone(),
        target_name: father.name.clone(),
      });
    }
    if let Some(mother) = family.wife.as_deref().and_then(|id| individuals.get(id))
    {
      edges.push(RelationshipEdge {
        kind:        RelationKind::Parent,
        label:       Some("Mother".to_string()),
        target_id:   mother.id.clone(),
        target_name: mother.name.clone(),
      });
    }
  }

  edges
}

/// Transform parsed GEDCOM records into memorial candidates.
pub fn transform(parsed: &ParsedGedcom) -> TransformOutcome {
  let individuals: HashMap<&str, &GedcomIndividual> = parsed
    .individuals
    .iter()
    .map(|i| (i.id.as_str(), i))
    .collect();
  let families: HashMap<&str, &GedcomFamily> =
    parsed.families.iter().map(|f| (f.id.as_str(), f)).collect();

  let mut deceased = 0u32;
  let mut living = 0u32;
  let mut memorials = Vec::new();

  for individual in &parsed.individuals {
    let candidate = Candidate {
      source_id:     individual.id.clone(),
      name:          individual.name.clone(),
      sex:           individual.sex.clone(),
      birth_date:    event_date(individual.birth.as_ref()),
      birth_place:   event_place(individual.birth.as_ref()),
      death_date:    event_date(individual.death.as_ref()),
      death_place:   event_place(individual.death.as_ref()),
      burial_place:  event_place(individual.burial.as_ref()),
      relationships: infer_relationships(individual, &individuals, &families),
    };

    if candidate.is_deceased() {
      deceased += 1;
      memorials.push(candidate);
    } else {
      living += 1;
    }
  }

  TransformOutcome {
    total: deceased + living,
    deceased,
    living,
    families: parsed.families.len() as u32,
    memorials,
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
