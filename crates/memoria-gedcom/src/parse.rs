//! GEDCOM line parser — level-based record assembly.
//!
//! GEDCOM is line-oriented: `LEVEL TAG_OR_XREF [REST]`. A single forward
//! pass assembles top-level `INDI` and `FAM` records, routing level-1 tags
//! onto the open record and level-2 `DATE`/`PLAC` lines into the open
//! event sub-record (`BIRT`, `DEAT`, `BURI`). Anything the scanner does not
//! recognise is skipped; parsing never fails.

use std::collections::HashMap;

// ─── Parsed records ──────────────────────────────────────────────────────────

/// A dated, placed event attached to an individual (birth, death, burial).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDetail {
  /// Raw date value as written in the file; normalised downstream.
  pub date:  Option<String>,
  pub place: Option<String>,
}

/// One `INDI` record. All family references are xref ids with `@` stripped
/// and may dangle; the transformer drops unresolvable references silently.
#[derive(Debug, Clone, Default)]
pub struct GedcomIndividual {
  pub id:             String,
  /// Display name with the surname slashes removed.
  pub name:           String,
  pub given_name:     Option<String>,
  pub surname:        Option<String>,
  pub sex:            Option<String>,
  pub birth:          Option<EventDetail>,
  pub death:          Option<EventDetail>,
  pub burial:         Option<EventDetail>,
  /// The single family in which this individual is a child (`FAMC`).
  pub child_of_family:  Option<String>,
  /// Families in which this individual is a spouse (`FAMS`), in file order.
  pub spouse_families:  Vec<String>,
}

/// One `FAM` record.
#[derive(Debug, Clone, Default)]
pub struct GedcomFamily {
  pub id:       String,
  pub husband:  Option<String>,
  pub wife:     Option<String>,
  pub children: Vec<String>,
}

/// The output of [`parse`]: all recognised top-level records, keyed maps
/// flattened to vectors in first-seen order (last write wins on duplicate
/// ids).
#[derive(Debug, Clone, Default)]
pub struct ParsedGedcom {
  pub individuals: Vec<GedcomIndividual>,
  pub families:    Vec<GedcomFamily>,
}

// ─── Scan state ──────────────────────────────────────────────────────────────

enum OpenRecord {
  Individual(GedcomIndividual),
  Family(GedcomFamily),
}

/// Which level-1 event sub-record is currently receiving level-2 lines.
#[derive(Clone, Copy, PartialEq, Eq)]
enum SubRecord {
  Birth,
  Death,
  Burial,
  Other,
}

// ─── Line splitting ──────────────────────────────────────────────────────────

/// Split one line into `(level, tag_or_xref, rest)`. Returns `None` for
/// lines that do not match the shape.
fn split_line(line: &str) -> Option<(u32, &str, &str)> {
  let line = line.trim();
  let (level_tok, remainder) = line.split_once(char::is_whitespace)?;
  let level: u32 = level_tok.parse().ok()?;
  match remainder.trim_start().split_once(char::is_whitespace) {
    Some((tag, rest)) => Some((level, tag, rest.trim())),
    None => Some((level, remainder.trim(), "")),
  }
}

/// Strip the `@` delimiters from an xref id (`@I1@` → `I1`).
fn strip_xref(s: &str) -> &str {
  s.trim_matches('@')
}

/// Split a GEDCOM `NAME` value: `given /surname/ suffix`. Without slashes
/// the whole value is the display name.
fn split_name(value: &str) -> (String, Option<String>, Option<String>) {
  let Some(open) = value.find('/') else {
    return (value.trim().to_string(), None, None);
  };
  let given = value[..open].trim();
  let after = &value[open + 1..];
  let (surname, suffix) = match after.find('/') {
    Some(close) => (after[..close].trim(), after[close + 1..].trim()),
    None => (after.trim(), ""),
  };

  let mut display_parts: Vec<&str> = Vec::new();
  for part in [given, surname, suffix] {
    if !part.is_empty() {
      display_parts.push(part);
    }
  }
  let display = display_parts.join(" ");

  let non_empty = |s: &str| {
    if s.is_empty() { None } else { Some(s.to_string()) }
  };
  (display, non_empty(given), non_empty(surname))
}

// ─── Parser ──────────────────────────────────────────────────────────────────

/// Parse raw GEDCOM text. See the crate docs for the contract; this function
/// always returns, possibly with empty record sets.
pub(crate) fn parse(text: &str) -> ParsedGedcom {
  // Keyed accumulation: duplicate ids overwrite (last write wins), order of
  // first appearance is preserved for the output vectors.
  let mut individuals: HashMap<String, GedcomIndividual> = HashMap::new();
  let mut families: HashMap<String, GedcomFamily> = HashMap::new();
  let mut individual_order: Vec<String> = Vec::new();
  let mut family_order: Vec<String> = Vec::new();

  let mut open: Option<OpenRecord> = None;
  let mut sub_record = SubRecord::Other;

  let mut flush = |record: Option<OpenRecord>| match record {
    Some(OpenRecord::Individual(indi)) => {
      if !individuals.contains_key(&indi.id) {
        individual_order.push(indi.id.clone());
      }
      individuals.insert(indi.id.clone(), indi);
    }
    Some(OpenRecord::Family(fam)) => {
      if !families.contains_key(&fam.id) {
        family_order.push(fam.id.clone());
      }
      families.insert(fam.id.clone(), fam);
    }
    None => {}
  };

  for raw_line in text.lines() {
    let Some((level, tag, rest)) = split_line(raw_line) else {
      continue;
    };

    match level {
      0 => {
        flush(open.take());
        sub_record = SubRecord::Other;

        // `0 @ID@ INDI` / `0 @ID@ FAM` opens a record; any other level-0
        // line (HEAD, TRLR, SOUR, …) only closes the previous one.
        if tag.starts_with('@') && tag.ends_with('@') {
          let id = strip_xref(tag).to_string();
          match rest {
            "INDI" => {
              open = Some(OpenRecord::Individual(GedcomIndividual {
                id,
                ..Default::default()
              }));
            }
            "FAM" => {
              open = Some(OpenRecord::Family(GedcomFamily {
                id,
                ..Default::default()
              }));
            }
            _ => {}
          }
        }
      }

      1 => {
        sub_record = SubRecord::Other;
        match open.as_mut() {
          Some(OpenRecord::Individual(indi)) => match tag {
            "NAME" => {
              let (display, given, surname) = split_name(rest);
              indi.name = display;
              indi.given_name = given;
              indi.surname = surname;
            }
            "SEX" => {
              if !rest.is_empty() {
                indi.sex = Some(rest.to_string());
              }
            }
            "BIRT" => {
              indi.birth = Some(EventDetail::default());
              sub_record = SubRecord::Birth;
            }
            "DEAT" => {
              indi.death = Some(EventDetail::default());
              sub_record = SubRecord::Death;
            }
            "BURI" => {
              indi.burial = Some(EventDetail::default());
              sub_record = SubRecord::Burial;
            }
            "FAMC" => {
              indi.child_of_family = Some(strip_xref(rest).to_string());
            }
            "FAMS" => {
              indi.spouse_families.push(strip_xref(rest).to_string());
            }
            _ => {}
          },
          Some(OpenRecord::Family(fam)) => match tag {
            "HUSB" => fam.husband = Some(strip_xref(rest).to_string()),
            "WIFE" => fam.wife = Some(strip_xref(rest).to_string()),
            "CHIL" => fam.children.push(strip_xref(rest).to_string()),
            _ => {}
          },
          None => {}
        }
      }

      2 => {
        // Only DATE/PLAC directly under an open BIRT/DEAT/BURI matter.
        let Some(OpenRecord::Individual(indi)) = open.as_mut() else {
          continue;
        };
        let event = match sub_record {
          SubRecord::Birth => indi.birth.as_mut(),
          SubRecord::Death => indi.death.as_mut(),
          SubRecord::Burial => indi.burial.as_mut(),
          SubRecord::Other => None,
        };
        if let Some(event) = event
          && !rest.is_empty()
        {
          match tag {
            "DATE" => event.date = Some(rest.to_string()),
            "PLAC" => event.place = Some(rest.to_string()),
            _ => {}
          }
        }
      }

      _ => {}
    }
  }

  // End of input flushes exactly as a level-0 boundary would.
  flush(open.take());

  ParsedGedcom {
    individuals: individual_order
      .into_iter()
      .filter_map(|id| individuals.remove(&id))
      .collect(),
    families: family_order
      .into_iter()
      .filter_map(|id| families.remove(&id))
      .collect(),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
