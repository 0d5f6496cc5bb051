//! GEDCOM codec for Memoria.
//!
//! Converts a raw GEDCOM file into [`memoria_core`] memorial candidates in
//! two stages. Pure synchronous; no HTTP or database dependencies.
//!
//! Pipeline:
//!   raw &str
//!     └─ parse()       → ParsedGedcom (individuals + families)
//!          └─ transform() → TransformOutcome (deceased candidates with
//!                           inferred relationships)
//!
//! # Quick start
//!
//! ```no_run
//! let text = "0 @I1@ INDI\n1 NAME John /Smith/\n1 DEAT\n2 DATE 1995\n";
//! let parsed = memoria_gedcom::parse(text);
//! let outcome = memoria_gedcom::transform(&parsed);
//! println!("{} deceased of {}", outcome.deceased, outcome.total);
//! ```

mod date;
mod parse;
mod transform;

pub use date::normalize_date;
pub use parse::{EventDetail, GedcomFamily, GedcomIndividual, ParsedGedcom};
pub use transform::{TransformOutcome, transform};

/// Parse raw GEDCOM text into individual and family records.
///
/// Never fails: malformed or unrecognised lines are skipped, and the result
/// may be empty. No GEDCOM version or charset validation is performed.
pub fn parse(text: &str) -> ParsedGedcom {
  parse::parse(text)
}
