//! Memorial identifier generation.
//!
//! A persisted memorial id is `<name-slug>-<suffix>`: the slug comes from
//! the display name, the suffix from the candidate's source-file id (or a
//! random base-36 string when the source id is absent). The collision-retry
//! path derives a fresh suffix from a hash of the source id plus the
//! current timestamp.

use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

const SUFFIX_LEN: usize = 6;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Lowercase, collapse non-alphanumeric runs to a single hyphen, trim
/// leading/trailing hyphens. An empty result slugifies to `unknown`.
pub fn slugify(name: &str) -> String {
  let mut slug = String::with_capacity(name.len());
  let mut pending_hyphen = false;

  for c in name.chars() {
    if c.is_ascii_alphanumeric() {
      if pending_hyphen && !slug.is_empty() {
        slug.push('-');
      }
      pending_hyphen = false;
      slug.push(c.to_ascii_lowercase());
    } else {
      pending_hyphen = true;
    }
  }

  if slug.is_empty() {
    "unknown".to_string()
  } else {
    slug
  }
}

fn random_base36() -> String {
  let mut out = String::with_capacity(SUFFIX_LEN);
  for _ in 0..SUFFIX_LEN {
    let i = (OsRng.next_u32() as usize) % BASE36.len();
    out.push(BASE36[i] as char);
  }
  out
}

fn suffix_from_source(source_id: &str) -> Option<String> {
  let stripped: String = source_id
    .chars()
    .filter(|c| *c != '@')
    .map(|c| c.to_ascii_lowercase())
    .collect();
  if stripped.is_empty() {
    None
  } else {
    Some(stripped.chars().take(SUFFIX_LEN).collect())
  }
}

/// Derive the initial memorial id for a candidate.
pub fn memorial_id_for(name: &str, source_id: &str) -> String {
  let suffix =
    suffix_from_source(source_id).unwrap_or_else(random_base36);
  format!("{}-{}", slugify(name), suffix)
}

/// Derive the one-shot retry id after a collision: same slug, suffix taken
/// from a hash of the source id and the current timestamp.
pub fn retry_memorial_id(
  name: &str,
  source_id: &str,
  timestamp_millis: i64,
) -> String {
  let digest = Sha256::digest(format!("{source_id}{timestamp_millis}"));
  let suffix = &hex::encode(digest)[..SUFFIX_LEN];
  format!("{}-{}", slugify(name), suffix)
}
