//! Case-insensitive signal name resolution.
//!
//! Resolution tries three direct lookups (the name as given, fully
//! upper-cased, fully lower-cased) before falling back to a scan over every
//! signal name on the entity. The scan is the only path by which mixed-case
//! names such as `Valid` vs `vALID` resolve, and it is kept separate so
//! callers can turn it off.

use sigbus_sim::Entity;
use tracing::{debug, warn};

/// How a name was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    /// The name as given.
    Exact,
    /// The fully upper-cased name.
    Upper,
    /// The fully lower-cased name.
    Lower,
    /// A case-folded comparison during the exhaustive scan.
    Scan,
}

/// A successful resolution.
#[derive(Clone, Debug)]
pub struct Resolved<H> {
    /// The resolved handle.
    pub handle: H,
    /// The signal name as it exists on the entity.
    pub matched: String,
    /// Which lookup succeeded.
    pub kind: MatchKind,
}

/// Tries the name as given, then upper-cased, then lower-cased.
pub fn probe_case_variants<E: Entity + ?Sized>(
    entity: &E,
    name: &str,
) -> Option<Resolved<E::Handle>> {
    let candidates = [
        (name.to_string(), MatchKind::Exact),
        (name.to_uppercase(), MatchKind::Upper),
        (name.to_lowercase(), MatchKind::Lower),
    ];
    candidates.into_iter().find_map(|(candidate, kind)| {
        entity.lookup(&candidate).map(|handle| Resolved {
            handle,
            matched: candidate,
            kind,
        })
    })
}

/// Scans every signal name on the entity for a case-folded match.
///
/// Some backends (Verilator) are known to misbehave when enumerating
/// signals, so a warning is logged when scanning one of them.
pub fn scan_case_folded<E: Entity + ?Sized>(
    entity: &E,
    name: &str,
) -> Option<Resolved<E::Handle>> {
    if is_verilator(entity.simulator()) {
        warn!(
            entity = entity.name(),
            signal = name,
            "scanning all signal names for a case-insensitive match; this may trigger a known Verilator bug"
        );
    }
    let folded = name.to_lowercase();
    entity
        .signal_names()
        .into_iter()
        .filter(|candidate| candidate.to_lowercase() == folded)
        .find_map(|candidate| {
            entity.lookup(&candidate).map(|handle| Resolved {
                handle,
                matched: candidate,
                kind: MatchKind::Scan,
            })
        })
}

/// Resolves `name` case-insensitively.
///
/// With `scan` false only the three direct lookups are tried.
pub fn resolve_case_insensitive<E: Entity + ?Sized>(
    entity: &E,
    name: &str,
    scan: bool,
) -> Option<Resolved<E::Handle>> {
    let resolved = probe_case_variants(entity, name).or_else(|| {
        if scan {
            scan_case_folded(entity, name)
        } else {
            None
        }
    })?;
    debug!(
        entity = entity.name(),
        signal = name,
        matched = %resolved.matched,
        kind = ?resolved.kind,
        "resolved signal"
    );
    Some(resolved)
}

fn is_verilator(simulator: &str) -> bool {
    simulator.to_lowercase().starts_with("verilator")
}
