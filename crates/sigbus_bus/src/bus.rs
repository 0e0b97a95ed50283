//! The [`Bus`]: a group of entity signals addressed as one unit.
//!
//! Signals are named `<bus name><separator><signal>` on the entity, e.g. a bus
//! `stream_in` with signals `valid` and `data` binds `stream_in_valid` and
//! `stream_in_data`. A nameless bus binds the bare signal names.

use std::collections::BTreeMap;
use std::fmt;

use sigbus_config::{ResolvedBus, SignalSet, DEFAULT_SEPARATOR};
use sigbus_sim::{AssignmentResult, Entity, SignalHandle, SimError, SimValue};
use tracing::debug;

use crate::capture::Capture;
use crate::error::{BusAction, BusError};
use crate::record::BusRecord;
use crate::resolve::resolve_case_insensitive;

/// How bus signal names are composed and resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusOptions {
    /// Placed between the bus name and each signal name.
    pub separator: String,
    /// Resolve names ignoring case.
    pub case_insensitive: bool,
    /// Element index applied to every resolved signal.
    pub array_index: Option<usize>,
    /// Allow the exhaustive name scan during case-insensitive resolution.
    pub scan_fallback: bool,
}

impl Default for BusOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            case_insensitive: true,
            array_index: None,
            scan_fallback: true,
        }
    }
}

impl BusOptions {
    /// Sets the separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Resolves names exactly as composed.
    pub fn case_sensitive(mut self) -> Self {
        self.case_insensitive = false;
        self
    }

    /// Binds element `index` of every signal.
    pub fn with_array_index(mut self, index: usize) -> Self {
        self.array_index = Some(index);
        self
    }

    /// Disables the exhaustive name scan.
    pub fn without_scan(mut self) -> Self {
        self.scan_fallback = false;
        self
    }
}

impl From<&ResolvedBus> for BusOptions {
    fn from(bus: &ResolvedBus) -> Self {
        Self {
            separator: bus.separator.clone(),
            case_insensitive: bus.case_insensitive,
            array_index: bus.array_index,
            scan_fallback: bus.scan_fallback,
        }
    }
}

/// A named or anonymous group of signals on one entity.
///
/// Every bound attribute was resolved at construction; a bus never gains or
/// loses signals afterwards.
pub struct Bus<E: Entity> {
    entity: E,
    name: Option<String>,
    signals: Vec<(String, E::Handle)>,
}

impl<E: Entity> Bus<E> {
    /// Resolves `signals` and `optional_signals` on `entity`.
    ///
    /// A mandatory signal that cannot be resolved fails construction with
    /// [`BusError::SignalNotFound`] carrying the composed name. A missing
    /// optional signal is skipped.
    pub fn new(
        entity: E,
        name: Option<&str>,
        signals: impl Into<SignalSet>,
        optional_signals: impl Into<SignalSet>,
        options: BusOptions,
    ) -> Result<Self, BusError> {
        let mut bus = Self {
            entity,
            name: name.map(str::to_string),
            signals: Vec::new(),
        };

        let signals: SignalSet = signals.into();
        let optional_signals: SignalSet = optional_signals.into();

        for (attr, signal) in signals.pairs() {
            let full_name = bus.compose(signal, &options.separator);
            bus.add_signal(attr, &full_name, &options)?;
        }

        for (attr, signal) in optional_signals.pairs() {
            let full_name = bus.compose(signal, &options.separator);
            match resolve_case_insensitive(&bus.entity, &full_name, options.scan_fallback) {
                Some(resolved) if options.case_insensitive => {
                    bus.bind(attr, &full_name, resolved.handle, &options)?;
                }
                Some(_) => bus.add_signal(attr, &full_name, &options)?,
                None => debug!(
                    entity = bus.entity.name(),
                    bus = bus.display_name(),
                    signal = %full_name,
                    "ignoring missing optional signal"
                ),
            }
        }

        Ok(bus)
    }

    /// Builds a bus from a resolved `buses.toml` definition.
    pub fn from_config(entity: E, config: &ResolvedBus) -> Result<Self, BusError> {
        Self::new(
            entity,
            config.name.as_deref(),
            config.signals.clone(),
            config.optional_signals.clone(),
            BusOptions::from(config),
        )
    }

    fn compose(&self, signal: &str, separator: &str) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => format!("{name}{separator}{signal}"),
            _ => signal.to_string(),
        }
    }

    fn add_signal(
        &mut self,
        attr: &str,
        full_name: &str,
        options: &BusOptions,
    ) -> Result<(), BusError> {
        let found = if options.case_insensitive {
            resolve_case_insensitive(&self.entity, full_name, options.scan_fallback)
                .map(|r| r.handle)
        } else {
            self.entity.lookup(full_name)
        };
        let handle = found.ok_or_else(|| BusError::SignalNotFound {
            entity: self.entity.name().to_string(),
            name: full_name.to_string(),
        })?;
        self.bind(attr, full_name, handle, options)
    }

    fn bind(
        &mut self,
        attr: &str,
        full_name: &str,
        handle: E::Handle,
        options: &BusOptions,
    ) -> Result<(), BusError> {
        debug!(
            entity = self.entity.name(),
            signal = full_name,
            index = ?options.array_index,
            "binding bus signal"
        );
        let handle = match options.array_index {
            Some(index) => handle.element(index)?,
            None => handle,
        };

        match self.signals.iter_mut().find(|(a, _)| a == attr) {
            Some(slot) => slot.1 = handle,
            None => self.signals.push((attr.to_string(), handle)),
        }
        Ok(())
    }

    /// The bus name, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The entity the bus belongs to.
    pub fn entity(&self) -> &E {
        &self.entity
    }

    /// The handle bound to `attr`.
    pub fn signal(&self, attr: &str) -> Option<&E::Handle> {
        self.signals.iter().find(|(a, _)| a == attr).map(|(_, h)| h)
    }

    /// Iterates over `(attribute, handle)` pairs in declaration order.
    pub fn signals(&self) -> impl Iterator<Item = (&str, &E::Handle)> {
        self.signals.iter().map(|(a, h)| (a.as_str(), h))
    }

    /// Returns true if `attr` is bound.
    pub fn contains(&self, attr: &str) -> bool {
        self.signal(attr).is_some()
    }

    /// Number of bound signals.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Returns true if no signal is bound.
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Writes each bus attribute of `obj` to its signal.
    ///
    /// Attributes missing on `obj` are skipped, or rejected when `strict`.
    /// Writes are applied in declaration order; an error leaves earlier
    /// writes in place.
    pub fn drive<R: BusRecord + ?Sized>(&self, obj: &R, strict: bool) -> Result<(), BusError> {
        for (attr, handle) in &self.signals {
            let Some(value) = obj.field(attr) else {
                if strict {
                    return Err(self.missing(BusAction::Drive, obj.record_type(), attr));
                }
                continue;
            };
            handle.set_value(value.clone())?;
        }
        Ok(())
    }

    /// Reads each signal into the matching attribute of `obj`.
    ///
    /// A logic field takes the signal's bit-string and keeps its own width;
    /// any other field is replaced by the signal value. Attributes missing
    /// on `obj` are skipped, or rejected when `strict`.
    pub fn sample<R: BusRecord + ?Sized>(&self, obj: &mut R, strict: bool) -> Result<(), BusError> {
        let record_type = obj.record_type().to_string();
        for (attr, handle) in &self.signals {
            let Some(dest) = obj.field_mut(attr) else {
                if strict {
                    return Err(self.missing(BusAction::Sample, &record_type, attr));
                }
                continue;
            };
            match (dest, handle.binstr()) {
                (SimValue::Logic(bits), Some(binstr)) => {
                    bits.assign_binstr(&binstr).map_err(SimError::from)?;
                }
                (dest, _) => *dest = handle.value(),
            }
        }
        Ok(())
    }

    /// Snapshots the current value of every signal.
    pub fn capture(&self) -> Capture {
        let values: BTreeMap<String, SimValue> = self
            .signals
            .iter()
            .map(|(attr, handle)| (attr.clone(), handle.value()))
            .collect();
        Capture::from_values(values)
    }

    /// Drives `value` non-strictly and returns the assignment token.
    pub fn assign<'a, R: BusRecord + ?Sized>(
        &'a self,
        value: &'a R,
    ) -> Result<AssignmentResult<&'a Self, &'a R>, BusError> {
        self.drive(value, false)?;
        Ok(AssignmentResult::new(self, value))
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }

    fn missing(&self, action: BusAction, record_type: &str, attr: &str) -> BusError {
        BusError::MissingAttribute {
            action,
            entity: self.entity.name().to_string(),
            bus: self.display_name().to_string(),
            record_type: record_type.to_string(),
            attribute: attr.to_string(),
        }
    }
}

impl<E: Entity> fmt::Debug for Bus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("entity", &self.entity.name())
            .field("name", &self.name)
            .field("signals", &self.signals)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Transaction;
    use sigbus_common::LogicVec;
    use sigbus_sim::{MemEntity, MemHandle};

    fn dut() -> MemEntity {
        let mut dut = MemEntity::new("dut");
        dut.add_logic("a", 4);
        dut.add_logic("b", 4);
        dut.add_logic("in_a", 4);
        dut.add_logic("in_b", 4);
        dut
    }

    fn handle(dut: &MemEntity, name: &str) -> MemHandle {
        dut.lookup(name).unwrap()
    }

    fn no_optional() -> SignalSet {
        SignalSet::default()
    }

    #[test]
    fn nameless_bus_binds_bare_names() {
        let dut = dut();
        let bus = Bus::new(&dut, None, ["a", "b"], no_optional(), BusOptions::default()).unwrap();
        assert_eq!(bus.len(), 2);
        assert!(bus.signal("a").unwrap().same_signal(&handle(&dut, "a")));
        assert!(bus.signal("b").unwrap().same_signal(&handle(&dut, "b")));
        assert_eq!(bus.name(), None);
    }

    #[test]
    fn named_bus_uses_separator() {
        let dut = dut();
        let bus = Bus::new(&dut, Some("in"), ["a", "b"], no_optional(), BusOptions::default())
            .unwrap();
        assert!(bus.signal("a").unwrap().same_signal(&handle(&dut, "in_a")));
        assert!(bus.signal("b").unwrap().same_signal(&handle(&dut, "in_b")));
        assert_eq!(bus.name(), Some("in"));
    }

    #[test]
    fn empty_name_behaves_as_nameless() {
        let dut = dut();
        let bus = Bus::new(&dut, Some(""), ["a"], no_optional(), BusOptions::default()).unwrap();
        assert!(bus.signal("a").unwrap().same_signal(&handle(&dut, "a")));
    }

    #[test]
    fn custom_separator() {
        let mut dut = MemEntity::new("dut");
        dut.add_logic("s__valid", 1);
        let opts = BusOptions::default().with_separator("__");
        let bus = Bus::new(&dut, Some("s"), ["valid"], no_optional(), opts).unwrap();
        assert_eq!(bus.signal("valid").unwrap().name(), "s__valid");
    }

    #[test]
    fn mapped_attribute_names() {
        let dut = dut();
        let signals: SignalSet = [("first", "a"), ("second", "b")].into_iter().collect();
        let bus = Bus::new(&dut, Some("in"), signals, no_optional(), BusOptions::default())
            .unwrap();
        assert!(bus.signal("first").unwrap().same_signal(&handle(&dut, "in_a")));
        assert!(bus.contains("second"));
        assert!(!bus.contains("a"));
    }

    #[test]
    fn case_insensitive_resolution() {
        for on_entity in ["valid", "VALID", "vaLiD"] {
            let mut dut = MemEntity::new("dut");
            dut.add_logic(on_entity, 1);
            let bus = Bus::new(&dut, None, ["Valid"], no_optional(), BusOptions::default())
                .unwrap();
            assert_eq!(bus.signal("Valid").unwrap().name(), on_entity);
        }
    }

    #[test]
    fn case_sensitive_rejects_other_case() {
        let mut dut = MemEntity::new("dut");
        dut.add_logic("valid", 1);
        let err = Bus::new(
            &dut,
            None,
            ["Valid"],
            no_optional(),
            BusOptions::default().case_sensitive(),
        )
        .unwrap_err();
        assert!(matches!(err, BusError::SignalNotFound { ref name, .. } if name == "Valid"));
    }

    #[test]
    fn without_scan_rejects_mixed_case() {
        let mut dut = MemEntity::new("dut");
        dut.add_logic("vaLiD", 1);
        let opts = BusOptions::default().without_scan();
        assert!(Bus::new(&dut, None, ["Valid"], no_optional(), opts).is_err());
    }

    #[test]
    fn missing_mandatory_names_composed_signal() {
        let dut = dut();
        let err = Bus::new(&dut, Some("in"), ["a", "c"], no_optional(), BusOptions::default())
            .unwrap_err();
        match err {
            BusError::SignalNotFound { entity, name } => {
                assert_eq!(entity, "dut");
                assert_eq!(name, "in_c");
            }
            other => panic!("expected SignalNotFound, got {other:?}"),
        }
    }

    #[test]
    fn missing_optional_is_skipped() {
        let mut dut = dut();
        dut.add_logic("in_ready", 1);
        let bus = Bus::new(&dut, Some("in"), ["a"], ["ready", "last"], BusOptions::default())
            .unwrap();
        assert!(bus.contains("ready"));
        assert!(!bus.contains("last"));
        let cap = bus.capture();
        assert!(!cap.contains("last"));
        assert_eq!(cap.len(), 2);
    }

    #[test]
    fn optional_found_case_insensitively() {
        let mut dut = MemEntity::new("dut");
        dut.add_logic("IN_READY", 1);
        let bus = Bus::new(&dut, Some("in"), SignalSet::default(), ["ready"], BusOptions::default())
            .unwrap();
        assert_eq!(bus.signal("ready").unwrap().name(), "IN_READY");
    }

    #[test]
    fn array_index_applies_to_every_signal() {
        let mut dut = MemEntity::new("dut");
        dut.add_logic_array("ch_valid", 1, 4);
        dut.add_logic_array("ch_data", 8, 4);
        let opts = BusOptions::default().with_array_index(2);
        let bus = Bus::new(&dut, Some("ch"), ["valid", "data"], no_optional(), opts).unwrap();
        assert_eq!(bus.signal("valid").unwrap().name(), "ch_valid[2]");
        assert_eq!(bus.signal("data").unwrap().name(), "ch_data[2]");
    }

    #[test]
    fn array_index_out_of_range() {
        let mut dut = MemEntity::new("dut");
        dut.add_logic_array("ch_valid", 1, 2);
        let opts = BusOptions::default().with_array_index(5);
        let err = Bus::new(&dut, Some("ch"), ["valid"], no_optional(), opts).unwrap_err();
        assert!(matches!(err, BusError::Sim(SimError::IndexOutOfRange { index: 5, .. })));
    }

    #[test]
    fn drive_writes_fields() {
        let dut = dut();
        let bus = Bus::new(&dut, Some("in"), ["a", "b"], no_optional(), BusOptions::default())
            .unwrap();
        let beat = Transaction::new("Beat").with("a", 3i64).with("b", 12i64);
        bus.drive(&beat, true).unwrap();
        assert_eq!(handle(&dut, "in_a").value().to_u64(), Some(3));
        assert_eq!(handle(&dut, "in_b").value().to_u64(), Some(12));
    }

    #[test]
    fn drive_non_strict_skips_missing() {
        let dut = dut();
        let bus = Bus::new(&dut, Some("in"), ["a", "b"], no_optional(), BusOptions::default())
            .unwrap();
        let beat = Transaction::new("Beat").with("b", 5i64);
        bus.drive(&beat, false).unwrap();
        assert_eq!(handle(&dut, "in_a").write_count(), 0);
        assert_eq!(handle(&dut, "in_b").value().to_u64(), Some(5));
    }

    #[test]
    fn drive_strict_names_missing_attribute() {
        let dut = dut();
        let bus = Bus::new(&dut, Some("in"), ["a", "b"], no_optional(), BusOptions::default())
            .unwrap();
        let beat = Transaction::new("Beat").with("a", 1i64);
        let err = bus.drive(&beat, true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to drive onto dut.in because Beat is missing attribute b"
        );
    }

    #[test]
    fn drive_propagates_write_errors() {
        let dut = dut();
        let bus = Bus::new(&dut, None, ["a"], no_optional(), BusOptions::default()).unwrap();
        let beat = Transaction::new("Beat").with("a", 99i64);
        let err = bus.drive(&beat, false).unwrap_err();
        assert!(matches!(err, BusError::Sim(SimError::ValueOverflow { .. })));
    }

    #[test]
    fn sample_preserves_logic_destination() {
        let dut = dut();
        handle(&dut, "a").set_value(SimValue::Integer(0b1010)).unwrap();
        let bus = Bus::new(&dut, None, ["a"], no_optional(), BusOptions::default()).unwrap();
        let mut rec = Transaction::new("Beat").with("a", LogicVec::new(8));
        bus.sample(&mut rec, true).unwrap();
        match rec.get("a").unwrap() {
            SimValue::Logic(v) => {
                assert_eq!(v.width(), 8);
                assert_eq!(v.binstr(), "00001010");
            }
            other => panic!("destination type changed to {}", other.kind()),
        }
    }

    #[test]
    fn sample_replaces_plain_destination() {
        let mut dut = MemEntity::new("dut");
        dut.add_signal("count", SimValue::Integer(17));
        dut.add_logic("flag", 1);
        handle(&dut, "flag").set_value(SimValue::from(true)).unwrap();
        let bus = Bus::new(&dut, None, ["count", "flag"], no_optional(), BusOptions::default())
            .unwrap();
        let mut rec = Transaction::new("Beat")
            .with("count", 0i64)
            .with("flag", 0i64);
        bus.sample(&mut rec, false).unwrap();
        assert_eq!(rec.get("count"), Some(&SimValue::Integer(17)));
        assert_eq!(rec.get("flag"), Some(&SimValue::from(true)));
    }

    #[test]
    fn sample_logic_destination_from_non_logic_signal() {
        let mut dut = MemEntity::new("dut");
        dut.add_signal("count", SimValue::Integer(3));
        let bus = Bus::new(&dut, None, ["count"], no_optional(), BusOptions::default()).unwrap();
        let mut rec = Transaction::new("Beat").with("count", LogicVec::new(4));
        bus.sample(&mut rec, false).unwrap();
        assert_eq!(rec.get("count"), Some(&SimValue::Integer(3)));
    }

    #[test]
    fn sample_strict_and_non_strict() {
        let dut = dut();
        let bus = Bus::new(&dut, None, ["a", "b"], no_optional(), BusOptions::default()).unwrap();
        let mut rec = Transaction::new("Partial").with("a", 0i64);
        bus.sample(&mut rec, false).unwrap();
        assert!(rec.get("b").is_none());
        let err = bus.sample(&mut rec, true).unwrap_err();
        assert!(matches!(
            err,
            BusError::MissingAttribute {
                action: BusAction::Sample,
                ref attribute,
                ..
            } if attribute == "b"
        ));
    }

    #[test]
    fn capture_reads_current_values() {
        let dut = dut();
        let bus = Bus::new(&dut, Some("in"), ["a", "b"], no_optional(), BusOptions::default())
            .unwrap();
        handle(&dut, "in_a").set_value(SimValue::Integer(6)).unwrap();
        let cap = bus.capture();
        assert_eq!(cap.get("a").unwrap().to_u64(), Some(6));
        assert_eq!(cap.get("b").unwrap().binstr().as_deref(), Some("XXXX"));
        assert!(cap.get("nonexistent").is_err());

        handle(&dut, "in_a").set_value(SimValue::Integer(7)).unwrap();
        assert_eq!(cap.get("a").unwrap().to_u64(), Some(6));
    }

    #[test]
    fn assign_drives_and_returns_token() {
        let dut = dut();
        let bus = Bus::new(&dut, None, ["a", "b"], no_optional(), BusOptions::default()).unwrap();
        let beat = Transaction::new("Beat").with("a", 9i64);
        let token = bus.assign(&beat).unwrap();
        assert_eq!(token.value().get("a"), Some(&SimValue::Integer(9)));
        assert_eq!(token.target().len(), 2);
        assert_eq!(handle(&dut, "a").value().to_u64(), Some(9));
    }

    #[test]
    fn repeated_attribute_rebinds() {
        let mut dut = dut();
        dut.add_logic("c", 1);
        let signals: SignalSet = [("x", "a")].into_iter().collect();
        let optional: SignalSet = [("x", "c")].into_iter().collect();
        let bus = Bus::new(&dut, None, signals, optional, BusOptions::default()).unwrap();
        assert_eq!(bus.len(), 1);
        assert_eq!(bus.signal("x").unwrap().name(), "c");
    }

    #[test]
    fn debug_lists_entity_and_signals() {
        let dut = dut();
        let bus = Bus::new(&dut, Some("in"), ["a"], no_optional(), BusOptions::default()).unwrap();
        let text = format!("{bus:?}");
        assert!(text.contains("\"dut\""));
        assert!(text.contains("in_a"));
    }
}
