//! The shared pipeline record and the views stages get of it.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::slot::{INPUT_SLOT, SlotValue};

/// The shared record of one pipeline invocation.
///
/// Holds the input payload in [`INPUT_SLOT`] followed by every stage output in
/// the order it was written. Slots are never overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    slots: Vec<(String, SlotValue)>,
    last_writer: Option<String>,
}

impl Record {
    /// A fresh record carrying only the input payload.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            slots: vec![(INPUT_SLOT.to_string(), SlotValue::Text(input.into()))],
            last_writer: None,
        }
    }

    /// The input payload.
    pub fn input(&self) -> &str {
        self.text(INPUT_SLOT).unwrap_or_default()
    }

    pub fn get(&self, slot: &str) -> Option<&SlotValue> {
        self.slots
            .iter()
            .find_map(|(name, value)| (name == slot).then_some(value))
    }

    pub fn text(&self, slot: &str) -> Option<&str> {
        self.get(slot).and_then(SlotValue::as_text)
    }

    pub fn list(&self, slot: &str) -> Option<&[String]> {
        self.get(slot).and_then(SlotValue::as_list)
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.get(slot).is_some()
    }

    /// Name of the stage that most recently wrote to this record, if any.
    pub fn last_writer(&self) -> Option<&str> {
        self.last_writer.as_deref()
    }

    /// Slot names in write order, `input` first.
    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SlotValue)> {
        self.slots.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Flatten into a JSON object (input payload plus every stage output).
    pub fn into_map(self) -> serde_json::Map<String, serde_json::Value> {
        self.slots
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    SlotValue::Text(s) => serde_json::Value::String(s),
                    SlotValue::List(items) => serde_json::Value::Array(
                        items.into_iter().map(serde_json::Value::String).collect(),
                    ),
                };
                (name, value)
            })
            .collect()
    }

    /// Commit a stage's validated update. Returns the first slot that was
    /// already set, leaving the record untouched in that case.
    pub(crate) fn commit(&mut self, stage: &str, update: StageUpdate) -> Result<(), String> {
        if let Some((slot, _)) = update.slots.iter().find(|(slot, _)| self.contains(slot)) {
            return Err(slot.clone());
        }
        self.slots.extend(update.slots);
        self.last_writer = Some(stage.to_string());
        Ok(())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (name, value) in &self.slots {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Why a stage could not read a slot through its [`SlotView`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotAccessError {
    #[error("stage '{stage}' did not declare '{slot}' as an input")]
    NotDeclared { stage: String, slot: String },

    #[error("slot '{slot}' is not set")]
    Missing { slot: String },

    #[error("slot '{slot}' holds {found}, expected {expected}")]
    WrongType {
        slot: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Read-only view of a record limited to one stage's declared inputs.
#[derive(Debug, Clone, Copy)]
pub struct SlotView<'a> {
    stage: &'a str,
    record: &'a Record,
    allowed: &'a [String],
}

impl<'a> SlotView<'a> {
    pub(crate) fn new(stage: &'a str, record: &'a Record, allowed: &'a [String]) -> Self {
        Self {
            stage,
            record,
            allowed,
        }
    }

    /// The stage this view was handed to.
    pub fn stage(&self) -> &'a str {
        self.stage
    }

    /// Look up a declared input. Undeclared slots are invisible even when set.
    pub fn get(&self, slot: &str) -> Option<&'a SlotValue> {
        if self.allowed.iter().any(|s| s == slot) {
            self.record.get(slot)
        } else {
            None
        }
    }

    /// A declared text input, or an error describing why it is unavailable.
    pub fn text(&self, slot: &str) -> Result<&'a str, SlotAccessError> {
        match self.lookup(slot)? {
            SlotValue::Text(s) => Ok(s),
            other => Err(self.wrong_type(slot, "text", other)),
        }
    }

    /// A declared list input, or an error describing why it is unavailable.
    pub fn list(&self, slot: &str) -> Result<&'a [String], SlotAccessError> {
        match self.lookup(slot)? {
            SlotValue::List(items) => Ok(items),
            other => Err(self.wrong_type(slot, "list", other)),
        }
    }

    /// Names of the declared inputs.
    pub fn declared(&self) -> &'a [String] {
        self.allowed
    }

    fn lookup(&self, slot: &str) -> Result<&'a SlotValue, SlotAccessError> {
        if !self.allowed.iter().any(|s| s == slot) {
            return Err(SlotAccessError::NotDeclared {
                stage: self.stage.to_string(),
                slot: slot.to_string(),
            });
        }
        self.record.get(slot).ok_or_else(|| SlotAccessError::Missing {
            slot: slot.to_string(),
        })
    }

    fn wrong_type(&self, slot: &str, expected: &'static str, found: &SlotValue) -> SlotAccessError {
        SlotAccessError::WrongType {
            slot: slot.to_string(),
            expected,
            found: found.kind(),
        }
    }
}

/// The partial record a stage returns: the values for its output slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageUpdate {
    slots: Vec<(String, SlotValue)>,
}

impl StageUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a slot, replacing any value set earlier in this update.
    pub fn set(mut self, slot: impl Into<String>, value: impl Into<SlotValue>) -> Self {
        let slot = slot.into();
        let value = value.into();
        match self.slots.iter_mut().find(|(name, _)| *name == slot) {
            Some(entry) => entry.1 = value,
            None => self.slots.push((slot, value)),
        }
        self
    }

    pub fn text(self, slot: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(slot, SlotValue::Text(value.into()))
    }

    pub fn list<I, S>(self, slot: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(
            slot,
            SlotValue::List(items.into_iter().map(Into::into).collect()),
        )
    }

    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.slots.iter().any(|(name, _)| name == slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
