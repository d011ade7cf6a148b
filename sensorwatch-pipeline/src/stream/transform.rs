//! Stream payloads and their transforms

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Item carried through a stream buffer
///
/// Serialises untagged: a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    /// Text message
    Text(String),
    /// Numeric sample
    Number(f64),
}

/// Discriminant of a [`Payload`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    /// [`Payload::Text`]
    Text,
    /// [`Payload::Number`]
    Number,
}

impl Payload {
    /// Which variant this is
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Text(_) => PayloadKind::Text,
            Payload::Number(_) => PayloadKind::Number,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(text) => f.pad(text),
            Payload::Number(number) => f.pad(&number.to_string()),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<f64> for Payload {
    fn from(number: f64) -> Self {
        Payload::Number(number)
    }
}

impl From<i32> for Payload {
    fn from(number: i32) -> Self {
        Payload::Number(f64::from(number))
    }
}

type TransformFn = Box<dyn Fn(&Payload) -> Payload + Send + Sync>;

/// Transform per payload kind
///
/// The default table upper-cases text and doubles numbers. Kinds without an
/// entry pass through unchanged.
///
/// ```
/// use sensorwatch_pipeline::stream::{Payload, PayloadKind, TransformTable};
///
/// let table = TransformTable::default().register(PayloadKind::Number, |payload| match payload {
///     Payload::Number(n) => Payload::Number(n.sqrt()),
///     other => other.clone(),
/// });
///
/// assert_eq!(table.apply(&Payload::Number(81.0)), Payload::Number(9.0));
/// assert_eq!(table.apply(&"hi".into()), Payload::Text("HI".into()));
/// ```
pub struct TransformTable {
    transforms: HashMap<PayloadKind, TransformFn>,
}

impl TransformTable {
    /// Table with no transforms; every payload passes through
    pub fn identity() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// Register or replace the transform for a kind
    pub fn register<F>(mut self, kind: PayloadKind, transform: F) -> Self
    where
        F: Fn(&Payload) -> Payload + Send + Sync + 'static,
    {
        self.transforms.insert(kind, Box::new(transform));
        self
    }

    /// Transform a payload
    pub fn apply(&self, payload: &Payload) -> Payload {
        match self.transforms.get(&payload.kind()) {
            Some(transform) => transform(payload),
            None => payload.clone(),
        }
    }

    /// Kinds with a registered transform, sorted
    pub fn kinds(&self) -> Vec<PayloadKind> {
        let mut kinds: Vec<PayloadKind> = self.transforms.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

impl Default for TransformTable {
    fn default() -> Self {
        Self::identity()
            .register(PayloadKind::Text, |payload| match payload {
                Payload::Text(text) => Payload::Text(text.to_uppercase()),
                other => other.clone(),
            })
            .register(PayloadKind::Number, |payload| match payload {
                Payload::Number(number) => Payload::Number(number * 2.0),
                other => other.clone(),
            })
    }
}

impl fmt::Debug for TransformTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformTable")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// A staged item after flushing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedItem {
    /// Stream position assigned on admission
    pub position: u64,
    /// Payload as admitted
    pub original: Payload,
    /// Payload after its transform
    pub transformed: Payload,
    /// Milliseconds between admission and flush
    pub latency_ms: u64,
}
