use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_SIGNAL: i64 = 1;
pub const MAX_SIGNAL: i64 = 5;

/// One of the five discrete signals the controller accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "i64")]
pub struct SignalValue(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("signal value {0} is outside the allowed range (1-5)")]
pub struct SignalValueError(pub i64);

impl SignalValue {
    pub fn new(value: i64) -> Result<Self, SignalValueError> {
        if (MIN_SIGNAL..=MAX_SIGNAL).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(SignalValueError(value))
        }
    }

    pub fn get(self) -> i64 {
        i64::from(self.0)
    }
}

impl TryFrom<i64> for SignalValue {
    type Error = SignalValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SignalValue> for i64 {
    fn from(value: SignalValue) -> Self {
        value.get()
    }
}

impl<'de> Deserialize<'de> for SignalValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        SignalValue::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input modality that produced a dispatch attempt. Carried for display and audit only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationSource {
    #[serde(rename = "Manual")]
    Manual,
    #[serde(rename = "Aleatorio")]
    Random,
    #[serde(rename = "Voz")]
    Voice,
}

impl ActivationSource {
    pub fn label(self) -> &'static str {
        match self {
            ActivationSource::Manual => "Manual",
            ActivationSource::Random => "Aleatorio",
            ActivationSource::Voice => "Voz",
        }
    }
}

impl fmt::Display for ActivationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_one_through_five() {
        for raw in 1..=5 {
            assert_eq!(SignalValue::new(raw).expect("in range").get(), raw);
        }
        assert_eq!(SignalValue::new(0), Err(SignalValueError(0)));
        assert_eq!(SignalValue::new(6), Err(SignalValueError(6)));
        assert_eq!(SignalValue::new(-3), Err(SignalValueError(-3)));
    }

    #[test]
    fn deserializing_out_of_range_value_fails() {
        assert!(serde_json::from_str::<SignalValue>("4").is_ok());
        let err = serde_json::from_str::<SignalValue>("9").expect_err("must reject");
        assert!(err.to_string().contains("outside the allowed range"));
    }

    #[test]
    fn sources_use_operator_labels_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&ActivationSource::Voice).expect("serialize"),
            "\"Voz\""
        );
        assert_eq!(
            serde_json::to_string(&ActivationSource::Random).expect("serialize"),
            "\"Aleatorio\""
        );
        assert_eq!(ActivationSource::Manual.to_string(), "Manual");
    }
}
