//! Keyed carriers shipped with the crate.
//!
//! Any type can act as a carrier through a closure accessor; these traits
//! only back the `Accessor::indexed` and `Accessor::sink` shortcuts.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::errors::CarrierError;
use crate::value::Value;

/// A carrier that hands out values by field name.
pub trait KeyedCarrier {
    /// Gets the value stored under `key`.
    fn get_value(&self, key: &str) -> Result<Value, CarrierError>;
}

/// A carrier that accepts values by field name.
pub trait KeyedSink {
    /// Stores `value` under `key`, replacing any previous value.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), CarrierError>;
}

impl<S: BuildHasher> KeyedCarrier for HashMap<String, Value, S> {
    fn get_value(&self, key: &str) -> Result<Value, CarrierError> {
        self.get(key)
            .cloned()
            .ok_or_else(|| CarrierError::missing_key(key))
    }
}

impl<S: BuildHasher> KeyedSink for HashMap<String, Value, S> {
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), CarrierError> {
        self.insert(key.to_string(), value);
        Ok(())
    }
}

impl KeyedCarrier for BTreeMap<String, Value> {
    fn get_value(&self, key: &str) -> Result<Value, CarrierError> {
        self.get(key)
            .cloned()
            .ok_or_else(|| CarrierError::missing_key(key))
    }
}

impl KeyedSink for BTreeMap<String, Value> {
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), CarrierError> {
        self.insert(key.to_string(), value);
        Ok(())
    }
}
