//! Accessor contract validation.

use super::{Accessor, ParamType};
use crate::errors::ContractViolation;

/// Checks that `accessor` takes exactly one string key besides the carrier.
///
/// Synthesized mappers call the accessor once per field with the field name,
/// so any other shape is rejected before a container exists.
pub fn validate<C>(accessor: &Accessor<C>) -> Result<(), ContractViolation> {
    let signature = accessor.signature();
    let reject = |reason: String| {
        ContractViolation::new(accessor.direction(), signature.to_string(), reason)
    };

    match signature.params() {
        [ParamType::Str] => Ok(()),
        [] => Err(reject("accessor takes no key parameter".to_string())),
        [other] => Err(reject(format!(
            "key parameter must be a field name (&str), found {other}"
        ))),
        params => Err(reject(format!(
            "accessor takes {} key parameters, expected exactly one",
            params.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::{KeySignature, ReadAccessor, WriteAccessor};
    use crate::errors::CarrierError;
    use crate::plan::Direction;
    use crate::value::Value;
    use std::collections::HashMap;

    type Row = HashMap<String, Value>;

    struct Shaped(KeySignature);

    impl ReadAccessor<Row> for Shaped {
        fn signature(&self) -> KeySignature {
            self.0.clone()
        }

        fn read(&self, _carrier: &Row, _key: &str) -> Result<Value, CarrierError> {
            Ok(Value::Null)
        }
    }

    impl WriteAccessor<Row> for Shaped {
        fn signature(&self) -> KeySignature {
            self.0.clone()
        }

        fn write(&self, _carrier: &mut Row, _key: &str, _value: Value) -> Result<(), CarrierError> {
            Ok(())
        }
    }

    #[test]
    fn test_single_string_key_is_accepted() {
        assert!(validate(&Accessor::read(Shaped(KeySignature::keyed()))).is_ok());
        assert!(validate(&Accessor::write(Shaped(KeySignature::keyed()))).is_ok());
        assert!(validate(&Accessor::<Row>::indexed()).is_ok());
    }

    #[test]
    fn test_zero_keys_are_rejected() {
        let err = validate(&Accessor::read(Shaped(KeySignature::new([])))).unwrap_err();
        assert_eq!(err.direction, Direction::Read);
        assert_eq!(err.signature, "(carrier)");
        assert!(err.reason.contains("no key parameter"));
    }

    #[test]
    fn test_two_keys_are_rejected() {
        let accessor = Accessor::write(Shaped(KeySignature::new([ParamType::Str, ParamType::Str])));
        let err = validate(&accessor).unwrap_err();
        assert_eq!(err.direction, Direction::Write);
        assert!(err.reason.contains("2 key parameters"));
    }

    #[test]
    fn test_non_string_key_is_rejected() {
        let accessor = Accessor::read(Shaped(KeySignature::new([ParamType::Ordinal])));
        let err = validate(&accessor).unwrap_err();
        assert!(err.reason.contains("found usize"));

        let accessor = Accessor::read(Shaped(KeySignature::new([ParamType::Other("Vec<u8>")])));
        assert!(validate(&accessor).is_err());
    }
}
