//! `application/json` codec, delegating to `serde_json`.

use crate::codec::{ensure_settable, Codec, CodecError, Payload, Target, APPLICATION_JSON};

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        APPLICATION_JSON
    }

    fn marshal(&self, value: &dyn Payload) -> Result<Vec<u8>, CodecError> {
        value.to_json()
    }

    fn unmarshal(&self, src: &[u8], target: &mut dyn Target) -> Result<(), CodecError> {
        ensure_settable(target)?;
        target.assign_json(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FormSchema;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Item {
        name: String,
        qty: u32,
    }

    impl FormSchema for Item {}

    #[test]
    fn test_marshal() {
        let item = Item {
            name: "bolt".into(),
            qty: 4,
        };
        let bytes = JsonCodec.marshal(&item).unwrap();
        assert_eq!(bytes, br#"{"name":"bolt","qty":4}"#);
    }

    #[test]
    fn test_unmarshal() {
        let mut item = Item::default();
        JsonCodec
            .unmarshal(br#"{"name":"nut","qty":9}"#, &mut &mut item)
            .unwrap();
        assert_eq!(
            item,
            Item {
                name: "nut".into(),
                qty: 9
            }
        );
    }

    #[test]
    fn test_syntax_error_propagates() {
        let mut item = Item::default();
        let err = JsonCodec
            .unmarshal(b"{\"name\":", &mut &mut item)
            .unwrap_err();
        assert!(matches!(err, CodecError::Json(ref e) if e.is_eof()));
        assert_eq!(item, Item::default());
    }

    #[test]
    fn test_read_only_target_rejected() {
        let item = Item::default();
        let err = JsonCodec
            .unmarshal(br#"{"name":"x","qty":1}"#, &mut &item)
            .unwrap_err();
        assert!(matches!(err, CodecError::ReadOnly { .. }));
    }
}
