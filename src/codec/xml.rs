//! `application/xml` codec, delegating to `quick-xml`'s serde support.
//!
//! The root element is named after the serialized type.

use crate::codec::{ensure_settable, Codec, CodecError, Payload, Target, APPLICATION_XML};

#[derive(Debug, Default, Clone, Copy)]
pub struct XmlCodec;

impl Codec for XmlCodec {
    fn content_type(&self) -> &'static str {
        APPLICATION_XML
    }

    fn marshal(&self, value: &dyn Payload) -> Result<Vec<u8>, CodecError> {
        Ok(value.to_xml()?.into_bytes())
    }

    fn unmarshal(&self, src: &[u8], target: &mut dyn Target) -> Result<(), CodecError> {
        ensure_settable(target)?;
        let text = std::str::from_utf8(src)?;
        target.assign_xml(text)
    }
}
