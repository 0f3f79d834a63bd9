//! Content-type driven codecs.
//!
//! # Data Flow
//! ```text
//! inbound:  Content-Type → Registry::lookup → Codec::unmarshal(body, &mut dyn Target)
//! outbound: Accept       → Registry::lookup → Codec::marshal(&dyn Payload) → bytes
//! ```
//!
//! # Design Decisions
//! - Codecs are stateless trait objects so the registry can hold any of them
//! - `Payload` and `Target` erase the concrete body type at the codec seam
//! - A `Target` is either a settable handle (`&mut T`) or a read-only one (`&T`);
//!   codecs reject read-only handles before reading the input
//! - Decoding assigns the whole value at the end; nothing is written on error

pub mod form;
pub mod json;
pub mod registry;
pub mod xml;

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use form::{FormCodec, FormField, FormSchema, FormValues, ScalarKind};
pub use json::JsonCodec;
pub use registry::{Registry, RegistryBuilder};
pub use xml::XmlCodec;

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_XML: &str = "application/xml";
pub const APPLICATION_FORM: &str = "application/x-www-form-urlencoded";

/// Errors raised while encoding or decoding a body.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Decode target cannot be assigned to.
    #[error("type {type_name} is readonly")]
    ReadOnly { type_name: &'static str },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    XmlDecode(#[from] quick_xml::DeError),

    #[error(transparent)]
    XmlEncode(#[from] quick_xml::SeError),

    #[error("body is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Percent escape not followed by two hex digits.
    #[error("invalid URL escape {escape:?}")]
    MalformedForm { escape: String },

    /// Form field text does not parse as the field's declared kind.
    #[error("cannot parse {text:?} as {kind} for field {field:?}")]
    Conversion {
        field: &'static str,
        text: String,
        kind: ScalarKind,
    },
}

/// A content-type specific encode/decode pair.
pub trait Codec: Send + Sync + fmt::Debug {
    /// MIME type written to `Content-Type` for encoded bodies.
    fn content_type(&self) -> &'static str;

    fn marshal(&self, value: &dyn Payload) -> Result<Vec<u8>, CodecError>;

    fn unmarshal(&self, src: &[u8], target: &mut dyn Target) -> Result<(), CodecError>;
}

/// Outbound body as seen by a codec.
pub trait Payload {
    fn to_json(&self) -> Result<Vec<u8>, CodecError>;

    fn to_xml(&self) -> Result<String, CodecError>;
}

impl<T: Serialize> Payload for T {
    fn to_json(&self) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(self)?)
    }

    fn to_xml(&self) -> Result<String, CodecError> {
        Ok(quick_xml::se::to_string(self)?)
    }
}

/// Types a codec can decode into.
///
/// Blanket-implemented; a body type only has to derive the serde traits,
/// implement `Default` and declare its [`FormSchema`].
pub trait Model: Serialize + DeserializeOwned + Default + FormSchema {}

impl<T> Model for T where T: Serialize + DeserializeOwned + Default + FormSchema {}

/// Inbound decode destination.
pub trait Target {
    /// Name used in read-only errors.
    fn type_name(&self) -> &'static str;

    fn is_settable(&self) -> bool;

    fn form_fields(&self) -> &'static [FormField];

    /// The target type's default value as a JSON tree.
    fn default_tree(&self) -> Result<Value, CodecError>;

    fn assign_json(&mut self, src: &[u8]) -> Result<(), CodecError>;

    fn assign_xml(&mut self, src: &str) -> Result<(), CodecError>;

    fn assign_tree(&mut self, tree: Value) -> Result<(), CodecError>;
}

impl<T: Model> Target for &mut T {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<&mut T>()
    }

    fn is_settable(&self) -> bool {
        true
    }

    fn form_fields(&self) -> &'static [FormField] {
        T::FIELDS
    }

    fn default_tree(&self) -> Result<Value, CodecError> {
        Ok(serde_json::to_value(T::default())?)
    }

    fn assign_json(&mut self, src: &[u8]) -> Result<(), CodecError> {
        **self = serde_json::from_slice(src)?;
        Ok(())
    }

    fn assign_xml(&mut self, src: &str) -> Result<(), CodecError> {
        **self = quick_xml::de::from_str(src)?;
        Ok(())
    }

    fn assign_tree(&mut self, tree: Value) -> Result<(), CodecError> {
        **self = serde_json::from_value(tree)?;
        Ok(())
    }
}

impl<T: FormSchema> Target for &T {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<&T>()
    }

    fn is_settable(&self) -> bool {
        false
    }

    fn form_fields(&self) -> &'static [FormField] {
        T::FIELDS
    }

    fn default_tree(&self) -> Result<Value, CodecError> {
        Err(self.read_only())
    }

    fn assign_json(&mut self, _src: &[u8]) -> Result<(), CodecError> {
        Err(self.read_only())
    }

    fn assign_xml(&mut self, _src: &str) -> Result<(), CodecError> {
        Err(self.read_only())
    }

    fn assign_tree(&mut self, _tree: Value) -> Result<(), CodecError> {
        Err(self.read_only())
    }
}

trait ReadOnlyExt {
    fn read_only(&self) -> CodecError;
}

impl<T: Target + ?Sized> ReadOnlyExt for T {
    fn read_only(&self) -> CodecError {
        CodecError::ReadOnly {
            type_name: self.type_name(),
        }
    }
}

/// Rejects read-only targets before a codec reads its input.
pub(crate) fn ensure_settable(target: &dyn Target) -> Result<(), CodecError> {
    if target.is_settable() {
        Ok(())
    } else {
        Err(target.read_only())
    }
}
