//! Static field descriptors for form decoding.

use std::fmt;

use serde_json::{Number, Value};

use crate::codec::CodecError;

/// Scalar type a form field's text is converted to.
///
/// Numeric kinds match the field's Rust type so out-of-range text is rejected
/// here with the field name, not later by deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ScalarKind {
    /// Convert the raw text of `field` into a tree value of this kind.
    pub fn convert(self, field: &'static str, text: &str) -> Result<Value, CodecError> {
        let converted = match self {
            ScalarKind::String => Some(Value::String(text.to_owned())),
            ScalarKind::Bool => text.parse::<bool>().ok().map(Value::Bool),
            ScalarKind::I8 => text.parse::<i8>().ok().map(Value::from),
            ScalarKind::I16 => text.parse::<i16>().ok().map(Value::from),
            ScalarKind::I32 => text.parse::<i32>().ok().map(Value::from),
            ScalarKind::I64 => text.parse::<i64>().ok().map(Value::from),
            ScalarKind::U8 => text.parse::<u8>().ok().map(Value::from),
            ScalarKind::U16 => text.parse::<u16>().ok().map(Value::from),
            ScalarKind::U32 => text.parse::<u32>().ok().map(Value::from),
            ScalarKind::U64 => text.parse::<u64>().ok().map(Value::from),
            ScalarKind::F32 => text
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .and_then(|v| Number::from_f64(f64::from(v)))
                .map(Value::Number),
            ScalarKind::F64 => text
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),
        };

        converted.ok_or_else(|| CodecError::Conversion {
            field,
            text: text.to_owned(),
            kind: self,
        })
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::String => "string",
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
        };
        f.write_str(name)
    }
}

/// One declared form field: its wire key and expected kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub kind: ScalarKind,
    /// Collect every value for the key instead of the first one.
    pub repeated: bool,
}

impl FormField {
    pub const fn new(name: &'static str, kind: ScalarKind) -> Self {
        Self {
            name,
            kind,
            repeated: false,
        }
    }

    pub const fn repeated(name: &'static str, kind: ScalarKind) -> Self {
        Self {
            name,
            kind,
            repeated: true,
        }
    }
}

/// Field layout of a record decoded from form data.
///
/// Names must match the record's serialized field names. Types that are never
/// decoded from forms can keep the empty default.
pub trait FormSchema {
    const FIELDS: &'static [FormField] = &[];
}

/// Implement [`FormSchema`] for a record.
///
/// ```
/// use content_codec::form_schema;
///
/// #[derive(Default)]
/// struct Login {
///     user: String,
///     attempts: u32,
///     scopes: Vec<String>,
/// }
///
/// form_schema!(Login {
///     "user" => String,
///     "attempts" => U32,
///     "scopes" => [String],
/// });
/// ```
#[macro_export]
macro_rules! form_schema {
    (@field $name:literal, [$kind:ident]) => {
        $crate::codec::FormField::repeated($name, $crate::codec::ScalarKind::$kind)
    };
    (@field $name:literal, $kind:ident) => {
        $crate::codec::FormField::new($name, $crate::codec::ScalarKind::$kind)
    };
    ($ty:ty { $($name:literal => $kind:tt),* $(,)? }) => {
        impl $crate::codec::FormSchema for $ty {
            const FIELDS: &'static [$crate::codec::FormField] = &[
                $($crate::form_schema!(@field $name, $kind)),*
            ];
        }
    };
}
