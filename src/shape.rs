//! Detects whether a serializable value is a struct without serializing it.
//!
//! The struct entry points accept named-field structs only. Going through
//! `serde_json::to_value` alone cannot tell a struct from a map, since both
//! come out as JSON objects, so the value is first offered to a serializer
//! that stops at the first call and reports what the value announced itself
//! as.

use std::fmt::{self, Display};

use serde::ser::{self, Impossible, Serialize, Serializer};

/// Returns the shape of a value that is not a struct, or `None` for a struct.
///
/// `Option`, newtype structs and pointer types are looked through. Values
/// whose `Serialize` impl fails before announcing a shape are reported as
/// structs so that serialization surfaces the real error.
pub(crate) fn non_struct_kind<T>(value: &T) -> Option<&'static str>
where
    T: Serialize + ?Sized,
{
    match value.serialize(ShapeProbe) {
        Err(Shape::Other(kind)) => Some(kind),
        Err(Shape::Struct) | Err(Shape::Deferred) | Ok(()) => None,
    }
}

#[derive(Debug)]
enum Shape {
    Struct,
    Other(&'static str),
    Deferred,
}

impl Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Struct => write!(f, "struct"),
            Shape::Other(kind) => write!(f, "{}", kind),
            Shape::Deferred => write!(f, "unknown"),
        }
    }
}

impl std::error::Error for Shape {}

impl ser::Error for Shape {
    fn custom<M: Display>(_msg: M) -> Self {
        Shape::Deferred
    }
}

struct ShapeProbe;

type Never = Impossible<(), Shape>;

impl Serializer for ShapeProbe {
    type Ok = ();
    type Error = Shape;
    type SerializeSeq = Never;
    type SerializeTuple = Never;
    type SerializeTupleStruct = Never;
    type SerializeTupleVariant = Never;
    type SerializeMap = Never;
    type SerializeStruct = Never;
    type SerializeStructVariant = Never;

    fn serialize_bool(self, _: bool) -> Result<(), Shape> {
        Err(Shape::Other("boolean"))
    }

    fn serialize_i8(self, _: i8) -> Result<(), Shape> {
        Err(Shape::Other("number"))
    }

    fn serialize_i16(self, _: i16) -> Result<(), Shape> {
        Err(Shape::Other("number"))
    }

    fn serialize_i32(self, _: i32) -> Result<(), Shape> {
        Err(Shape::Other("number"))
    }

    fn serialize_i64(self, _: i64) -> Result<(), Shape> {
        Err(Shape::Other("number"))
    }

    fn serialize_i128(self, _: i128) -> Result<(), Shape> {
        Err(Shape::Other("number"))
    }

    fn serialize_u8(self, _: u8) -> Result<(), Shape> {
        Err(Shape::Other("number"))
    }

    fn serialize_u16(self, _: u16) -> Result<(), Shape> {
        Err(Shape::Other("number"))
    }

    fn serialize_u32(self, _: u32) -> Result<(), Shape> {
        Err(Shape::Other("number"))
    }

    fn serialize_u64(self, _: u64) -> Result<(), Shape> {
        Err(Shape::Other("number"))
    }

    fn serialize_u128(self, _: u128) -> Result<(), Shape> {
        Err(Shape::Other("number"))
    }

    fn serialize_f32(self, _: f32) -> Result<(), Shape> {
        Err(Shape::Other("number"))
    }

    fn serialize_f64(self, _: f64) -> Result<(), Shape> {
        Err(Shape::Other("number"))
    }

    fn serialize_char(self, _: char) -> Result<(), Shape> {
        Err(Shape::Other("string"))
    }

    fn serialize_str(self, _: &str) -> Result<(), Shape> {
        Err(Shape::Other("string"))
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<(), Shape> {
        Err(Shape::Other("bytes"))
    }

    fn serialize_none(self) -> Result<(), Shape> {
        Err(Shape::Other("null"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<(), Shape>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), Shape> {
        Err(Shape::Other("null"))
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<(), Shape> {
        Err(Shape::Other("unit struct"))
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> Result<(), Shape> {
        Err(Shape::Other("enum"))
    }

    fn serialize_newtype_struct<T>(self, _: &'static str, value: &T) -> Result<(), Shape>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: &T,
    ) -> Result<(), Shape>
    where
        T: Serialize + ?Sized,
    {
        Err(Shape::Other("enum"))
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Never, Shape> {
        Err(Shape::Other("array"))
    }

    fn serialize_tuple(self, _: usize) -> Result<Never, Shape> {
        Err(Shape::Other("array"))
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Never, Shape> {
        Err(Shape::Other("array"))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Never, Shape> {
        Err(Shape::Other("enum"))
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Never, Shape> {
        Err(Shape::Other("map"))
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Never, Shape> {
        Err(Shape::Struct)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Never, Shape> {
        Err(Shape::Other("enum"))
    }
}
