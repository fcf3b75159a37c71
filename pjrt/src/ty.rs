//! Compile-time type tags for PJRT buffer element types.
//!
//! [`Type`] is implemented by zero-sized marker structs (`F32`, `I32`, ...)
//! so that buffer and host-buffer APIs can be generic over element type
//! while still knowing, at compile time, the PJRT primitive type and byte
//! size/alignment they map to. [`PrimitiveType`] is the runtime counterpart,
//! mirroring `PJRT_Buffer_Type`.

use std::fmt::Debug;

use pjrt_sys::{
    PJRT_Buffer_Type, PJRT_Buffer_Type_PJRT_Buffer_Type_F32, PJRT_Buffer_Type_PJRT_Buffer_Type_F64,
    PJRT_Buffer_Type_PJRT_Buffer_Type_INVALID, PJRT_Buffer_Type_PJRT_Buffer_Type_S16,
    PJRT_Buffer_Type_PJRT_Buffer_Type_S32, PJRT_Buffer_Type_PJRT_Buffer_Type_S64,
    PJRT_Buffer_Type_PJRT_Buffer_Type_S8, PJRT_Buffer_Type_PJRT_Buffer_Type_U16,
    PJRT_Buffer_Type_PJRT_Buffer_Type_U32, PJRT_Buffer_Type_PJRT_Buffer_Type_U64,
    PJRT_Buffer_Type_PJRT_Buffer_Type_U8,
};

use crate::error::{Error, Result};

/// A compile-time tag for a PJRT-representable element type.
pub trait Type: Sized + Copy + Debug + 'static {
    const NAME: &'static str;
    const PRIMITIVE_TYPE: PrimitiveType;
    const TYPE: Self;
    const SIZE: usize = std::mem::size_of::<Self::ElemType>();
    const ALIGNMENT: usize = std::mem::align_of::<Self::ElemType>();
    type ElemType: ElemType<Type = Self>;
}

/// The Rust-native element type backing a [`Type`] tag.
pub trait ElemType: Sized + Copy + Debug + 'static {
    type Type: Type<ElemType = Self>;
}

macro_rules! type_tag {
    ($tag:ident, $name:literal, $primitive:ident, $elem:ty) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $tag;

        impl Type for $tag {
            const NAME: &'static str = $name;
            const PRIMITIVE_TYPE: PrimitiveType = PrimitiveType::$primitive;
            const TYPE: Self = $tag;
            type ElemType = $elem;
        }

        impl ElemType for $elem {
            type Type = $tag;
        }
    };
}

type_tag!(F32, "f32", F32, f32);
type_tag!(F64, "f64", F64, f64);
type_tag!(I8, "i8", S8, i8);
type_tag!(I16, "i16", S16, i16);
type_tag!(I32, "i32", S32, i32);
type_tag!(I64, "i64", S64, i64);
type_tag!(U8, "u8", U8, u8);
type_tag!(U16, "u16", U16, u16);
type_tag!(U32, "u32", U32, u32);
type_tag!(U64, "u64", U64, u64);

/// Mirrors `PJRT_Buffer_Type`, trimmed to the primitive types this crate's
/// type tags cover, plus `Invalid`.
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveType {
    Invalid = PJRT_Buffer_Type_PJRT_Buffer_Type_INVALID as i32,
    S8 = PJRT_Buffer_Type_PJRT_Buffer_Type_S8 as i32,
    S16 = PJRT_Buffer_Type_PJRT_Buffer_Type_S16 as i32,
    S32 = PJRT_Buffer_Type_PJRT_Buffer_Type_S32 as i32,
    S64 = PJRT_Buffer_Type_PJRT_Buffer_Type_S64 as i32,
    U8 = PJRT_Buffer_Type_PJRT_Buffer_Type_U8 as i32,
    U16 = PJRT_Buffer_Type_PJRT_Buffer_Type_U16 as i32,
    U32 = PJRT_Buffer_Type_PJRT_Buffer_Type_U32 as i32,
    U64 = PJRT_Buffer_Type_PJRT_Buffer_Type_U64 as i32,
    F32 = PJRT_Buffer_Type_PJRT_Buffer_Type_F32 as i32,
    F64 = PJRT_Buffer_Type_PJRT_Buffer_Type_F64 as i32,
}

impl TryFrom<PJRT_Buffer_Type> for PrimitiveType {
    type Error = Error;

    #[allow(non_snake_case)]
    fn try_from(value: PJRT_Buffer_Type) -> Result<Self> {
        match value {
            PJRT_Buffer_Type_PJRT_Buffer_Type_INVALID => Ok(Self::Invalid),
            PJRT_Buffer_Type_PJRT_Buffer_Type_S8 => Ok(Self::S8),
            PJRT_Buffer_Type_PJRT_Buffer_Type_S16 => Ok(Self::S16),
            PJRT_Buffer_Type_PJRT_Buffer_Type_S32 => Ok(Self::S32),
            PJRT_Buffer_Type_PJRT_Buffer_Type_S64 => Ok(Self::S64),
            PJRT_Buffer_Type_PJRT_Buffer_Type_U8 => Ok(Self::U8),
            PJRT_Buffer_Type_PJRT_Buffer_Type_U16 => Ok(Self::U16),
            PJRT_Buffer_Type_PJRT_Buffer_Type_U32 => Ok(Self::U32),
            PJRT_Buffer_Type_PJRT_Buffer_Type_U64 => Ok(Self::U64),
            PJRT_Buffer_Type_PJRT_Buffer_Type_F32 => Ok(Self::F32),
            PJRT_Buffer_Type_PJRT_Buffer_Type_F64 => Ok(Self::F64),
            other => Err(Error::InvalidPrimitiveType(other as i32)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32_type_properties() {
        assert_eq!(F32::NAME, "f32");
        assert_eq!(F32::PRIMITIVE_TYPE, PrimitiveType::F32);
        assert_eq!(F32::SIZE, 4);
        assert_eq!(F32::ALIGNMENT, 4);
    }

    #[test]
    fn i64_type_properties() {
        assert_eq!(I64::NAME, "i64");
        assert_eq!(I64::PRIMITIVE_TYPE, PrimitiveType::S64);
        assert_eq!(I64::SIZE, 8);
    }

    #[test]
    fn primitive_type_from_pjrt_buffer_type() {
        let primitive = PrimitiveType::try_from(PJRT_Buffer_Type_PJRT_Buffer_Type_F32).unwrap();
        assert_eq!(primitive, PrimitiveType::F32);

        let primitive = PrimitiveType::try_from(PJRT_Buffer_Type_PJRT_Buffer_Type_S32).unwrap();
        assert_eq!(primitive, PrimitiveType::S32);
    }

    #[test]
    fn unsupported_buffer_type_is_rejected() {
        let result = PrimitiveType::try_from(9999);
        assert!(matches!(result, Err(Error::InvalidPrimitiveType(9999))));
    }

    #[test]
    fn all_primitive_type_values_are_unique() {
        let types = [
            PrimitiveType::Invalid,
            PrimitiveType::S8,
            PrimitiveType::S16,
            PrimitiveType::S32,
            PrimitiveType::S64,
            PrimitiveType::U8,
            PrimitiveType::U16,
            PrimitiveType::U32,
            PrimitiveType::U64,
            PrimitiveType::F32,
            PrimitiveType::F64,
        ];
        let mut seen = std::collections::HashSet::new();
        for t in types {
            assert!(seen.insert(t as i32), "duplicate value for {t:?}");
        }
    }

    #[test]
    fn all_type_tags_implement_type() {
        fn check<T: Type>() {}
        check::<F32>();
        check::<F64>();
        check::<I8>();
        check::<I16>();
        check::<I32>();
        check::<I64>();
        check::<U8>();
        check::<U16>();
        check::<U32>();
        check::<U64>();
    }
}
