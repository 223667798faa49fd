//! Numeric view shared by every numeric tag.
//!
//! Narrowing is wrapping two's-complement truncation for integers. Floating
//! values are floored into an `i32` first (saturating, NaN becomes zero) and
//! the short/byte views mask that result.

use std::fmt;

#[derive(Clone, Copy, Debug)]
pub enum Number {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Number {
    pub fn byte_value(self) -> i8 {
        match self {
            Number::Byte(v) => v,
            Number::Short(v) => v as i8,
            Number::Int(v) => v as i8,
            Number::Long(v) => v as i8,
            Number::Float(v) => floor_to_int(f64::from(v)) as i8,
            Number::Double(v) => floor_to_int(v) as i8,
        }
    }

    pub fn short_value(self) -> i16 {
        match self {
            Number::Byte(v) => i16::from(v),
            Number::Short(v) => v,
            Number::Int(v) => v as i16,
            Number::Long(v) => v as i16,
            Number::Float(v) => floor_to_int(f64::from(v)) as i16,
            Number::Double(v) => floor_to_int(v) as i16,
        }
    }

    pub fn int_value(self) -> i32 {
        match self {
            Number::Byte(v) => i32::from(v),
            Number::Short(v) => i32::from(v),
            Number::Int(v) => v,
            Number::Long(v) => v as i32,
            Number::Float(v) => floor_to_int(f64::from(v)),
            Number::Double(v) => floor_to_int(v),
        }
    }

    pub fn long_value(self) -> i64 {
        match self {
            Number::Byte(v) => i64::from(v),
            Number::Short(v) => i64::from(v),
            Number::Int(v) => i64::from(v),
            Number::Long(v) => v,
            Number::Float(v) => v as i64,
            Number::Double(v) => v.floor() as i64,
        }
    }

    pub fn float_value(self) -> f32 {
        match self {
            Number::Byte(v) => f32::from(v),
            Number::Short(v) => f32::from(v),
            Number::Int(v) => v as f32,
            Number::Long(v) => v as f32,
            Number::Float(v) => v,
            Number::Double(v) => v as f32,
        }
    }

    pub fn double_value(self) -> f64 {
        match self {
            Number::Byte(v) => f64::from(v),
            Number::Short(v) => f64::from(v),
            Number::Int(v) => f64::from(v),
            Number::Long(v) => v as f64,
            Number::Float(v) => f64::from(v),
            Number::Double(v) => v,
        }
    }

    /// True iff the byte view is nonzero, so `256` reads as false.
    pub fn as_boolean(self) -> bool {
        self.byte_value() != 0
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Number::Byte(_) | Number::Short(_) | Number::Int(_) | Number::Long(_)
        )
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Byte(a), Number::Byte(b)) => a == b,
            (Number::Short(a), Number::Short(b)) => a == b,
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Long(a), Number::Long(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a.to_bits() == b.to_bits(),
            (Number::Double(a), Number::Double(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Byte(v) => write!(f, "{v}"),
            Number::Short(v) => write!(f, "{v}"),
            Number::Int(v) => write!(f, "{v}"),
            Number::Long(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v:?}"),
            Number::Double(v) => write!(f, "{v:?}"),
        }
    }
}

macro_rules! number_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Number {
            fn from(value: $ty) -> Self {
                Number::$variant(value)
            }
        })*
    };
}

number_from!(i8 => Byte, i16 => Short, i32 => Int, i64 => Long, f32 => Float, f64 => Double);

fn floor_to_int(value: f64) -> i32 {
    let truncated = value as i32;
    if value < f64::from(truncated) && truncated != i32::MIN {
        truncated.wrapping_sub(1)
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_views_truncate_bitwise() {
        let value = Number::Long(0x1_2345_6789);
        assert_eq!(value.int_value(), 0x2345_6789);
        assert_eq!(value.short_value(), 0x6789);
        assert_eq!(value.byte_value(), 0x89u8 as i8);

        let negative = Number::Long(-1);
        assert_eq!(negative.int_value(), -1);
        assert_eq!(negative.short_value(), -1);
        assert_eq!(negative.byte_value(), -1);

        let high = Number::Long(0xFFFF_FFFF);
        assert_eq!(high.int_value(), -1);
        assert_eq!(Number::Long(0x8000).short_value(), i16::MIN);
    }

    #[test]
    fn boolean_view_uses_byte_truncation() {
        assert!(Number::Int(1).as_boolean());
        assert!(!Number::Int(256).as_boolean());
        assert!(Number::Int(257).as_boolean());
        assert!(!Number::Double(0.5).as_boolean());
    }

    #[test]
    fn floating_views_floor_and_saturate() {
        assert_eq!(Number::Double(-1.5).int_value(), -2);
        assert_eq!(Number::Double(2.9).int_value(), 2);
        assert_eq!(Number::Double(1e20).int_value(), i32::MAX);
        assert_eq!(Number::Double(f64::NAN).int_value(), 0);
        assert_eq!(Number::Float(300.0).byte_value(), 44);
        assert_eq!(Number::Double(-1.5).long_value(), -2);
        assert_eq!(Number::Float(-1.5).long_value(), -1);
    }

    #[test]
    fn widening_is_plain_conversion() {
        assert_eq!(Number::Byte(-3).long_value(), -3);
        assert_eq!(Number::Int(7).double_value(), 7.0);
        assert_eq!(Number::Long(i64::MAX).float_value(), i64::MAX as f32);
    }
}
