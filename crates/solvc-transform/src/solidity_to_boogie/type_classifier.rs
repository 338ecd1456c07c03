use solvc_core::{Type, TypeCategory};

/// Queries about the fixed-width shape of source types.
pub struct TypeClassifier;

impl TypeClassifier {
    /// Whether `ty` has a fixed bit width and signedness. Tuples qualify when
    /// every present component does.
    pub fn is_bit_precise(ty: &Type) -> bool {
        match ty.category() {
            TypeCategory::Integer | TypeCategory::FixedBytes | TypeCategory::Enum => true,
            TypeCategory::Tuple => match ty {
                Type::Tuple(components) => components.iter().flatten().all(Self::is_bit_precise),
                _ => false,
            },
            TypeCategory::Other => false,
        }
    }

    /// # Panics
    ///
    /// Panics if `ty` is not a bit-precise scalar type. Callers must check
    /// [`TypeClassifier::is_bit_precise`] and rule out tuples first.
    pub fn bit_width(ty: &Type) -> u32 {
        match ty {
            Type::Uint(bits) | Type::Int(bits) => u32::from(*bits),
            Type::FixedBytes(bytes) => u32::from(*bytes) * 8,
            Type::Enum(_) => 256,
            other => panic!("bit width requested for non-bit-precise type {}", other),
        }
    }

    /// # Panics
    ///
    /// Same contract as [`TypeClassifier::bit_width`].
    pub fn is_signed(ty: &Type) -> bool {
        match ty {
            Type::Int(_) => true,
            Type::Uint(_) | Type::FixedBytes(_) | Type::Enum(_) => false,
            other => panic!("signedness requested for non-bit-precise type {}", other),
        }
    }

    /// Width and signedness together, for scalar bit-precise types.
    pub fn shape(ty: &Type) -> Option<(u32, bool)> {
        if Self::is_bit_precise(ty) && !ty.is_tuple() {
            Some((Self::bit_width(ty), Self::is_signed(ty)))
        } else {
            None
        }
    }
}
