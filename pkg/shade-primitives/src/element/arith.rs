use core::ops::{BitAnd, BitOr, BitXor, Shl, Shr};

use crate::Element;

/// Bitwise operations only; field arithmetic happens on [`Base`][crate::Base]
macro_rules! bitop {
    ($trait:ident, $f:ident, $op:tt) => {
        impl $trait for Element {
            type Output = Element;

            #[inline]
            fn $f(self, rhs: Element) -> Self::Output {
                Element(self.0 $op rhs.0)
            }
        }
    };
}

bitop!(BitXor, bitxor, ^);
bitop!(BitOr, bitor, |);
bitop!(BitAnd, bitand, &);

impl Shl<u32> for Element {
    type Output = Element;

    #[inline]
    fn shl(self, rhs: u32) -> Self::Output {
        Element(self.0 << rhs)
    }
}

impl Shr<u32> for Element {
    type Output = Element;

    #[inline]
    fn shr(self, rhs: u32) -> Self::Output {
        Element(self.0 >> rhs)
    }
}

#[cfg(test)]
mod tests {
    use crate::Element;

    #[test]
    fn flipping_a_bit_twice_is_identity() {
        let element = Element::new(0xdead_beef);
        let mask = Element::ONE << 17;

        assert_ne!(element ^ mask, element);
        assert_eq!((element ^ mask) ^ mask, element);
        assert_eq!((Element::ONE << 160) >> 160, Element::ONE);
    }
}
