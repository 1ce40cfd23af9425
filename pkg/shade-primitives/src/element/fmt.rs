use std::fmt::{Binary, Debug, Display, Formatter, LowerHex, Result, UpperHex};

use crate::Element;

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl Debug for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Display::fmt(self, f)
    }
}

macro_rules! fmt_impl {
    ($t:ident) => {
        impl $t for Element {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result {
                $t::fmt(&self.0, f)
            }
        }
    };
}

fmt_impl!(LowerHex);
fmt_impl!(UpperHex);
fmt_impl!(Binary);
