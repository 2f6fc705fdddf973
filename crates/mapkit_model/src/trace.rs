//! Field path tracking for diagnostics.
//!
//! With the `debug` feature and `debug_assertions`, every nested conversion
//! pushes the field it descends into, so a skipped value deep inside a
//! document can be reported as `order.items.price` instead of `price`.
//! Otherwise the stack is zero sized and renders nothing.

use core::fmt::{Display, Formatter};

#[cfg(all(debug_assertions, feature = "debug"))]
use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// FieldTrail

#[derive(Default, Clone, Debug)]
pub(crate) struct FieldTrail {
    #[cfg(all(debug_assertions, feature = "debug"))]
    stack: Vec<&'static str>,
}

impl FieldTrail {
    pub const fn new() -> Self {
        Self {
            #[cfg(all(debug_assertions, feature = "debug"))]
            stack: Vec::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, _field: &'static str) {
        #[cfg(all(debug_assertions, feature = "debug"))]
        self.stack.push(_field);
    }

    #[inline]
    pub fn pop(&mut self) {
        #[cfg(all(debug_assertions, feature = "debug"))]
        self.stack.pop();
    }
}

impl Display for FieldTrail {
    #[cfg(all(debug_assertions, feature = "debug"))]
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        if self.stack.is_empty() {
            return Ok(());
        }
        f.write_str(" (at `")?;
        for (i, name) in self.stack.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(name)?;
        }
        f.write_str("`)")
    }

    #[cfg(not(all(debug_assertions, feature = "debug")))]
    fn fmt(&self, _: &mut Formatter<'_>) -> core::fmt::Result {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(all(test, debug_assertions, feature = "debug"))]
mod tests {
    use super::FieldTrail;
    use alloc::string::ToString;

    #[test]
    fn renders_nested_path() {
        let mut trail = FieldTrail::new();
        assert_eq!(trail.to_string(), "");

        trail.push("order");
        trail.push("price");
        assert_eq!(trail.to_string(), " (at `order.price`)");

        trail.pop();
        assert_eq!(trail.to_string(), " (at `order`)");
    }
}
