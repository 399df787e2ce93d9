//! Arena indices for program graph nodes.
//!
//! Nodes refer to each other by `u32` index instead of `Box`/`Rc`, so a
//! finished graph is a handful of flat vectors that the VM and the printer
//! can walk without touching reference counts.

use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create from an arena index.
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Get the index into the arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            /// Get the raw u32 value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Id of the next slot in an arena currently holding `len` entries.
            #[inline]
            pub(crate) fn next(len: usize) -> Self {
                $name(u32::try_from(len).unwrap_or(u32::MAX))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

arena_id!(
    /// Index of an expression node.
    ExprId
);
arena_id!(
    /// Index of a basic block.
    BlockId
);
arena_id!(
    /// Index of a function definition.
    FuncId
);
arena_id!(
    /// Index of a registered native binding.
    NativeId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_names_the_arena() {
        assert_eq!(format!("{:?}", ExprId::new(3)), "ExprId(3)");
        assert_eq!(format!("{:?}", BlockId::new(0)), "BlockId(0)");
    }

    #[test]
    fn next_tracks_arena_length() {
        assert_eq!(FuncId::next(4).index(), 4);
        assert_eq!(NativeId::next(0).raw(), 0);
    }
}
