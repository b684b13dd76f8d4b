//! Right-hand operands of container composition

use std::fmt;

/// What a container can be composed with
///
/// `C` is the container type accepted as a peer, `V` the value type a
/// function operand transforms. A function returning `None` drops the
/// entry it was applied to.
pub enum Operand<'a, C, V> {
    /// Another container of the peer type
    Container(&'a C),
    /// A value transform; `None` discards the value
    Function(&'a dyn Fn(&V) -> Option<V>),
    /// Composition leaves the receiver unchanged
    Identity,
    /// Composition yields the empty container
    Zero,
    /// Replicate the receiver `n` times
    Scale(usize),
}

impl<C, V> Operand<'_, C, V> {
    /// Short name of the variant, used in logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Container(_) => "container",
            Self::Function(_) => "function",
            Self::Identity => "identity",
            Self::Zero => "zero",
            Self::Scale(_) => "scale",
        }
    }
}

impl<C, V> Clone for Operand<'_, C, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, V> Copy for Operand<'_, C, V> {}

impl<C, V> fmt::Debug for Operand<'_, C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scale(n) => write!(f, "Operand::Scale({})", n),
            other => write!(f, "Operand::{}", other.kind()),
        }
    }
}
