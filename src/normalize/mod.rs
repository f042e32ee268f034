/// Type-specific answer canonicalization.
///
/// Both normalizers follow the same convention: an ordered chain of pure
/// `&str -> Option<String>` strategies tried in sequence, first success wins,
/// and exhausting the chain returns the input unchanged. A failed parse is
/// never an error here; it just means the downstream metric will see a
/// near-certain mismatch, which is the intended signal.

pub mod date;
pub mod number;

pub use date::DateNormalizer;
pub use number::NumberNormalizer;
