//! Card and slot identifiers.

/// Opaque card identifier.
///
/// The core never interprets a card's value; only a [`crate::rules::SetRules`]
/// implementation assigns it meaning.
pub type Card = u32;

/// A position on the table grid.
///
/// Slots are dense indices in `0..table_size`; row/column layout is a
/// presentation concern owned by the `UserInterface` collaborator, not the
/// core.
pub type Slot = usize;
