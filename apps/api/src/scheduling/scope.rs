use crate::calendar::{ColorStrategy, Palette};

/// Whose records a request may see.
///
/// Reception works across every veterinarian; a veterinarian only ever sees
/// and edits their own appointments and the reminders attached to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffScope {
    All,
    Veterinarian(i32),
}

impl StaffScope {
    /// Value bound to the `($n::INT4 IS NULL OR veterinarian_id = $n)` filter.
    pub fn veterinarian_filter(&self) -> Option<i32> {
        match *self {
            StaffScope::All => None,
            StaffScope::Veterinarian(id) => Some(id),
        }
    }

    pub fn permits(&self, veterinarian_id: i32) -> bool {
        match *self {
            StaffScope::All => true,
            StaffScope::Veterinarian(id) => id == veterinarian_id,
        }
    }

    /// Reception tells veterinarians apart by palette slot; a veterinarian's
    /// own week is drawn in the palette's first color.
    pub fn color_strategy<'a>(&self, palette: &'a Palette) -> ColorStrategy<'a> {
        match self {
            StaffScope::All => ColorStrategy::PaletteIndexed(palette),
            StaffScope::Veterinarian(_) => ColorStrategy::Fixed(palette.first()),
        }
    }
}
