/// Hands out color slots for one pairing run.
///
/// Slots are never wrapped here; renderers reduce them modulo their palette.
#[derive(Debug, Default)]
pub struct ColorSlotAllocator {
    next: usize,
}

impl ColorSlotAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> usize {
        let slot = self.next;
        self.next += 1;
        slot
    }

    /// Number of slots handed out so far.
    pub fn allocated(&self) -> usize {
        self.next
    }
}
