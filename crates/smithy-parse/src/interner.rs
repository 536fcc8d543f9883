use std::hash::BuildHasher as _;
use std::rc::Rc;

use rustc_hash::FxBuildHasher;

/// Lossy string cache: each slot keeps the most recent string hashed to it.
pub(crate) struct StringTable {
    slots: Box<[Option<Rc<str>>]>,
}

impl StringTable {
    const SLOTS: usize = 1024;

    pub(crate) fn new() -> Self {
        Self { slots: vec![None; Self::SLOTS].into_boxed_slice() }
    }

    pub(crate) fn intern(&mut self, text: &str) -> Rc<str> {
        let index = FxBuildHasher.hash_one(text) as usize & (Self::SLOTS - 1);
        let slot = &mut self.slots[index];

        if let Some(existing) = slot {
            if **existing == *text {
                return Rc::clone(existing);
            }
        }

        let interned: Rc<str> = Rc::from(text);
        *slot = Some(Rc::clone(&interned));
        interned
    }
}
