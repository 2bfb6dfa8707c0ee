use std::collections::BTreeMap;

use crate::schema::FieldDescriptor;

/// Anything carrying an optional explicit output position
pub trait Ordered {
    /// Zero-based target slot, if explicitly set
    fn explicit_order(&self) -> Option<u32>;
}

impl<T> Ordered for FieldDescriptor<T> {
    fn explicit_order(&self) -> Option<u32> {
        self.meta().order
    }
}

/// Reorder fields according to their explicit order
///
/// Orders are zero-based: `order = 0` is the first output column.
///
/// 1. Fields without an order keep their relative order and form the base sequence.
/// 2. Ordered fields claim their slot in input order. A claimed slot is never
///    taken away: a later field with the same order moves to the next free slot.
/// 3. Claimed fields are inserted into the base sequence by ascending slot;
///    slots past the end of the sequence append.
///
/// The result is always a permutation of `fields`. Without any explicit order
/// the input is returned unchanged.
pub fn plan<F: Ordered>(fields: Vec<F>) -> Vec<F> {
    if fields.iter().all(|f| f.explicit_order().is_none()) {
        return fields;
    }
    let mut base = Vec::with_capacity(fields.len());
    let mut claimed: BTreeMap<usize, F> = BTreeMap::new();
    for field in fields {
        match field.explicit_order() {
            None => base.push(field),
            Some(order) => {
                let mut slot = order as usize;
                while claimed.contains_key(&slot) {
                    slot += 1;
                }
                claimed.insert(slot, field);
            }
        }
    }
    for (slot, field) in claimed {
        if slot <= base.len() {
            base.insert(slot, field);
        } else {
            base.push(field);
        }
    }
    base
}
