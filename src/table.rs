//! Open-addressed hash table with linear probing and tombstone deletion,
//! keyed by heap strings. Not wired into string allocation in this scope
//! (see `objects::string_obj`); exercised here as the general-purpose
//! runtime structure the rest of the interpreter will eventually build
//! global/instance storage on top of.

use std::rc::Rc;

use crate::objects::StringObject;
use crate::value::Value;

const MAX_LOAD_FACTOR: f64 = 0.75;

enum Slot {
    Empty,
    Tombstone,
    Occupied(Rc<StringObject>, Value),
}

pub struct Table {
    count: usize,
    entries: Vec<Slot>,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    pub fn new() -> Self {
        Self { count: 0, entries: Vec::new() }
    }

    fn capacity(&self) -> usize {
        self.entries.len()
    }

    fn find_slot(entries: &[Slot], capacity: usize, key: &Rc<StringObject>) -> usize {
        let mut index = (key.hash as usize) % capacity;
        let mut tombstone: Option<usize> = None;
        loop {
            match &entries[index] {
                Slot::Empty => return tombstone.unwrap_or(index),
                Slot::Tombstone => {
                    if tombstone.is_none() {
                        tombstone = Some(index);
                    }
                }
                Slot::Occupied(k, _) => {
                    if k.chars.len() == key.chars.len() && k.chars == key.chars {
                        return index;
                    }
                }
            }
            index = (index + 1) % capacity;
        }
    }

    fn adjust_capacity(&mut self, new_capacity: usize) {
        let mut new_entries: Vec<Slot> = (0..new_capacity).map(|_| Slot::Empty).collect();
        let mut new_count = 0;

        for entry in self.entries.drain(..) {
            if let Slot::Occupied(key, value) = entry {
                let idx = Self::find_slot(&new_entries, new_capacity, &key);
                new_entries[idx] = Slot::Occupied(key, value);
                new_count += 1;
            }
        }

        self.entries = new_entries;
        self.count = new_count;
    }

    /// Inserts or overwrites `key`. Returns `true` if the key was not
    /// already present (reusing a tombstone slot still counts as new).
    pub fn set(&mut self, key: Rc<StringObject>, value: Value) -> bool {
        if (self.count + 1) as f64 > self.capacity() as f64 * MAX_LOAD_FACTOR {
            let new_capacity = if self.capacity() == 0 { 8 } else { self.capacity() * 2 };
            self.adjust_capacity(new_capacity);
        }

        let idx = Self::find_slot(&self.entries, self.capacity(), &key);
        let is_new_key = !matches!(self.entries[idx], Slot::Occupied(..));
        if is_new_key && matches!(self.entries[idx], Slot::Empty) {
            self.count += 1;
        }
        self.entries[idx] = Slot::Occupied(key, value);
        is_new_key
    }

    pub fn get(&self, key: &Rc<StringObject>) -> Option<Value> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = Self::find_slot(&self.entries, self.capacity(), key);
        match &self.entries[idx] {
            Slot::Occupied(_, value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Marks the slot as a tombstone rather than empty, so later probes that
    /// pass through it on the way to a colliding key still find it.
    pub fn delete(&mut self, key: &Rc<StringObject>) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let idx = Self::find_slot(&self.entries, self.capacity(), key);
        if !matches!(self.entries[idx], Slot::Occupied(..)) {
            return false;
        }
        self.entries[idx] = Slot::Tombstone;
        true
    }

    pub fn add_all(&mut self, from: &Table) {
        for entry in &from.entries {
            if let Slot::Occupied(key, value) = entry {
                self.set(Rc::clone(key), value.clone());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
