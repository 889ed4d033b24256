//! Common test utilities: synthetic target objects and temporary files.
//!
//! Integration tests never touch a foreign process. Instead they build
//! objects with a known byte layout in ordinary heap memory and point
//! wrappers at them.

#![allow(dead_code)]

use std::io::Write;
use std::mem::size_of;

use remodel::RawAddress;
use tempfile::NamedTempFile;

/// A zeroed, 16-byte aligned block of memory standing in for a target object.
pub struct SyntheticObject {
    words: Vec<u128>,
    len: usize,
}

impl SyntheticObject {
    /// Zeroed object of `len` bytes.
    pub fn new(len: usize) -> Self {
        let words = vec![0u128; len.div_ceil(size_of::<u128>()).max(1)];
        SyntheticObject { words, len }
    }

    /// Address of the first byte.
    pub fn address(&mut self) -> RawAddress {
        RawAddress::from_mut_ptr(self.words.as_mut_ptr())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Write `value` at byte `offset`.
    pub fn write<T: Copy>(&mut self, offset: usize, value: T) {
        assert!(offset + size_of::<T>() <= self.len, "write past end of object");
        let base = self.address();
        unsafe { remodel::memory::write(base.add(offset), value) }
    }

    /// Read a `T` at byte `offset`.
    pub fn read<T: Copy>(&mut self, offset: usize) -> T {
        assert!(offset + size_of::<T>() <= self.len, "read past end of object");
        let base = self.address();
        unsafe { remodel::memory::read(base.add(offset)) }
    }

    /// Copy of the object's bytes.
    pub fn bytes(&mut self) -> Vec<u8> {
        let base = self.address();
        unsafe { remodel::memory::bytes(base, self.len) }.to_vec()
    }
}

/// A virtual table: a heap array of entry-point addresses.
pub struct SyntheticVTable {
    slots: Vec<usize>,
}

impl SyntheticVTable {
    pub fn new(slots: Vec<usize>) -> Self {
        SyntheticVTable { slots }
    }

    pub fn address(&self) -> RawAddress {
        RawAddress::from_ptr(self.slots.as_ptr())
    }

    /// Replace slot `index` in place.
    pub fn patch(&mut self, index: usize, entry: usize) {
        self.slots[index] = entry;
    }
}

/// Creates a temporary file with the given content.
pub fn create_temp_file(content: &[u8]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content).unwrap();
    temp_file
}
