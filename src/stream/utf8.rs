//! UTF-8 decoding of byte chunks whose boundaries may split a character.

use std::io;

/// Decodes consecutive byte chunks, carrying an incomplete trailing UTF-8
/// sequence over to the next chunk
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    carry: Vec<u8>,
}

impl Utf8Decoder {
    /// Creates a decoder with nothing carried over
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes as much of `carry + bytes` as forms complete characters
    pub fn decode(&mut self, bytes: &[u8]) -> io::Result<String> {
        self.carry.extend_from_slice(bytes);
        let valid = match std::str::from_utf8(&self.carry) {
            Ok(_) => self.carry.len(),
            // An incomplete sequence at the very end may still be completed
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        };
        let rest = self.carry.split_off(valid);
        let complete = std::mem::replace(&mut self.carry, rest);
        String::from_utf8(complete).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Fails if the input ended in the middle of a character
    pub fn finish(&mut self) -> io::Result<()> {
        if self.carry.is_empty() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "input ends inside a UTF-8 sequence ({} dangling bytes)",
                    self.carry.len()
                ),
            ))
        }
    }
}
