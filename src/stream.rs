use crate::error::Result;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

pub const CHUNK_SIZE: usize = 32 * 1024;

/// Iterates a reader in chunks of at most `chunk_size` bytes.
pub struct Chunks<R> {
    reader: R,
    buffer: Vec<u8>,
    done: bool,
}

impl<R: Read> Chunks<R> {
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            buffer: vec![0u8; chunk_size.max(1)],
            done: false,
        }
    }
}

impl<R: Read> Iterator for Chunks<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.reader.read(&mut self.buffer) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(read) => return Some(Ok(self.buffer[..read].to_vec())),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Writes every non-empty chunk to `destination` in arrival order, truncating
/// any existing file. Returns the number of bytes written.
pub fn save_response_content<I>(chunks: I, destination: &Path) -> Result<u64>
where
    I: IntoIterator<Item = io::Result<Vec<u8>>>,
{
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(destination)?;
    let mut written = 0u64;
    for chunk in chunks {
        let chunk = chunk?;
        // keep-alive
        if chunk.is_empty() {
            continue;
        }
        file.write_all(&chunk)?;
        written += chunk.len() as u64;
    }
    file.flush()?;

    Ok(written)
}

/// Streams `reader` into `destination` using [`CHUNK_SIZE`] chunks.
pub fn save_reader<R: Read>(reader: R, destination: &Path) -> Result<u64> {
    save_response_content(Chunks::new(reader, CHUNK_SIZE), destination)
}
