// emugl-egl/src/stream.rs
//
//! A read/write cursor over a caller-owned buffer, used when snapshotting translator state.

use std::io::{self, ErrorKind, Read, Write};

/// Writes append at the write position; reads consume bytes between the read and the write
/// positions. Neither wraps around: once the buffer is full, writes return 0.
pub struct InplaceStream<'a> {
    data: &'a mut [u8],
    read_pos: usize,
    write_pos: usize,
}

impl<'a> InplaceStream<'a> {
    pub fn new(data: &'a mut [u8]) -> InplaceStream<'a> {
        InplaceStream { data, read_pos: 0, write_pos: 0 }
    }

    #[inline]
    pub fn read_pos(&self) -> usize {
        self.read_pos
    }

    /// The number of bytes written but not yet read.
    #[inline]
    pub fn read_size(&self) -> usize {
        self.write_pos - self.read_pos
    }

    #[inline]
    pub fn written_size(&self) -> usize {
        self.write_pos
    }

    /// Serializes the cursor and the written part of the buffer. Fails with `InvalidInput` for
    /// buffers whose length doesn't fit the 32-bit header.
    pub fn save<W: Write>(&self, stream: &mut W) -> io::Result<()> {
        save_buffer(stream, self.data.len(), self.read_pos, &self.data[..self.write_pos])
    }

    /// Restores what `save()` wrote. Fails with `InvalidData` if the saved state doesn't fit
    /// this buffer, leaving the stream untouched.
    pub fn load<R: Read>(&mut self, stream: &mut R) -> io::Result<()> {
        let mut header = [0u32; 3];
        for value in &mut header {
            let mut bytes = [0; 4];
            stream.read_exact(&mut bytes)?;
            *value = u32::from_be_bytes(bytes);
        }

        let [length, read_pos, write_pos] = header.map(|value| value as usize);
        if length > self.data.len() || write_pos > length || read_pos > write_pos {
            return Err(io::Error::new(ErrorKind::InvalidData, "saved stream doesn't fit buffer"));
        }

        stream.read_exact(&mut self.data[..write_pos])?;
        self.read_pos = read_pos;
        self.write_pos = write_pos;
        Ok(())
    }
}

fn save_buffer<W: Write>(stream: &mut W, length: usize, read_pos: usize, written: &[u8])
                         -> io::Result<()> {
    let mut header = [0u32; 3];
    for (field, value) in header.iter_mut().zip([length, read_pos, written.len()]) {
        *field = u32::try_from(value).map_err(|_| {
            io::Error::new(ErrorKind::InvalidInput, "stream too large to save")
        })?;
    }
    for field in header {
        stream.write_all(&field.to_be_bytes())?;
    }
    stream.write_all(written)
}

impl<'a> Read for InplaceStream<'a> {
    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        let count = buffer.len().min(self.read_size());
        buffer[..count].copy_from_slice(&self.data[self.read_pos..self.read_pos + count]);
        self.read_pos += count;
        Ok(count)
    }
}

impl<'a> Write for InplaceStream<'a> {
    fn write(&mut self, buffer: &[u8]) -> io::Result<usize> {
        let count = buffer.len().min(self.data.len() - self.write_pos);
        self.data[self.write_pos..self.write_pos + count].copy_from_slice(&buffer[..count]);
        self.write_pos += count;
        Ok(count)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
