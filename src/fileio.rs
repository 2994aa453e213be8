//! Little-endian fixed-width integer I/O helpers, shared by the keyring
//! layer.
//!
//! Grounded on the source's `ReadFileChunk`/`WriteFileChunk` and the
//! `ReadFile{16,32,64}Bits`/`WriteFile{16,32,64}Bits` family: every
//! transfer is least-significant-byte-first regardless of host byte
//! order, and short reads/writes caused by a signal are retried rather
//! than treated as failure.

use std::io::{self, ErrorKind, Read, Write};

/// Read exactly `buf.len()` bytes, retrying on [`ErrorKind::Interrupted`]
/// and failing on any other short read.
pub fn read_file_chunk(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "short read in read_file_chunk",
                ))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Write all of `buf`, retrying on [`ErrorKind::Interrupted`] and failing
/// on any other short write.
pub fn write_file_chunk(writer: &mut impl Write, buf: &[u8]) -> io::Result<()> {
    let mut written = 0;
    while written < buf.len() {
        match writer.write(&buf[written..]) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::WriteZero,
                    "short write in write_file_chunk",
                ))
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

pub fn read_file_16_bits(reader: &mut impl Read) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    read_file_chunk(reader, &mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

pub fn write_file_16_bits(writer: &mut impl Write, value: u16) -> io::Result<()> {
    write_file_chunk(writer, &value.to_le_bytes())
}

pub fn read_file_32_bits(reader: &mut impl Read) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    read_file_chunk(reader, &mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub fn write_file_32_bits(writer: &mut impl Write, value: u32) -> io::Result<()> {
    write_file_chunk(writer, &value.to_le_bytes())
}

pub fn read_file_64_bits(reader: &mut impl Read) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    read_file_chunk(reader, &mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

pub fn write_file_64_bits(writer: &mut impl Write, value: u64) -> io::Result<()> {
    write_file_chunk(writer, &value.to_le_bytes())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trip_every_width() {
        let mut buf = Vec::new();
        write_file_16_bits(&mut buf, 0xabcd).unwrap();
        write_file_32_bits(&mut buf, 0xdeadbeef).unwrap();
        write_file_64_bits(&mut buf, 0x0123456789abcdef).unwrap();

        let mut cursor = Cursor::new(buf);
        assert_eq!(read_file_16_bits(&mut cursor).unwrap(), 0xabcd);
        assert_eq!(read_file_32_bits(&mut cursor).unwrap(), 0xdeadbeef);
        assert_eq!(read_file_64_bits(&mut cursor).unwrap(), 0x0123456789abcdef);
    }

    #[test]
    fn short_read_is_an_error() {
        let mut cursor = Cursor::new(vec![0u8; 3]);
        assert!(read_file_32_bits(&mut cursor).is_err());
    }
}
