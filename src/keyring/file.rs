//! The on-disk keyring binary format: `MAGIC | FILETYPE | record*`.
//!
//! Every integer is little-endian. A record's SIGNATURE equals the same
//! toolkit-wide magic word as the file header. The 32-bit field between
//! SIGNATURE and VERSION is the historical (1,0)/(1,>0) wart described in
//! the module root: under protocol 1.0 it *is* the timestamp; under any
//! later minor version it is a reserved placeholder and a full 64-bit
//! timestamp follows the version fields instead.

use std::io::{self, Read, Write};

use crate::{error::KeyringError, fileio, keyring::record::KeyringRecord};

/// Toolkit-wide magic word, shared by the file header and every record's
/// SIGNATURE field.
pub const MAGIC: u32 = 0x584b_5247; // "XKRG"

/// ASCII literal naming this file format, written once at the start of
/// the file.
pub const FILETYPE: &[u8; 7] = b"keyring";

pub fn write_header(writer: &mut impl Write) -> io::Result<()> {
    fileio::write_file_32_bits(writer, MAGIC)?;
    fileio::write_file_chunk(writer, FILETYPE)
}

/// Validate the header at the start of the file. A magic or filetype
/// mismatch is reported as [`KeyringError::Corrupt`].
pub fn read_header(reader: &mut impl Read) -> Result<(), KeyringError> {
    let magic = fileio::read_file_32_bits(reader).map_err(KeyringError::ReadFailed)?;
    if magic != MAGIC {
        log::warn!("keyring header magic mismatch: got {:#x}", magic);
        return Err(KeyringError::Corrupt("magic mismatch"));
    }
    let mut filetype = [0u8; 7];
    fileio::read_file_chunk(reader, &mut filetype).map_err(KeyringError::ReadFailed)?;
    if &filetype != FILETYPE {
        log::warn!("keyring header filetype mismatch: got {:?}", filetype);
        return Err(KeyringError::Corrupt("filetype mismatch"));
    }
    Ok(())
}

pub fn write_record(writer: &mut impl Write, record: &KeyringRecord) -> Result<(), KeyringError> {
    let (major, minor) = record.protocol_version();
    fileio::write_file_32_bits(writer, MAGIC).map_err(KeyringError::WriteFailed)?;
    fileio::write_file_32_bits(writer, 0).map_err(KeyringError::WriteFailed)?; // reserved
    fileio::write_file_16_bits(writer, major).map_err(KeyringError::WriteFailed)?;
    fileio::write_file_16_bits(writer, minor).map_err(KeyringError::WriteFailed)?;
    fileio::write_file_64_bits(writer, record.timestamp()).map_err(KeyringError::WriteFailed)?;
    write_length_prefixed(writer, record.id())?;
    write_length_prefixed(writer, record.key())?;
    write_length_prefixed(writer, record.nonce())?;
    Ok(())
}

fn write_length_prefixed(writer: &mut impl Write, bytes: &[u8]) -> Result<(), KeyringError> {
    fileio::write_file_32_bits(writer, bytes.len() as u32).map_err(KeyringError::WriteFailed)?;
    fileio::write_file_chunk(writer, bytes).map_err(KeyringError::WriteFailed)
}

/// Read the next record. Returns `Ok(None)` on a clean end-of-file
/// (no bytes at all where a SIGNATURE was expected); any other short
/// read is reported as `Corrupt`.
pub fn read_record(
    reader: &mut impl Read,
    path: impl Into<std::path::PathBuf>,
) -> Result<Option<KeyringRecord>, KeyringError> {
    let mut signature_bytes = [0u8; 4];
    let mut filled = 0;
    loop {
        match reader.read(&mut signature_bytes[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(KeyringError::Corrupt("partial record signature")),
            Ok(n) => {
                filled += n;
                if filled == signature_bytes.len() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(KeyringError::ReadFailed(e)),
        }
    }
    let signature = u32::from_le_bytes(signature_bytes);
    if signature != MAGIC {
        log::warn!("keyring record signature mismatch: got {:#x}", signature);
        return Err(KeyringError::Corrupt("record signature mismatch"));
    }

    let reserved_or_timestamp32 =
        fileio::read_file_32_bits(reader).map_err(KeyringError::ReadFailed)?;
    let major = fileio::read_file_16_bits(reader).map_err(KeyringError::ReadFailed)?;
    let minor = fileio::read_file_16_bits(reader).map_err(KeyringError::ReadFailed)?;
    if major != 1 {
        log::warn!("keyring record has unknown protocol version {major}.{minor}");
        return Err(KeyringError::UnknownVersion(major, minor));
    }
    let timestamp = if (major, minor) == (1, 0) {
        reserved_or_timestamp32 as u64
    } else {
        fileio::read_file_64_bits(reader).map_err(KeyringError::ReadFailed)?
    };

    let mut record = KeyringRecord::new(path);
    record.set_protocol_version(major, minor);
    record.set_timestamp(timestamp);
    record.set_id(&read_length_prefixed(reader)?);
    record.set_key(&read_length_prefixed(reader)?);
    record.set_nonce(&read_length_prefixed(reader)?);
    Ok(Some(record))
}

fn read_length_prefixed(reader: &mut impl Read) -> Result<Vec<u8>, KeyringError> {
    let len = fileio::read_file_32_bits(reader).map_err(KeyringError::ReadFailed)? as usize;
    let mut buf = vec![0u8; len];
    fileio::read_file_chunk(reader, &mut buf).map_err(KeyringError::ReadFailed)?;
    Ok(buf)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_round_trip() {
        let mut buf = Vec::new();
        write_header(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        read_header(&mut cursor).unwrap();
    }

    #[test]
    fn record_round_trip_current_protocol() {
        let mut record = KeyringRecord::new("/tmp/example");
        record.set_id(b"\x41");
        record.set_key(&[0x42; 16]);
        record.set_nonce(&[0x43; 16]);

        let mut buf = Vec::new();
        write_record(&mut buf, &record).unwrap();

        let mut cursor = Cursor::new(buf);
        let read_back = read_record(&mut cursor, "/tmp/example").unwrap().unwrap();
        assert_eq!(read_back.id(), record.id());
        assert_eq!(read_back.key(), record.key());
        assert_eq!(read_back.nonce(), record.nonce());
        assert_eq!(read_back.timestamp(), record.timestamp());
        assert_eq!(read_back.protocol_version(), (1, 1));
    }

    #[test]
    fn clean_eof_yields_none() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        assert!(read_record(&mut cursor, "/tmp/example").unwrap().is_none());
    }

    #[test]
    fn partial_record_is_corrupt() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3]);
        assert!(read_record(&mut cursor, "/tmp/example").is_err());
    }

    #[test]
    fn version_1_0_reads_the_32_bit_timestamp_field() {
        let mut buf = Vec::new();
        fileio::write_file_32_bits(&mut buf, MAGIC).unwrap();
        fileio::write_file_32_bits(&mut buf, 1_000_000).unwrap(); // timestamp under 1.0
        fileio::write_file_16_bits(&mut buf, 1).unwrap();
        fileio::write_file_16_bits(&mut buf, 0).unwrap();
        fileio::write_file_32_bits(&mut buf, 0).unwrap(); // id len
        fileio::write_file_32_bits(&mut buf, 0).unwrap(); // key len
        fileio::write_file_32_bits(&mut buf, 0).unwrap(); // nonce len

        let mut cursor = Cursor::new(buf);
        let record = read_record(&mut cursor, "/tmp/example").unwrap().unwrap();
        assert_eq!(record.timestamp(), 1_000_000);
        assert_eq!(record.protocol_version(), (1, 0));
    }

    #[test]
    fn unknown_major_version_is_rejected() {
        let mut buf = Vec::new();
        fileio::write_file_32_bits(&mut buf, MAGIC).unwrap();
        fileio::write_file_32_bits(&mut buf, 0).unwrap(); // reserved
        fileio::write_file_16_bits(&mut buf, 2).unwrap(); // major 2: unknown
        fileio::write_file_16_bits(&mut buf, 0).unwrap();

        let mut cursor = Cursor::new(buf);
        assert!(matches!(
            read_record(&mut cursor, "/tmp/example"),
            Err(KeyringError::UnknownVersion(2, 0))
        ));
    }
}
