use std::io::{self, Write};

/// Write a u32 in little-endian format
pub fn write_u32_le<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Read a u32 from a byte slice at the given offset
/// Returns None if fewer than 4 bytes remain
pub fn slice_u32_le(data: &[u8], pos: usize) -> Option<u32> {
    let bytes = data.get(pos..pos + 4)?;
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    Some(u32::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u32_roundtrip() {
        let values = [0, 1, 255, 256, 65535, u32::MAX];
        for value in values {
            let mut buf = Vec::new();
            write_u32_le(&mut buf, value).unwrap();
            assert_eq!(slice_u32_le(&buf, 0), Some(value));
        }
    }

    #[test]
    fn test_slice_u32_bounds() {
        let data = [1u8, 0, 0, 0, 2, 0, 0];
        assert_eq!(slice_u32_le(&data, 0), Some(1));
        assert_eq!(slice_u32_le(&data, 4), None); // only 3 bytes left
        assert_eq!(slice_u32_le(&data, 7), None);
    }
}
