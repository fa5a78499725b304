//! Binary reader for OpenType table data

use super::ParseError;

/// Big-endian reader with bounds checking
pub struct TableReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> TableReader<'a> {
    /// Create a new reader at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Create a reader positioned at `offset`
    pub fn at(data: &'a [u8], offset: usize) -> Result<Self, ParseError> {
        if offset > data.len() {
            return Err(ParseError::OutOfBounds);
        }
        Ok(Self { data, pos: offset })
    }

    /// Skip bytes
    pub fn skip(&mut self, n: usize) -> Result<(), ParseError> {
        if self.pos + n > self.data.len() {
            return Err(ParseError::OutOfBounds);
        }
        self.pos += n;
        Ok(())
    }

    /// Read big-endian u16
    pub fn read_u16(&mut self) -> Result<u16, ParseError> {
        if self.pos + 2 > self.data.len() {
            return Err(ParseError::OutOfBounds);
        }
        let v = u16::from_be_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        Ok(v)
    }

    /// Read big-endian i16
    pub fn read_i16(&mut self) -> Result<i16, ParseError> {
        Ok(self.read_u16()? as i16)
    }

    /// Read big-endian u32
    pub fn read_u32(&mut self) -> Result<u32, ParseError> {
        if self.pos + 4 > self.data.len() {
            return Err(ParseError::OutOfBounds);
        }
        let v = u32::from_be_bytes([
            self.data[self.pos],
            self.data[self.pos + 1],
            self.data[self.pos + 2],
            self.data[self.pos + 3],
        ]);
        self.pos += 4;
        Ok(v)
    }

    /// Read a u16 offset and resolve it against `base`; 0 means "absent"
    pub fn read_offset16(&mut self, base: usize) -> Result<Option<usize>, ParseError> {
        match self.read_u16()? {
            0 => Ok(None),
            off => Ok(Some(base + off as usize)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u16() {
        let data = [0x12, 0x34, 0x56, 0x78];
        let mut reader = TableReader::new(&data);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_u16().unwrap(), 0x5678);
        assert!(reader.read_u16().is_err());
    }

    #[test]
    fn test_offset16_zero_is_absent() {
        let data = [0x00, 0x00, 0x00, 0x10];
        let mut reader = TableReader::new(&data);
        assert_eq!(reader.read_offset16(100).unwrap(), None);
        assert_eq!(reader.read_offset16(100).unwrap(), Some(116));
    }
}
