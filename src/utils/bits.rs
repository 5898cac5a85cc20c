use crate::error::{FlvError, Result};

/// Reads `num_bits` bits starting at `bit_pos` and returns them as a number.
///
/// Bit 0 is the most significant bit of `buf[0]`; bits are assembled
/// MSB-first, crossing byte boundaries as needed.
///
/// Returns [`FlvError::Bounds`] if the range runs past the end of `buf`, and
/// [`FlvError::Codec`] if more than 32 bits are requested.
///
/// Example:
/// ```
/// use flvkit::utils::read_bits_at;
///
/// let data = [0b1011_0011, 0b0101_1010];
/// assert_eq!(read_bits_at(&data, 3, 8).unwrap(), 0b1001_1010);
/// assert!(read_bits_at(&data, 12, 5).is_err());
/// ```
pub fn read_bits_at(buf: &[u8], bit_pos: usize, num_bits: u32) -> Result<u32> {
    if num_bits > 32 {
        return Err(FlvError::Codec("Too many bits requested".into()));
    }

    let bit_len = buf.len() * 8;
    let end = bit_pos.checked_add(num_bits as usize);
    if end.map_or(true, |end| end > bit_len) {
        return Err(FlvError::Bounds {
            bit_pos,
            num_bits,
            bit_len,
        });
    }

    let mut value = 0u32;
    let mut byte_pos = bit_pos / 8;
    let mut shift = 7 - (bit_pos % 8) as u32;

    for _ in 0..num_bits {
        let bit = (buf[byte_pos] >> shift) & 1;
        value = (value << 1) | bit as u32;

        if shift == 0 {
            byte_pos += 1;
            shift = 7;
        } else {
            shift -= 1;
        }
    }

    Ok(value)
}

/// A bit-level cursor over a byte slice.
///
/// Used for the non byte-aligned parts of the stream: the AAC
/// AudioSpecificConfig and H.264 parameter sets. Supports:
/// - Reading individual bits
/// - Reading multiple bits as numbers
/// - Reading exponential Golomb codes (ue(v))
/// - Reading signed exponential Golomb codes (se(v))
///
/// Example:
/// ```
/// use flvkit::utils::BitReader;
///
/// let data = [0b10110011];
/// let mut reader = BitReader::new(&data);
///
/// assert_eq!(reader.read_bit().unwrap(), true);   // 1
/// assert_eq!(reader.read_bits(3).unwrap(), 0b011); // 011
/// ```
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new BitReader from a byte slice
    pub fn new(data: &'a [u8]) -> Self {
        BitReader { data, bit_pos: 0 }
    }

    /// Reads a single bit from the stream.
    /// Returns true for 1, false for 0.
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Reads n bits and returns them as a number, MSB first.
    ///
    /// The cursor only advances when the read succeeds.
    pub fn read_bits(&mut self, n: u32) -> Result<u32> {
        let value = read_bits_at(self.data, self.bit_pos, n)?;
        self.bit_pos += n as usize;
        Ok(value)
    }

    /// Reads an unsigned exponential Golomb code (ue(v)) as specified in H.264.
    ///
    /// Format:
    /// 1. M leading zeros followed by a 1
    /// 2. M more INFO bits
    /// 3. Value = 2^M + INFO - 1
    pub fn read_golomb(&mut self) -> Result<u32> {
        let mut leading_zeros = 0;
        while !self.read_bit()? {
            leading_zeros += 1;
            if leading_zeros > 31 {
                return Err(FlvError::Codec("Invalid Golomb code".into()));
            }
        }

        if leading_zeros == 0 {
            return Ok(0);
        }

        let info = self.read_bits(leading_zeros)?;
        Ok(((1u64 << leading_zeros) + info as u64 - 1) as u32)
    }

    /// Reads a signed exponential Golomb code (se(v)).
    ///
    /// Odd codes map to positive values, even codes to negative ones:
    /// 0, 1, -1, 2, -2, ...
    pub fn read_signed_golomb(&mut self) -> Result<i32> {
        let k = self.read_golomb()?;
        if k == 0 {
            return Ok(0);
        }

        let magnitude = ((k as i64 + 1) >> 1) as i32;
        let sign = if k & 1 == 1 { 1 } else { -1 };
        Ok(sign * magnitude)
    }

    /// Skips n bits in the stream.
    pub fn skip_bits(&mut self, n: u32) -> Result<()> {
        let bit_len = self.data.len() * 8;
        if self.bit_pos + n as usize > bit_len {
            return Err(FlvError::Bounds {
                bit_pos: self.bit_pos,
                num_bits: n,
                bit_len,
            });
        }
        self.bit_pos += n as usize;
        Ok(())
    }

    /// Current position in bits from the start of the slice.
    pub fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Returns number of bits available to read.
    pub fn available_bits(&self) -> usize {
        self.data.len() * 8 - self.bit_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_read_bits_at() {
        // Simple pattern within a byte
        let data = [0b10110011];
        assert_eq!(read_bits_at(&data, 0, 3).unwrap(), 0b101);
        assert_eq!(read_bits_at(&data, 3, 5).unwrap(), 0b10011);

        // Cross-byte boundary
        let data = [0b10110011, 0b01011010];
        assert_eq!(read_bits_at(&data, 3, 8).unwrap(), 0b10011010);

        // Cross multiple byte boundaries
        let data = [0b10110011, 0b11001100, 0b10101010];
        assert_eq!(read_bits_at(&data, 0, 20).unwrap(), 0b10110011110011001010);

        // Full 32-bit read
        let data = [0xDE, 0xAD, 0xBE, 0xEF];
        assert_eq!(read_bits_at(&data, 0, 32).unwrap(), 0xDEADBEEF);

        // Zero bits at the very end is still in bounds
        assert_eq!(read_bits_at(&data, 32, 0).unwrap(), 0);
    }

    #[test]
    fn test_read_bits_at_out_of_bounds() {
        let data = [0xFF];
        match read_bits_at(&data, 4, 5) {
            Err(FlvError::Bounds {
                bit_pos,
                num_bits,
                bit_len,
            }) => {
                assert_eq!(bit_pos, 4);
                assert_eq!(num_bits, 5);
                assert_eq!(bit_len, 8);
            }
            other => panic!("expected bounds error, got {:?}", other),
        }

        assert!(read_bits_at(&[], 0, 1).is_err());
        assert!(read_bits_at(&data, 9, 0).is_err());
        assert!(matches!(
            read_bits_at(&[0u8; 8], 0, 33),
            Err(FlvError::Codec(_))
        ));
    }

    #[test]
    fn test_reader_sequence() {
        let data = [0b10110011, 0b01011010];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        assert_eq!(reader.read_bits(5).unwrap(), 0b10011);
        assert_eq!(reader.bit_position(), 8);
        reader.skip_bits(4).unwrap();
        assert_eq!(reader.read_bits(4).unwrap(), 0b1010);
        assert_eq!(reader.available_bits(), 0);
        assert!(reader.read_bit().is_err());
    }

    #[test]
    fn test_failed_read_does_not_advance() {
        let data = [0b10110011];
        let mut reader = BitReader::new(&data);
        reader.read_bits(6).unwrap();
        assert!(reader.read_bits(8).is_err());
        assert_eq!(reader.read_bits(2).unwrap(), 0b11);
    }

    #[test]
    fn test_read_golomb() {
        let test_cases = [
            ([0b10000000], 0, "1"),
            ([0b01000000], 1, "010"),
            ([0b01100000], 2, "011"),
            ([0b00100000], 3, "00100"),
            ([0b00101000], 4, "00101"),
            ([0b00110000], 5, "00110"),
            ([0b00111000], 6, "00111"),
            ([0b00010000], 7, "0001000"),
            ([0b00010010], 8, "0001001"),
        ];

        for (input, expected, pattern) in test_cases.iter() {
            let mut reader = BitReader::new(input);
            assert_eq!(reader.read_golomb().unwrap(), *expected, "pattern {}", pattern);
        }

        let data = [0x00];
        let mut reader = BitReader::new(&data);
        assert!(reader.read_golomb().is_err());
    }

    #[test]
    fn test_signed_golomb() {
        let test_cases = [
            ([0b10000000], 0),
            ([0b01000000], 1),
            ([0b01100000], -1),
            ([0b00100000], 2),
            ([0b00101000], -2),
            ([0b00110000], 3),
            ([0b00111000], -3),
        ];

        for (input, expected) in test_cases.iter() {
            let mut reader = BitReader::new(input);
            assert_eq!(reader.read_signed_golomb().unwrap(), *expected);
        }
    }

    #[quickcheck]
    fn prop_single_bits_match_bulk_read(data: Vec<u8>, bit_pos: u16, n: u8) -> bool {
        let bit_len = data.len() * 8;
        let n = (n % 33) as u32;
        let bit_pos = bit_pos as usize;

        match read_bits_at(&data, bit_pos, n) {
            Ok(bulk) => {
                let mut assembled = 0u64;
                for i in 0..n as usize {
                    match read_bits_at(&data, bit_pos + i, 1) {
                        Ok(bit) => assembled = (assembled << 1) | bit as u64,
                        Err(_) => return false,
                    }
                }
                bit_pos + n as usize <= bit_len && assembled == bulk as u64
            }
            Err(FlvError::Bounds { .. }) => bit_pos + n as usize > bit_len,
            Err(_) => false,
        }
    }

    #[quickcheck]
    fn prop_past_end_always_fails(data: Vec<u8>, extra: u8) -> bool {
        let bit_len = data.len() * 8;
        let n = (extra % 32) as u32 + 1;
        matches!(
            read_bits_at(&data, bit_len, n),
            Err(FlvError::Bounds { .. })
        )
    }
}
