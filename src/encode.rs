//! 長さ検査付きのバイトリーダー。書き込み側は `bitcoin::consensus` を使う。

use crate::error::ParseError;

/// 入力スライスを先頭から読み進める。読み過ぎは `UnexpectedEndOfData`。
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ParseError> {
        if n > self.remaining() {
            return Err(ParseError::UnexpectedEndOfData {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ParseError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, ParseError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u32_le(&mut self) -> Result<u32, ParseError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, ParseError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// compact-sizeを読む。必要以上に長い表現は拒否する。
    pub fn read_compact_size(&mut self) -> Result<u64, ParseError> {
        let (value, min) = match self.read_u8()? {
            0xff => (self.read_u64_le()?, 0x1_0000_0000),
            0xfe => (u64::from(self.read_u32_le()?), 0x1_0000),
            0xfd => (u64::from(u16::from_le_bytes(self.read_array()?)), 0xfd),
            n => return Ok(u64::from(n)),
        };
        if value < min {
            return Err(ParseError::NonCanonicalVarInt { value });
        }
        Ok(value)
    }

    /// 長さ接頭辞付きのスクリプトを読む。
    pub fn read_script_bytes(&mut self) -> Result<&'a [u8], ParseError> {
        let declared = self.read_compact_size()?;
        let remaining = self.remaining();
        match usize::try_from(declared) {
            Ok(len) if len <= remaining => self.read_bytes(len),
            _ => Err(ParseError::InvalidScriptLength {
                declared,
                remaining,
            }),
        }
    }
}
