use txpool_hashes::HasherBase;

pub mod tx;

pub trait HasherExtensions {
    /// Writes the length as a compact size unsigned integer (1, 3, 5 or 9 bytes)
    fn write_compact_size(&mut self, len: usize) -> &mut Self;

    /// Writes the number of bytes followed by the bytes themselves
    fn write_var_bytes(&mut self, bytes: &[u8]) -> &mut Self;
}

impl<T: HasherBase> HasherExtensions for T {
    #[inline(always)]
    fn write_compact_size(&mut self, len: usize) -> &mut Self {
        let len = len as u64;
        match len {
            0..=0xfc => self.update([len as u8]),
            0xfd..=0xffff => self.update([0xfd]).update((len as u16).to_le_bytes()),
            0x1_0000..=0xffff_ffff => self.update([0xfe]).update((len as u32).to_le_bytes()),
            _ => self.update([0xff]).update(len.to_le_bytes()),
        }
    }

    #[inline(always)]
    fn write_var_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_compact_size(bytes.len()).update(bytes)
    }
}

/// Returns the number of bytes a compact size encoding of `len` takes
pub const fn compact_size_len(len: u64) -> u64 {
    match len {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<u8>);

    impl HasherBase for Recorder {
        fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self {
            self.0.extend_from_slice(data.as_ref());
            self
        }
    }

    #[test]
    fn test_compact_size_encoding() {
        let tests: [(usize, Vec<u8>); 5] = [
            (0, vec![0]),
            (0xfc, vec![0xfc]),
            (0xfd, vec![0xfd, 0xfd, 0x00]),
            (0x1_0000, vec![0xfe, 0x00, 0x00, 0x01, 0x00]),
            (0x1_0000_0000, vec![0xff, 0, 0, 0, 0, 1, 0, 0, 0]),
        ];
        for (len, expected) in tests {
            let mut recorder = Recorder::default();
            recorder.write_compact_size(len);
            assert_eq!(recorder.0, expected, "wrong encoding for {}", len);
            assert_eq!(compact_size_len(len as u64), expected.len() as u64);
        }
    }
}
