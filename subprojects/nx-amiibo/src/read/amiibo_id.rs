use core::fmt;

/// Decoded view of the 8-byte amiibo identification block.
///
/// Layout (big-endian):
/// - `0x0`: character id (game series + character)
/// - `0x2`: character variant
/// - `0x3`: figure type (0 = figure, 1 = card, 2 = yarn)
/// - `0x4`: model number
/// - `0x6`: amiibo series
/// - `0x7`: format version, always 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AmiiboId {
    pub character_id: u16,
    pub character_variant: u8,
    pub figure_type: u8,
    pub model_number: u16,
    pub series: u8,
    pub format_version: u8,
}

impl AmiiboId {
    /// Decodes an identification block.
    pub fn from_block(block: &[u8; 8]) -> Self {
        Self {
            character_id: u16::from_be_bytes([block[0], block[1]]),
            character_variant: block[2],
            figure_type: block[3],
            model_number: u16::from_be_bytes([block[4], block[5]]),
            series: block[6],
            format_version: block[7],
        }
    }

    /// Re-encodes the identification block.
    pub fn to_block(&self) -> [u8; 8] {
        let [c0, c1] = self.character_id.to_be_bytes();
        let [m0, m1] = self.model_number.to_be_bytes();
        [
            c0,
            c1,
            self.character_variant,
            self.figure_type,
            m0,
            m1,
            self.series,
            self.format_version,
        ]
    }
}

impl fmt::Display for AmiiboId {
    /// Formats the id the way amiibo databases key figures (`hhhhhhhh-tttttttt`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.to_block();
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_identification_block() {
        // Mario (Super Mario Bros. series)
        let block = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02];
        let id = AmiiboId::from_block(&block);

        assert_eq!(id.character_id, 0);
        assert_eq!(id.figure_type, 0);
        assert_eq!(id.format_version, 2);
        assert_eq!(id.to_string(), "00000000-00000002");
    }

    #[test]
    fn test_big_endian_fields() {
        let block = [0x01, 0x80, 0x01, 0x01, 0x03, 0x53, 0x09, 0x02];
        let id = AmiiboId::from_block(&block);

        assert_eq!(id.character_id, 0x0180);
        assert_eq!(id.character_variant, 1);
        assert_eq!(id.figure_type, 1);
        assert_eq!(id.model_number, 0x0353);
        assert_eq!(id.series, 9);
        assert_eq!(id.to_block(), block);
        assert_eq!(id.to_string(), "01800101-03530902");
    }
}
