use super::*;
use error::CaptureFieldErr;

/// A bundle: a primary block followed by its canonical blocks.
///
/// On the wire a bundle is an indefinite-length CBOR array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub primary: PrimaryBlock,
    pub blocks: Vec<CanonicalBlock>,
}

impl Bundle {
    /// Creates a bundle, rejecting it if it is not structurally valid.
    pub fn new(primary: PrimaryBlock, blocks: Vec<CanonicalBlock>) -> Result<Self, ValidationErrors> {
        let bundle = Self { primary, blocks };
        bundle.check_valid()?;
        Ok(bundle)
    }

    /// Decodes a bundle that must occupy all of `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        let (bundle, len) = cbor::decode::parse_detail::<Self>(data)?;
        if len != data.len() {
            return Err(Error::AdditionalData);
        }
        Ok(bundle)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        cbor::encode::emit(self)
    }

    /// A string identifying the bundle: source, creation timestamp and,
    /// for fragments, the fragment offset.
    pub fn id(&self) -> String {
        let timestamp = &self.primary.timestamp;
        let mut id = format!(
            "{}-{}-{}",
            self.primary.source,
            timestamp.creation_time.map_or(0, |t| t.millisecs()),
            timestamp.sequence_number
        );
        if let Some(fragment) = &self.primary.fragment_info {
            id.push_str(&format!("-{}", fragment.offset));
        }
        id
    }

    pub fn payload_block(&self) -> Option<&CanonicalBlock> {
        self.extension_block(BlockType::Payload)
    }

    pub fn payload(&self) -> Option<&[u8]> {
        self.payload_block().and_then(CanonicalBlock::payload)
    }

    /// The first block of type `block_type`.
    pub fn extension_block(&self, block_type: BlockType) -> Option<&CanonicalBlock> {
        self.blocks.iter().find(|b| b.block_type == block_type)
    }

    /// Sets the CRC type of the primary block and every canonical block.
    pub fn set_crc_type(&mut self, crc_type: CrcType) {
        self.primary.set_crc_type(crc_type);
        for block in &mut self.blocks {
            block.set_crc_type(crc_type);
        }
    }

    pub fn calculate_crc(&mut self) {
        self.primary.calculate_crc();
        for block in &mut self.blocks {
            block.calculate_crc();
        }
    }

    pub fn check_crc(&self) -> bool {
        self.primary.check_crc() && self.blocks.iter().all(CanonicalBlock::check_crc)
    }

    /// Checks the primary block, every canonical block and the rules that
    /// span blocks, reporting all violations.
    pub fn check_valid(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if let Err(e) = self.primary.check_valid() {
            errors.extend(e);
        }

        let mut block_numbers = std::collections::HashSet::new();
        for block in &self.blocks {
            if let Err(e) = block.check_valid() {
                errors.extend(e);
            }
            if !block_numbers.insert(block.block_number) {
                errors.push(Error::DuplicateBlockNumber(block.block_number));
            }
        }

        let count = |block_type: BlockType| {
            self.blocks
                .iter()
                .filter(|b| b.block_type == block_type)
                .count()
        };
        match count(BlockType::Payload) {
            0 => errors.push(Error::MissingPayload),
            1 => {}
            _ => errors.push(Error::DuplicateBlocks(BlockType::Payload)),
        }
        for block_type in [
            BlockType::PreviousNode,
            BlockType::BundleAge,
            BlockType::HopCount,
        ] {
            if count(block_type) > 1 {
                errors.push(Error::DuplicateBlocks(block_type));
            }
        }
        if self.primary.timestamp.creation_time.is_none() && count(BlockType::BundleAge) == 0 {
            errors.push(Error::MissingBundleAge);
        }

        ValidationErrors::into_result(errors)
    }
}

impl core::fmt::Display for Bundle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "bundle {} [{}", self.id(), self.primary)?;
        for block in &self.blocks {
            write!(f, "; {block}")?;
        }
        f.write_str("]")
    }
}

impl cbor::encode::ToCbor for Bundle {
    fn to_cbor(&self, encoder: &mut cbor::encode::Encoder) {
        encoder.emit_array(None, |a| {
            a.emit(&self.primary);
            for block in &self.blocks {
                a.emit(block);
            }
        })
    }
}

impl cbor::decode::FromCbor for Bundle {
    type Error = Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        cbor::decode::try_parse_array(data, |a, _| {
            let primary = a.parse().map_field_err("primary block")?;
            let mut blocks = Vec::new();
            while let Some(block) = a.try_parse::<CanonicalBlock>()? {
                blocks.push(block);
            }
            Ok(Bundle { primary, blocks })
        })
    }
}
