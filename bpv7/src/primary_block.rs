use super::*;
use error::CaptureFieldErr;

/// The fragment fields of a primary block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FragmentInfo {
    pub offset: u64,
    pub total_adu_length: u64,
}

/// The primary block of a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryBlock {
    pub version: u64,
    pub flags: BundleControlFlags,
    pub crc_type: CrcType,
    pub destination: Eid,
    pub source: Eid,
    pub report_to: Eid,
    pub timestamp: CreationTimestamp,
    /// Lifetime in microseconds.
    pub lifetime: u64,
    /// Present iff the `IS_FRAGMENT` flag is set.
    pub fragment_info: Option<FragmentInfo>,
    pub crc: Option<Box<[u8]>>,
}

impl PrimaryBlock {
    pub const VERSION: u64 = 7;

    /// Creates a version 7 primary block with no CRC that reports to its source.
    pub fn new(
        flags: BundleControlFlags,
        destination: Eid,
        source: Eid,
        timestamp: CreationTimestamp,
        lifetime: u64,
    ) -> Self {
        Self {
            version: Self::VERSION,
            flags,
            crc_type: CrcType::None,
            destination,
            report_to: source.clone(),
            source,
            timestamp,
            lifetime,
            fragment_info: None,
            crc: None,
        }
    }

    pub fn has_fragmentation(&self) -> bool {
        self.flags.has(BundleControlFlags::IS_FRAGMENT)
    }

    /// Sets the CRC type, discarding any stored CRC value.
    pub fn set_crc_type(&mut self, crc_type: CrcType) {
        self.crc_type = crc_type;
        self.crc = None;
    }

    pub fn calculate_crc(&mut self) {
        self.crc = match self.crc_type {
            CrcType::None => None,
            _ => Some(crc::calculate_crc(self)),
        };
    }

    pub fn check_crc(&self) -> bool {
        crc::check_crc(self)
    }

    pub fn check_valid(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if self.version != Self::VERSION {
            errors.push(Error::InvalidVersion(self.version));
        }
        if let Err(e) = self.flags.check_valid() {
            errors.push(e);
        }
        for (field, eid) in [
            ("destination", &self.destination),
            ("source", &self.source),
            ("report-to", &self.report_to),
        ] {
            if let Err(e) = eid.check_valid() {
                errors.push(Error::InvalidField {
                    field,
                    source: e.into(),
                });
            }
        }
        if self.source.is_null()
            && (!self.flags.has(BundleControlFlags::MUST_NOT_FRAGMENT)
                || self.flags.has(BundleControlFlags::STATUS_REPORTS))
        {
            errors.push(Error::AnonymousSourceFlags);
        }
        match &self.fragment_info {
            Some(_) if !self.has_fragmentation() => errors.push(Error::InvalidFragmentInfo),
            None if self.has_fragmentation() => errors.push(Error::InvalidFragmentInfo),
            Some(f) if f.offset >= f.total_adu_length => {
                errors.push(Error::InvalidFragmentOffset(f.offset, f.total_adu_length))
            }
            _ => {}
        }
        ValidationErrors::into_result(errors)
    }
}

impl crc::CrcBlock for PrimaryBlock {
    fn crc_type(&self) -> CrcType {
        self.crc_type
    }

    fn crc_value(&self) -> Option<&[u8]> {
        self.crc.as_deref()
    }

    fn emit_with_crc(&self, encoder: &mut cbor::encode::Encoder, crc: &[u8]) {
        let has_crc = self.crc_type != CrcType::None;
        let count = 8 + if self.fragment_info.is_some() { 2 } else { 0 } + usize::from(has_crc);
        encoder.emit_array(Some(count), |a| {
            a.emit(&self.version);
            a.emit(&self.flags);
            a.emit(&self.crc_type);
            a.emit(&self.destination);
            a.emit(&self.source);
            a.emit(&self.report_to);
            a.emit(&self.timestamp);
            a.emit(&self.lifetime);
            if let Some(f) = &self.fragment_info {
                a.emit(&f.offset);
                a.emit(&f.total_adu_length);
            }
            if has_crc {
                a.emit(&cbor::encode::Bytes(crc));
            }
        })
    }
}

impl cbor::encode::ToCbor for PrimaryBlock {
    fn to_cbor(&self, encoder: &mut cbor::encode::Encoder) {
        match &self.crc {
            Some(crc) => self.emit_with_crc(encoder, crc),
            None => self.emit_with_crc(encoder, &crc::empty_crc(self.crc_type)),
        }
    }
}

impl cbor::decode::FromCbor for PrimaryBlock {
    type Error = Error;

    fn try_from_cbor(data: &[u8]) -> Result<Option<(Self, usize)>, Self::Error> {
        cbor::decode::try_parse_array(data, |a, _| {
            if let Some(len) = a.len() {
                if !(8..=11).contains(&len) {
                    return Err(Error::InvalidBlockLength(len));
                }
            }

            let version = a.parse().map_field_err("version")?;
            let flags: BundleControlFlags = a
                .parse()
                .map_field_err("bundle processing control flags")?;
            let crc_type: CrcType = a.parse().map_field_err("CRC type")?;
            let destination = a.parse().map_field_err("destination EID")?;
            let source = a.parse().map_field_err("source EID")?;
            let report_to = a.parse().map_field_err("report-to EID")?;
            let timestamp = a.parse().map_field_err("creation timestamp")?;
            let lifetime = a.parse().map_field_err("lifetime")?;
            let fragment_info = if flags.has(BundleControlFlags::IS_FRAGMENT) {
                Some(FragmentInfo {
                    offset: a.parse().map_field_err("fragment offset")?,
                    total_adu_length: a
                        .parse()
                        .map_field_err("total application data unit length")?,
                })
            } else {
                None
            };
            let crc = if crc_type != CrcType::None {
                Some(a.parse::<Box<[u8]>>().map_field_err("CRC value")?)
            } else {
                None
            };

            Ok(PrimaryBlock {
                version,
                flags,
                crc_type,
                destination,
                source,
                report_to,
                timestamp,
                lifetime,
                fragment_info,
                crc,
            })
        })
    }
}

impl core::fmt::Display for PrimaryBlock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "version: {}, flags: {}, crc type: {}, destination: {}, source: {}, report-to: {}, timestamp: {}, lifetime: {}us",
            self.version,
            self.flags,
            self.crc_type,
            self.destination,
            self.source,
            self.report_to,
            self.timestamp,
            self.lifetime
        )?;
        if let Some(frag) = &self.fragment_info {
            write!(
                f,
                ", fragment: {}/{}",
                frag.offset, frag.total_adu_length
            )?;
        }
        if let Some(crc) = &self.crc {
            write!(f, ", crc: {}", canonical_block::hex(crc))?;
        }
        Ok(())
    }
}
