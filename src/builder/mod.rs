mod qr;

pub use qr::{Module, QR};

use log::debug;

use crate::common::{
    bitstream::BitStream,
    codec::{encode, encode_with_version, Mode},
    ec::{compute_ecc, interleave},
    error::QRResult,
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::default(), mask: None }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn metadata(&self) -> String {
        let ver = self.version.map_or("None".to_string(), |v| (*v).to_string());
        let mask = self.mask.map_or("None".to_string(), |m| (*m).to_string());
        format!("{{ Version: {ver}, Ec level: {:?}, Mask: {mask} }}", self.ec_level)
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        debug!("Generating QR {}", self.metadata());

        debug!("Encoding data");
        let (encoded_data, version, mode) = match self.version {
            Some(v) => {
                let encoded = encode_with_version(self.data, v, self.ec_level)?;
                (encoded, v, Mode::select(self.data))
            }
            None => {
                debug!("Finding smallest version");
                encode(self.data, self.ec_level)?
            }
        };

        debug!("Constructing payload with ecc & interleaving");
        let payload = Self::build_payload(encoded_data.data(), version, self.ec_level);

        debug!("Drawing function patterns");
        let mut qr = QR::new(version, self.ec_level, mode);
        qr.draw_all_function_patterns();

        debug!("Placing payload");
        qr.draw_encoding_region(payload)?;

        match self.mask {
            Some(m) => {
                debug!("Applying mask {}", *m);
                qr.apply_mask(m);
            }
            None => {
                debug!("Evaluating masks");
                apply_best_mask(&mut qr);
            }
        }

        let total_modules = qr.width() * qr.width();
        let dark_modules = qr.count_dark_modules();
        debug!(
            "QR generated: Version {}, Mode {mode:?}, Dark cells {dark_modules}, Balance {}%",
            *version,
            dark_modules * 100 / total_modules
        );

        Ok(qr)
    }

    // Data blocks interleaved, followed by their ec blocks interleaved
    fn build_payload(data: &[u8], version: Version, ec_level: ECLevel) -> BitStream {
        let (data_blocks, ecc_blocks) = compute_ecc(data, version, ec_level);
        let mut payload = BitStream::new(version.total_codewords() << 3);
        payload.extend(&interleave(&data_blocks));
        payload.extend(&interleave(&ecc_blocks));
        payload
    }
}
