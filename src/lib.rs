//! # qrforge
//!
//! A Rust library for generating QR codes with Reed-Solomon error correction.
//! Covers versions 1-4 in alphanumeric and byte modes at all four error
//! correction levels, and picks the best of the eight mask patterns.
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrforge::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Simplest usage - provide only data, all other settings are automatically chosen
//! let qr = QRBuilder::new(b"HELLO WORLD").build()?;
//!
//! let matrix = qr.to_matrix(); // Rows of 0 (light) & 1 (dark)
//! assert_eq!(matrix.len(), 21);
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrforge::{ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = "Hello, World!";
//! let qr = QRBuilder::new(data.as_bytes())
//!     .version(Version::new(2)?)       // QR version (size) - if not provided, finds smallest version to fit data
//!     .ec_level("Q".parse::<ECLevel>()?) // Error correction level - if not provided, defaults to ECLevel::L
//!     .mask(MaskPattern::new(3)?)      // Mask pattern - if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! print!("{}", qr.to_str(1));
//! # Ok(())
//! # }
//! ```
//!
//! ## QR Code Components
//!
//! ### Versions
//! - Versions 1-4, with sizes from 21x21 to 33x33 modules
//!
//! ### Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction
//!
//! ### Modes
//! - **Alphanumeric**: digits, uppercase letters, space and `$ % * + - . / :`
//! - **Byte**: the UTF-8 bytes of anything else

#![allow(clippy::items_after_test_module, clippy::suspicious_arithmetic_impl)]

pub mod builder;
pub(crate) mod common;

pub use builder::{Module, QRBuilder, QR};
pub use common::codec::Mode;
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Version};
