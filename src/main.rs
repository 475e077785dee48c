use std::error::Error;

use log::info;
use qrforge::{ECLevel, QRBuilder};

// qrforge [DATA] [EC_LEVEL]
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let data = args.next().unwrap_or_else(|| "HELLO WORLD".to_string());
    let ec_level = match args.next() {
        Some(s) => s.parse::<ECLevel>()?,
        None => ECLevel::default(),
    };

    let qr = QRBuilder::new(data.as_bytes()).ec_level(ec_level).build()?;
    info!(
        "Version {}, Ec level {:?}, Mode {:?}, Mask {:?}",
        *qr.version(),
        qr.ec_level(),
        qr.mode(),
        qr.mask().map(|m| *m)
    );
    println!("{}", qr.to_str(1));

    Ok(())
}
