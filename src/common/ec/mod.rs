mod block;
mod galois;
mod poly;

pub(crate) use block::*;

use poly::Poly;

// ECC: Error Correction Codeword generator
pub fn ecc(block: &[u8], ec_len: usize) -> Vec<u8> {
    let gen_poly = Poly::generator(ec_len);
    Poly::from_codewords(block, ec_len).rem(&gen_poly)
}
