use flate2::{Compression, write::GzEncoder};
use std::io::Write;

/// Gzip-compresses `document` into `out`, replacing whatever `out` held.
pub fn gzip_into(document: &[u8], out: &mut Vec<u8>) -> std::io::Result<()> {
    out.clear();
    let mut encoder = GzEncoder::new(out, Compression::default());
    encoder.write_all(document)?;
    encoder.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_gzip_decompresses_to_input() {
        let document = br#"{"lines": [{"line":"hello"}]}"#;
        let mut out = b"leftover bytes".to_vec();
        gzip_into(document, &mut out).unwrap();

        // gzip magic header
        assert_eq!(&out[..2], &[0x1f, 0x8b]);

        let mut decoded = Vec::new();
        GzDecoder::new(&out[..]).read_to_end(&mut decoded).unwrap();
        assert_eq!(decoded, document);
    }
}
