use std::str::{FromStr};
use std::io::{self, Read};
use std::fs::{File};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateFileFormat {
    Pem,
    Der
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown certificate format {0:?}, expected der or pem")]
pub struct UnknownFormat(String);

impl FromStr for CertificateFileFormat {
    type Err = UnknownFormat;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pem" => Ok(CertificateFileFormat::Pem),
            "der" => Ok(CertificateFileFormat::Der),
            _ => Err(UnknownFormat(s.to_owned()))
        }
    }
}

#[derive(Debug, Error)]
pub enum CertFileError {
    /// The file is missing, unreadable or permission was denied.
    #[error("Failed to read certificate file {}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error
    },
    #[error("Invalid PEM in certificate file {}", path.display())]
    Pem {
        path: PathBuf,
        #[source]
        source: pem::PemError
    }
}

// the handle is dropped when this returns, on success or failure
fn read_all(path: &Path) -> io::Result<Vec<u8>> {
    let mut f = File::open(path)?;
    let mut bytes = Vec::new();
    f.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Reads the whole certificate file and returns its DER bytes. PEM input is
/// unwrapped to the contents of its first block.
pub fn read_certificate_file<P: AsRef<Path>>(path: P, format: CertificateFileFormat) -> Result<Vec<u8>, CertFileError> {
    let path = path.as_ref();
    let bytes = read_all(path).map_err(|source| CertFileError::Access { path: path.to_owned(), source })?;
    debug!(path = %path.display(), len = bytes.len(), ?format, "read certificate file");

    match format {
        CertificateFileFormat::Der => Ok(bytes),
        CertificateFileFormat::Pem => {
            let block = pem::parse(&bytes).map_err(|source| CertFileError::Pem { path: path.to_owned(), source })?;
            debug!(tag = %block.tag, len = block.contents.len(), "decoded PEM block");
            Ok(block.contents)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn parse_format_test() {
        assert_eq!(Ok(CertificateFileFormat::Der), "der".parse());
        assert_eq!(Ok(CertificateFileFormat::Pem), "PEM".parse());
        assert_eq!(Err(UnknownFormat("crt".to_owned())), "crt".parse::<CertificateFileFormat>());
    }

    #[test]
    fn read_der_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cert.der");
        let bytes: Vec<u8> = vec![0x30, 0x82, 0x01, 0x0a, 0x00, 0xff];
        fs::write(&path, &bytes).unwrap();

        let read = read_certificate_file(&path, CertificateFileFormat::Der).expect("Failed to read certificate");
        assert_eq!(bytes, read);
    }

    #[test]
    fn read_empty_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.der");
        fs::write(&path, b"").unwrap();

        let read = read_certificate_file(&path, CertificateFileFormat::Der).expect("Failed to read certificate");
        assert!(read.is_empty());
    }

    #[test]
    fn read_pem_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cert.pem");
        let der: Vec<u8> = vec![0x30, 0x03, 0x02, 0x01, 0x05];
        let encoded = pem::encode(&pem::Pem { tag: "CERTIFICATE".to_owned(), contents: der.clone() });
        fs::write(&path, encoded).unwrap();

        let read = read_certificate_file(&path, CertificateFileFormat::Pem).expect("Failed to read certificate");
        assert_eq!(der, read);
    }

    #[test]
    fn missing_file_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mosquitto.org.der");

        match read_certificate_file(&path, CertificateFileFormat::Der) {
            Err(CertFileError::Access { path: p, source }) => {
                assert_eq!(path, p);
                assert_eq!(io::ErrorKind::NotFound, source.kind());
            },
            other => panic!("Expected access error, got {:?}", other)
        }
    }

    #[test]
    fn directory_is_not_readable_test() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_certificate_file(dir.path(), CertificateFileFormat::Der);

        assert!(matches!(result, Err(CertFileError::Access { .. })));
    }

    #[test]
    fn invalid_pem_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cert.pem");
        fs::write(&path, [0x30u8, 0x82, 0x01]).unwrap();

        let result = read_certificate_file(&path, CertificateFileFormat::Pem);
        assert!(matches!(result, Err(CertFileError::Pem { .. })));
    }
}
