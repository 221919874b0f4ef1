use yasna::models::ObjectIdentifier;
use yasna::{DERWriter, Tag};

use x509_ext::Certificate;

/// Serial number of the test issuer certificate, 0x1001.
pub const TEST_SERIAL: u64 = 4097;

/// Key identifier stored in the test issuer's subjectKeyIdentifier
/// extension.
pub const TEST_KEY_ID: &[u8] = &[0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x23];

/// Deterministic subjectPublicKey filler; only the bytes matter.
pub const TEST_PUBLIC_KEY_BITS: &[u8] = &[0x55; 32];

/// A CA-shaped certificate carrying a subjectKeyIdentifier extension.
pub fn issuer_certificate() -> Certificate {
	Certificate::from_der(certificate_der("Test Root CA", TEST_SERIAL, Some(TEST_KEY_ID))).unwrap()
}

/// A certificate without any extensions.
pub fn bare_certificate() -> Certificate {
	Certificate::from_der(certificate_der("Test Leaf", 7, None)).unwrap()
}

/// Build a minimal certificate for use as encoder context.
///
/// The signature bits are filler; nothing in these tests verifies
/// signatures.
pub fn certificate_der(common_name: &str, serial: u64, key_id: Option<&[u8]>) -> Vec<u8> {
	yasna::construct_der(|writer| {
		writer.write_sequence(|writer| {
			// tbsCertificate
			writer.next().write_sequence(|writer| {
				// version [0] EXPLICIT, v3
				writer
					.next()
					.write_tagged(Tag::context(0), |writer| writer.write_i64(2));
				writer.next().write_u64(serial);
				write_algorithm_identifier(writer.next());
				write_name(writer.next(), "Test Root CA");
				writer.next().write_sequence(|writer| {
					write_utc_time(writer.next(), "200101000000Z");
					write_utc_time(writer.next(), "490101000000Z");
				});
				write_name(writer.next(), common_name);
				// subjectPublicKeyInfo
				writer.next().write_sequence(|writer| {
					writer.next().write_sequence(|writer| {
						// rsaEncryption
						writer.next().write_oid(&ObjectIdentifier::from_slice(&[
							1, 2, 840, 113549, 1, 1, 1,
						]));
						writer.next().write_null();
					});
					writer
						.next()
						.write_bitvec_bytes(TEST_PUBLIC_KEY_BITS, TEST_PUBLIC_KEY_BITS.len() * 8);
				});
				if let Some(key_id) = key_id {
					// extensions [3] EXPLICIT
					writer.next().write_tagged(Tag::context(3), |writer| {
						writer.write_sequence(|writer| {
							// subjectKeyIdentifier extension
							writer.next().write_sequence(|writer| {
								writer
									.next()
									.write_oid(&ObjectIdentifier::from_slice(&[2, 5, 29, 14]));
								writer.next().write_bytes(&yasna::construct_der(|writer| {
									writer.write_bytes(key_id)
								}));
							});
						});
					});
				}
			});
			write_algorithm_identifier(writer.next());
			writer.next().write_bitvec_bytes(&[0u8; 32], 256);
		})
	})
}

fn write_algorithm_identifier(writer: DERWriter) {
	// sha256WithRSAEncryption
	writer.write_sequence(|writer| {
		writer.next().write_oid(&ObjectIdentifier::from_slice(&[
			1, 2, 840, 113549, 1, 1, 11,
		]));
		writer.next().write_null();
	});
}

fn write_name(writer: DERWriter, common_name: &str) {
	writer.write_sequence(|writer| {
		writer.next().write_set(|writer| {
			writer.next().write_sequence(|writer| {
				// id-at-commonName
				writer
					.next()
					.write_oid(&ObjectIdentifier::from_slice(&[2, 5, 4, 3]));
				writer.next().write_utf8_string(common_name);
			});
		});
	});
}

fn write_utc_time(writer: DERWriter, time: &str) {
	let mut der = vec![0x17, time.len() as u8];
	der.extend_from_slice(time.as_bytes());
	writer.write_der(&der);
}
