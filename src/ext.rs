use std::borrow::Cow;

use yasna::models::ObjectIdentifier;

use x509_parser::extensions::X509Extension;
use x509_parser::prelude::FromDer;

use crate::syntax::Registry;
use crate::{oid_from_parsed, Error};

/// An X.509v3 certificate extension.
///
/// Holds the complete DER encoding of the `Extension` SEQUENCE, either
/// owned (produced by [`Registry::encode`]) or borrowed from the
/// certificate it was extracted from. Accessors re-derive their answers
/// from the stored encoding, so they always reflect what was actually
/// encoded.
///
/// See [RFC 5280 Section 4.2] for more information.
///
/// [RFC 5280 Section 4.2]: <https://www.rfc-editor.org/rfc/rfc5280#section-4.2>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension<'a> {
	der: Cow<'a, [u8]>,
	oid: ObjectIdentifier,
	value_offset: usize,
}

impl<'a> Extension<'a> {
	/// Assemble an owned extension from its parts.
	pub(crate) fn from_parts(
		oid: &ObjectIdentifier,
		critical: bool,
		value: &[u8],
	) -> Extension<'static> {
		/*
			Extension ::= SEQUENCE {
				extnID      OBJECT IDENTIFIER,
				critical    BOOLEAN DEFAULT FALSE,
				extnValue   OCTET STRING
					-- contains the DER encoding of an ASN.1 value
					-- corresponding to the extension type identified
					-- by extnID
			}
		*/
		let der = yasna::construct_der(|writer| {
			writer.write_sequence(|writer| {
				writer.next().write_oid(oid);
				if critical {
					writer.next().write_bool(true);
				}
				writer.next().write_bytes(value);
			})
		});
		Extension {
			value_offset: der.len() - value.len(),
			der: Cow::Owned(der),
			oid: oid.clone(),
		}
	}

	/// Borrow an extension from its DER encoding.
	///
	/// The encoding is validated up front; a malformed or partially
	/// consumed input never yields an extension.
	pub fn from_der(der: &'a [u8]) -> Result<Self, Error> {
		let (rem, parsed) = X509Extension::from_der(der)
			.map_err(|e| Error::MalformedPayload(format!("invalid extension: {}", e)))?;
		if !rem.is_empty() {
			return Err(Error::MalformedPayload(
				"trailing bytes after extension".to_string(),
			));
		}
		let oid = oid_from_parsed(&parsed.oid)?;
		Ok(Extension {
			value_offset: der.len() - parsed.value.len(),
			der: Cow::Borrowed(der),
			oid,
		})
	}

	/// Return the OID of the extension.
	pub fn oid(&self) -> &ObjectIdentifier {
		&self.oid
	}

	/// Whether the extension is marked critical.
	///
	/// Read back from the stored encoding rather than a cached flag.
	pub fn critical(&self) -> bool {
		match X509Extension::from_der(&self.der) {
			Ok((_, parsed)) => parsed.critical,
			Err(_) => false,
		}
	}

	/// The canonical short name of the extension type, looked up in the
	/// given registry.
	///
	/// OIDs without a registered syntax fall back to their
	/// dotted-decimal form, so the lookup itself never fails.
	pub fn short_name(&self, registry: &Registry) -> String {
		match registry.short_name_of(&self.oid) {
			Some(name) => name.to_string(),
			None => self.oid.to_string(),
		}
	}

	/// The raw DER encoded extnValue contents, length-exact.
	///
	/// May contain embedded NUL bytes; never a NUL terminated string.
	pub fn raw_data(&self) -> &[u8] {
		&self.der[self.value_offset..]
	}

	/// The complete DER encoding of the extension.
	pub fn as_der(&self) -> &[u8] {
		&self.der
	}

	/// Render the extension value for display.
	///
	/// Dispatches on the extension's OID to the registered value
	/// syntax; for subjectAltName that is the NUL-safe general name
	/// renderer, for everything else the type's generic printer.
	///
	/// # Errors
	///
	/// [`Error::NoPrinterAvailable`] if the registry has no entry for
	/// the OID, [`Error::MalformedPayload`] if the payload does not
	/// decode. No partial text is returned on error.
	pub fn format(&self, registry: &Registry) -> Result<String, Error> {
		let syntax = registry
			.by_oid(&self.oid)
			.ok_or_else(|| Error::NoPrinterAvailable(self.oid.to_string()))?;
		syntax.format_value(self.raw_data())
	}

	/// Copy a borrowed extension into one that owns its encoding.
	pub fn into_owned(self) -> Extension<'static> {
		Extension {
			der: Cow::Owned(self.der.into_owned()),
			oid: self.oid,
			value_offset: self.value_offset,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Extension<'static> {
		Extension::from_parts(
			&ObjectIdentifier::from_slice(crate::oid::OID_BASIC_CONSTRAINTS),
			true,
			&[0x30, 0x03, 0x01, 0x01, 0xFF],
		)
	}

	#[test]
	fn parts_survive_encoding() {
		let ext = sample();
		let (_, parsed) = X509Extension::from_der(ext.as_der()).unwrap();
		assert!(parsed.critical);
		assert_eq!(parsed.value, &[0x30, 0x03, 0x01, 0x01, 0xFF]);
		assert_eq!(ext.raw_data(), &[0x30, 0x03, 0x01, 0x01, 0xFF]);
	}

	#[test]
	fn critical_is_rederived() {
		for critical in [true, false] {
			let ext = Extension::from_parts(
				&ObjectIdentifier::from_slice(crate::oid::OID_BASIC_CONSTRAINTS),
				critical,
				&[0x30, 0x00],
			);
			assert_eq!(ext.critical(), critical);
		}
	}

	#[test]
	fn borrowed_view_equals_owned() {
		let owned = sample();
		let borrowed = Extension::from_der(owned.as_der()).unwrap();
		assert_eq!(borrowed.oid(), owned.oid());
		assert!(borrowed.critical());
		assert_eq!(borrowed.raw_data(), owned.raw_data());
		assert_eq!(borrowed.into_owned(), owned);
	}

	#[test]
	fn from_der_rejects_garbage() {
		assert!(matches!(
			Extension::from_der(&[0x30, 0x01, 0x00]),
			Err(Error::MalformedPayload(_))
		));
	}

	#[test]
	fn from_der_rejects_trailing_bytes() {
		let mut der = sample().as_der().to_vec();
		der.push(0x00);
		assert!(matches!(
			Extension::from_der(&der),
			Err(Error::MalformedPayload(_))
		));
	}

	#[test]
	fn short_name_falls_back_to_dotted_oid() {
		let registry = Registry::default();
		let ext = sample();
		assert_eq!(ext.short_name(&registry), "basicConstraints");

		let unknown = Extension::from_parts(
			&ObjectIdentifier::from_slice(&[1, 2, 3, 4]),
			false,
			&[0x05, 0x00],
		);
		assert_eq!(unknown.short_name(&registry), "1.2.3.4");
	}
}
