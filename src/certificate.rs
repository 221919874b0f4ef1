use pki_types::CertificateDer;
use ring::digest;

use x509_parser::der_parser::asn1_rs::{Any, Class, FromDer as _, Tag};
use x509_parser::extensions::ParsedExtension;
use x509_parser::oid_registry::OID_X509_EXT_SUBJECT_KEY_IDENTIFIER;
use x509_parser::prelude::{FromDer, X509Certificate};

use crate::ext::Extension;
use crate::Error;

/// A certificate supplying read-only context to the extension encoder.
///
/// Value syntaxes consult it to derive key identifiers or to copy the
/// issuer name and serial; [`Certificate::extensions`] additionally
/// exposes the certificate's own extensions as borrowed views.
#[derive(Debug, Clone)]
pub struct Certificate {
	der: CertificateDer<'static>,
}

impl Certificate {
	/// Take ownership of a DER encoded certificate.
	///
	/// The encoding is validated up front so the context accessors
	/// never run into structural surprises later.
	pub fn from_der(der: impl Into<CertificateDer<'static>>) -> Result<Self, Error> {
		let der = der.into();
		let (rem, _) = X509Certificate::from_der(der.as_ref())
			.map_err(|_| Error::CouldNotParseCertificate)?;
		if !rem.is_empty() {
			return Err(Error::CouldNotParseCertificate);
		}
		Ok(Self { der })
	}

	/// Parse a certificate from its PEM encoding.
	#[cfg(feature = "pem")]
	pub fn from_pem(pem_str: &str) -> Result<Self, Error> {
		let pem = pem::parse(pem_str).map_err(|e| Error::PemError(e.to_string()))?;
		Self::from_der(pem.into_contents())
	}

	/// Get the certificate in DER encoded format.
	pub fn der(&self) -> &CertificateDer<'static> {
		&self.der
	}

	fn parsed(&self) -> Result<X509Certificate<'_>, Error> {
		let (_, cert) = X509Certificate::from_der(self.der.as_ref())
			.map_err(|_| Error::CouldNotParseCertificate)?;
		Ok(cert)
	}

	/// Calculates a key identifier for the certificate's public key.
	///
	/// SHA-1 over the subjectPublicKey bits, the derivation of
	/// [RFC 5280 4.2.1.2](https://www.rfc-editor.org/rfc/rfc5280#section-4.2.1.2)
	/// method (1). Digest use only; the hash does not protect anything.
	pub(crate) fn key_identifier(&self) -> Result<Vec<u8>, Error> {
		let cert = self.parsed()?;
		let public_key = &cert.tbs_certificate.subject_pki.subject_public_key;
		let digest = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, public_key.data.as_ref());
		Ok(digest.as_ref().to_vec())
	}

	/// The key identifier stored in the certificate's own
	/// subjectKeyIdentifier extension, if it carries one.
	pub(crate) fn subject_key_identifier(&self) -> Result<Option<Vec<u8>>, Error> {
		let cert = self.parsed()?;
		let ext = cert
			.get_extension_unique(&OID_X509_EXT_SUBJECT_KEY_IDENTIFIER)
			.map_err(|_| Error::CouldNotParseCertificate)?;
		match ext.map(|ext| ext.parsed_extension()) {
			Some(ParsedExtension::SubjectKeyIdentifier(key_id)) => Ok(Some(key_id.0.to_vec())),
			_ => Ok(None),
		}
	}

	/// The DER encoding of the certificate's issuer name.
	pub(crate) fn issuer_name_der(&self) -> Result<Vec<u8>, Error> {
		Ok(self.parsed()?.tbs_certificate.issuer.as_raw().to_vec())
	}

	/// The certificate's serial number, as raw INTEGER content bytes.
	pub(crate) fn serial(&self) -> Result<Vec<u8>, Error> {
		Ok(self.parsed()?.tbs_certificate.raw_serial().to_vec())
	}

	/// Borrowed views of the certificate's extensions, in certificate
	/// order.
	///
	/// The views alias this certificate's encoding; converting one with
	/// [`Extension::into_owned`] copies it out.
	pub fn extensions(&self) -> Result<Vec<Extension<'_>>, Error> {
		extension_tlvs(self.der.as_ref())?
			.into_iter()
			.map(Extension::from_der)
			.collect()
	}
}

/// Slice the full TLV of every extension out of a certificate.
///
/// Walks Certificate -> TBSCertificate -> extensions [3], returning one
/// subslice per Extension SEQUENCE so the views can borrow instead of
/// copying.
fn extension_tlvs(cert_der: &[u8]) -> Result<Vec<&[u8]>, Error> {
	let (_, cert) = Any::from_der(cert_der).map_err(|_| Error::CouldNotParseCertificate)?;
	let (_, tbs) = Any::from_der(cert.data).map_err(|_| Error::CouldNotParseCertificate)?;
	let mut fields = tbs.data;
	let mut slices = Vec::new();
	while !fields.is_empty() {
		let (rest, field) = Any::from_der(fields).map_err(|_| Error::CouldNotParseCertificate)?;
		if field.header.class() == Class::ContextSpecific && field.header.tag() == Tag(3) {
			// extensions [3] EXPLICIT Extensions, a SEQUENCE OF Extension
			let (_, list) = Any::from_der(field.data).map_err(|_| Error::CouldNotParseCertificate)?;
			let mut entries = list.data;
			while !entries.is_empty() {
				let (rest, _) =
					Any::from_der(entries).map_err(|_| Error::CouldNotParseCertificate)?;
				slices.push(&entries[..entries.len() - rest.len()]);
				entries = rest;
			}
			break;
		}
		fields = rest;
	}
	Ok(slices)
}
