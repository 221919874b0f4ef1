use std::fmt::Debug;

use yasna::models::ObjectIdentifier;
use yasna::{DERWriter, Tag};

use x509_parser::der_parser::asn1_rs::{Any, Class, FromDer as _, Tag as DerTag};
use x509_parser::extensions as x509ext;
use x509_parser::prelude::FromDer;

use crate::certificate::Certificate;
use crate::ext::Extension;
use crate::oid;
use crate::san::{self, GeneralName};
use crate::Error;

/// The literal criticality marker of the extension value mini-language.
pub(crate) const CRITICAL_MARKER: &str = "critical,";

/// Evaluation context for value syntaxes that refer to the subject or
/// issuer certificate, e.g. `subjectKeyIdentifier = hash`.
///
/// Both certificates are independently optional and are borrowed only
/// for the duration of the encode call. There is no configuration
/// database; syntaxes that would need one fail instead of defaulting.
#[derive(Clone, Copy, Debug, Default)]
pub struct EncodeContext<'a> {
	subject: Option<&'a Certificate>,
	issuer: Option<&'a Certificate>,
}

impl<'a> EncodeContext<'a> {
	/// A context without subject or issuer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Attach the subject certificate.
	pub fn with_subject(mut self, subject: &'a Certificate) -> Self {
		self.subject = Some(subject);
		self
	}

	/// Attach the issuer certificate.
	pub fn with_issuer(mut self, issuer: &'a Certificate) -> Self {
		self.issuer = Some(issuer);
		self
	}

	pub(crate) fn subject(&self) -> Result<&'a Certificate, Error> {
		self.subject.ok_or_else(|| {
			Error::InvalidValueSyntax(
				"this value requires a subject certificate in the context".to_string(),
			)
		})
	}

	pub(crate) fn issuer(&self) -> Result<&'a Certificate, Error> {
		self.issuer.ok_or_else(|| {
			Error::InvalidValueSyntax(
				"this value requires an issuer certificate in the context".to_string(),
			)
		})
	}
}

/// The value syntax of one extension type.
///
/// A value syntax interprets the textual form of an extension value
/// (`"CA:TRUE, pathlen:0"`) into the DER encoded extnValue contents,
/// and prints stored contents back into display text. One implementor
/// is registered per supported OID; see [`Registry`].
pub trait ValueSyntax: Debug {
	/// Return the OID of the extension type.
	fn oid(&self) -> ObjectIdentifier;

	/// Return the canonical short name of the extension type.
	fn short_name(&self) -> &'static str;

	/// Interpret a value string into DER encoded extnValue contents.
	fn parse_value(&self, value: &str, ctx: &EncodeContext) -> Result<Vec<u8>, Error>;

	/// Render DER encoded extnValue contents for display.
	fn format_value(&self, der: &[u8]) -> Result<String, Error>;
}

/// The table of value syntaxes known to the encoder and formatter.
///
/// [`Registry::default`] carries the builtin extension types. The
/// registry is read-only once built and is passed explicitly wherever a
/// lookup happens, so tests can substitute a registry of their own.
#[derive(Debug)]
pub struct Registry {
	syntaxes: Vec<Box<dyn ValueSyntax>>,
}

impl Registry {
	/// A registry without any value syntaxes.
	pub fn empty() -> Self {
		Self {
			syntaxes: Vec::new(),
		}
	}

	/// Add a value syntax, replacing any earlier entry for the same OID.
	pub fn register(&mut self, syntax: Box<dyn ValueSyntax>) {
		let oid = syntax.oid();
		self.syntaxes.retain(|existing| existing.oid() != oid);
		self.syntaxes.push(syntax);
	}

	/// Look up a value syntax by extension short name.
	pub fn by_name(&self, name: &str) -> Option<&dyn ValueSyntax> {
		self.syntaxes
			.iter()
			.find(|syntax| syntax.short_name() == name)
			.map(|syntax| &**syntax)
	}

	/// Look up a value syntax by extension OID.
	pub fn by_oid(&self, oid: &ObjectIdentifier) -> Option<&dyn ValueSyntax> {
		self.syntaxes
			.iter()
			.find(|syntax| &syntax.oid() == oid)
			.map(|syntax| &**syntax)
	}

	/// Return the short name registered for an OID, if any.
	pub fn short_name_of(&self, oid: &ObjectIdentifier) -> Option<&'static str> {
		self.by_oid(oid).map(|syntax| syntax.short_name())
	}

	/// Construct an extension from its textual value.
	///
	/// The critical flag is folded into the value string as the literal
	/// `critical,` prefix before interpretation; the combined string is
	/// what the value mini-language actually sees. The named syntax
	/// interprets the remainder with `ctx` supplying the optional
	/// subject and issuer certificates.
	///
	/// # Errors
	///
	/// [`Error::UnknownExtensionType`] if no syntax is registered under
	/// `type_name`, [`Error::InvalidValueSyntax`] if the syntax rejects
	/// the value or required context is missing. No extension is
	/// produced on any error path.
	pub fn encode(
		&self,
		type_name: &str,
		critical: bool,
		value: &str,
		ctx: &EncodeContext,
	) -> Result<Extension<'static>, Error> {
		let combined = prepend_critical(critical, value)?;
		let syntax = self
			.by_name(type_name)
			.ok_or_else(|| Error::UnknownExtensionType(type_name.to_string()))?;
		let (critical, value) = split_critical(&combined);
		let payload = syntax.parse_value(value, ctx)?;
		Ok(Extension::from_parts(&syntax.oid(), critical, &payload))
	}
}

impl Default for Registry {
	fn default() -> Self {
		let mut registry = Registry::empty();
		registry.register(Box::new(BasicConstraints));
		registry.register(Box::new(KeyUsage));
		registry.register(Box::new(ExtendedKeyUsage));
		registry.register(Box::new(SubjectKeyIdentifier));
		registry.register(Box::new(AuthorityKeyIdentifier));
		registry.register(Box::new(SubjectAlternativeName));
		registry.register(Box::new(CrlDistributionPoints));
		registry.register(Box::new(NsComment));
		registry
	}
}

/// Fold the critical flag into the value string.
///
/// Criticality travels inside the value mini-language as a literal
/// `critical,` prefix shared with configuration file extension
/// sections, not as a structured field.
fn prepend_critical(critical: bool, value: &str) -> Result<String, Error> {
	let mut combined = String::new();
	combined
		.try_reserve(CRITICAL_MARKER.len() + value.len())
		.map_err(|_| Error::ResourceExhausted)?;
	if critical {
		combined.push_str(CRITICAL_MARKER);
	}
	combined.push_str(value);
	Ok(combined)
}

fn split_critical(value: &str) -> (bool, &str) {
	match value.strip_prefix(CRITICAL_MARKER) {
		Some(rest) => (true, rest),
		None => (false, value),
	}
}

/// An X.509v3 basic constraints value syntax according to
/// [RFC 5280 4.2.1.9](https://www.rfc-editor.org/rfc/rfc5280#section-4.2.1.9).
#[derive(Debug)]
struct BasicConstraints;

impl ValueSyntax for BasicConstraints {
	fn oid(&self) -> ObjectIdentifier {
		ObjectIdentifier::from_slice(oid::OID_BASIC_CONSTRAINTS)
	}

	fn short_name(&self) -> &'static str {
		"basicConstraints"
	}

	fn parse_value(&self, value: &str, _ctx: &EncodeContext) -> Result<Vec<u8>, Error> {
		let mut is_ca = None;
		let mut path_len = None;
		for token in value.split(',').map(str::trim) {
			match token.split_once(':') {
				Some(("CA", flag)) => is_ca = Some(parse_bool(flag)?),
				Some(("pathlen", len)) => {
					path_len = Some(len.parse::<u64>().map_err(|_| {
						Error::InvalidValueSyntax(format!("invalid pathlen {:?}", len))
					})?)
				},
				_ => {
					return Err(Error::InvalidValueSyntax(format!(
						"unknown basicConstraints token {:?}",
						token
					)))
				},
			}
		}
		let is_ca = is_ca.ok_or_else(|| {
			Error::InvalidValueSyntax("basicConstraints requires a CA token".to_string())
		})?;
		/*
			BasicConstraints ::= SEQUENCE {
				cA                      BOOLEAN DEFAULT FALSE,
				pathLenConstraint       INTEGER (0..MAX) OPTIONAL }
		*/
		Ok(yasna::construct_der(|writer| {
			writer.write_sequence(|writer| {
				if is_ca {
					writer.next().write_bool(true);
				}
				if let Some(len) = path_len {
					writer.next().write_u64(len);
				}
			})
		}))
	}

	fn format_value(&self, der: &[u8]) -> Result<String, Error> {
		let (_, constraints) = x509ext::BasicConstraints::from_der(der)
			.map_err(|e| Error::MalformedPayload(format!("invalid basicConstraints: {}", e)))?;
		let mut out = String::from(if constraints.ca { "CA:TRUE" } else { "CA:FALSE" });
		if let Some(len) = constraints.path_len_constraint {
			out.push_str(&format!(", pathlen:{}", len));
		}
		Ok(out)
	}
}

/// Bit name, display name and bit index of each key usage, in
/// [RFC 5280 4.2.1.3](https://www.rfc-editor.org/rfc/rfc5280#section-4.2.1.3) order.
const KEY_USAGE_BITS: &[(&str, &str, u32)] = &[
	("digitalSignature", "Digital Signature", 0),
	("nonRepudiation", "Non Repudiation", 1),
	("keyEncipherment", "Key Encipherment", 2),
	("dataEncipherment", "Data Encipherment", 3),
	("keyAgreement", "Key Agreement", 4),
	("keyCertSign", "Certificate Sign", 5),
	("cRLSign", "CRL Sign", 6),
	("encipherOnly", "Encipher Only", 7),
	("decipherOnly", "Decipher Only", 8),
];

/// An X.509v3 key usage value syntax according to
/// [RFC 5280 4.2.1.3](https://www.rfc-editor.org/rfc/rfc5280#section-4.2.1.3).
#[derive(Debug)]
struct KeyUsage;

impl ValueSyntax for KeyUsage {
	fn oid(&self) -> ObjectIdentifier {
		ObjectIdentifier::from_slice(oid::OID_KEY_USAGE)
	}

	fn short_name(&self) -> &'static str {
		"keyUsage"
	}

	fn parse_value(&self, value: &str, _ctx: &EncodeContext) -> Result<Vec<u8>, Error> {
		let mut bits: u16 = 0;
		for token in value.split(',').map(str::trim) {
			let (_, _, index) = KEY_USAGE_BITS
				.iter()
				.find(|(name, _, _)| *name == token)
				.ok_or_else(|| {
					Error::InvalidValueSyntax(format!("unknown keyUsage {:?}", token))
				})?;
			bits |= 1 << index;
		}
		/*
		   KeyUsage ::= BIT STRING {
			  digitalSignature        (0),
			  nonRepudiation          (1),
			  keyEncipherment         (2),
			  dataEncipherment        (3),
			  keyAgreement            (4),
			  keyCertSign             (5),
			  cRLSign                 (6),
			  encipherOnly            (7),
			  decipherOnly            (8) }
		*/
		Ok(yasna::construct_der(|writer| {
			// Compute the 1-based most significant bit
			let msb = 16 - bits.leading_zeros();
			let nb = if msb <= 8 { 1 } else { 2 };
			let bits = bits.reverse_bits().to_be_bytes();

			// Finally take only the bytes != 0
			let bits = &bits[..nb];
			writer.write_bitvec_bytes(bits, msb as usize)
		}))
	}

	fn format_value(&self, der: &[u8]) -> Result<String, Error> {
		let (_, usage) = x509ext::KeyUsage::from_der(der)
			.map_err(|e| Error::MalformedPayload(format!("invalid keyUsage: {}", e)))?;
		let set = [
			usage.digital_signature(),
			usage.non_repudiation(),
			usage.key_encipherment(),
			usage.data_encipherment(),
			usage.key_agreement(),
			usage.key_cert_sign(),
			usage.crl_sign(),
			usage.encipher_only(),
			usage.decipher_only(),
		];
		let names = KEY_USAGE_BITS
			.iter()
			.zip(set)
			.filter(|(_, set)| *set)
			.map(|((_, display, _), _)| *display)
			.collect::<Vec<_>>();
		Ok(names.join(", "))
	}
}

/// Purpose short name, display name and OID of each extended key usage,
/// per [RFC 5280 4.2.1.12](https://www.rfc-editor.org/rfc/rfc5280#section-4.2.1.12).
const EXT_KEY_USAGE_PURPOSES: &[(&str, &str, &[u64])] = &[
	(
		"serverAuth",
		"TLS Web Server Authentication",
		oid::OID_KP_SERVER_AUTH,
	),
	(
		"clientAuth",
		"TLS Web Client Authentication",
		oid::OID_KP_CLIENT_AUTH,
	),
	("codeSigning", "Code Signing", oid::OID_KP_CODE_SIGNING),
	(
		"emailProtection",
		"E-mail Protection",
		oid::OID_KP_EMAIL_PROTECTION,
	),
	("timeStamping", "Time Stamping", oid::OID_KP_TIME_STAMPING),
	("OCSPSigning", "OCSP Signing", oid::OID_KP_OCSP_SIGNING),
	(
		"anyExtendedKeyUsage",
		"Any Extended Key Usage",
		oid::OID_ANY_EXT_KEY_USAGE,
	),
];

/// An X.509v3 extended key usage value syntax according to
/// [RFC 5280 4.2.1.12](https://www.rfc-editor.org/rfc/rfc5280#section-4.2.1.12).
#[derive(Debug)]
struct ExtendedKeyUsage;

impl ValueSyntax for ExtendedKeyUsage {
	fn oid(&self) -> ObjectIdentifier {
		ObjectIdentifier::from_slice(oid::OID_EXT_KEY_USAGE)
	}

	fn short_name(&self) -> &'static str {
		"extendedKeyUsage"
	}

	fn parse_value(&self, value: &str, _ctx: &EncodeContext) -> Result<Vec<u8>, Error> {
		let mut purposes = Vec::new();
		for token in value.split(',').map(str::trim) {
			let (_, _, oid) = EXT_KEY_USAGE_PURPOSES
				.iter()
				.find(|(name, _, _)| *name == token)
				.ok_or_else(|| {
					Error::InvalidValueSyntax(format!("unknown extendedKeyUsage {:?}", token))
				})?;
			purposes.push(*oid);
		}
		/*
		  ExtKeyUsageSyntax ::= SEQUENCE SIZE (1..MAX) OF KeyPurposeId
		  KeyPurposeId ::= OBJECT IDENTIFIER
		*/
		Ok(yasna::construct_der(|writer| {
			writer.write_sequence(|writer| {
				for purpose in &purposes {
					writer
						.next()
						.write_oid(&ObjectIdentifier::from_slice(purpose));
				}
			})
		}))
	}

	fn format_value(&self, der: &[u8]) -> Result<String, Error> {
		let (_, usage) = x509ext::ExtendedKeyUsage::from_der(der)
			.map_err(|e| Error::MalformedPayload(format!("invalid extendedKeyUsage: {}", e)))?;
		let mut purposes = Vec::new();
		if usage.any {
			purposes.push("Any Extended Key Usage".to_string());
		}
		if usage.server_auth {
			purposes.push("TLS Web Server Authentication".to_string());
		}
		if usage.client_auth {
			purposes.push("TLS Web Client Authentication".to_string());
		}
		if usage.code_signing {
			purposes.push("Code Signing".to_string());
		}
		if usage.email_protection {
			purposes.push("E-mail Protection".to_string());
		}
		if usage.time_stamping {
			purposes.push("Time Stamping".to_string());
		}
		if usage.ocsp_signing {
			purposes.push("OCSP Signing".to_string());
		}
		for other in &usage.other {
			purposes.push(other.to_string());
		}
		Ok(purposes.join(", "))
	}
}

/// An X.509v3 subject key identifier value syntax according to
/// [RFC 5280 4.2.1.2](https://www.rfc-editor.org/rfc/rfc5280#section-4.2.1.2).
///
/// The value is either the word `hash`, deriving the identifier from
/// the subject certificate's public key, or a literal hex string.
#[derive(Debug)]
struct SubjectKeyIdentifier;

impl ValueSyntax for SubjectKeyIdentifier {
	fn oid(&self) -> ObjectIdentifier {
		ObjectIdentifier::from_slice(oid::OID_SUBJECT_KEY_IDENTIFIER)
	}

	fn short_name(&self) -> &'static str {
		"subjectKeyIdentifier"
	}

	fn parse_value(&self, value: &str, ctx: &EncodeContext) -> Result<Vec<u8>, Error> {
		let key_id = if value.trim() == "hash" {
			ctx.subject()?.key_identifier()?
		} else {
			parse_key_id(value)?
		};
		// SubjectKeyIdentifier ::= KeyIdentifier ::= OCTET STRING
		Ok(yasna::construct_der(|writer| writer.write_bytes(&key_id)))
	}

	fn format_value(&self, der: &[u8]) -> Result<String, Error> {
		let key_id = decode_primitive(der, DerTag::OctetString, "subjectKeyIdentifier")?;
		Ok(format_key_id(key_id))
	}
}

/// An X.509v3 authority key identifier value syntax according to
/// [RFC 5280 4.2.1.1](https://www.rfc-editor.org/rfc/rfc5280#section-4.2.1.1).
///
/// `keyid` copies the issuer certificate's subject key identifier
/// (falling back to a hash of its public key), `issuer` copies the
/// issuer certificate's issuer name and serial number. Both forms
/// require an issuer certificate in the context.
#[derive(Debug)]
struct AuthorityKeyIdentifier;

impl ValueSyntax for AuthorityKeyIdentifier {
	fn oid(&self) -> ObjectIdentifier {
		ObjectIdentifier::from_slice(oid::OID_AUTHORITY_KEY_IDENTIFIER)
	}

	fn short_name(&self) -> &'static str {
		"authorityKeyIdentifier"
	}

	fn parse_value(&self, value: &str, ctx: &EncodeContext) -> Result<Vec<u8>, Error> {
		let mut want_keyid = false;
		let mut want_issuer = false;
		for token in value.split(',').map(str::trim) {
			match token {
				"keyid" | "keyid:always" => want_keyid = true,
				"issuer" | "issuer:always" => want_issuer = true,
				_ => {
					return Err(Error::InvalidValueSyntax(format!(
						"unknown authorityKeyIdentifier token {:?}",
						token
					)))
				},
			}
		}
		let issuer = ctx.issuer()?;
		let key_id = if want_keyid {
			Some(match issuer.subject_key_identifier()? {
				Some(key_id) => key_id,
				None => issuer.key_identifier()?,
			})
		} else {
			None
		};
		let issuer_parts = if want_issuer {
			Some((issuer.issuer_name_der()?, issuer.serial()?))
		} else {
			None
		};
		/*
			AuthorityKeyIdentifier ::= SEQUENCE {
				   keyIdentifier             [0] KeyIdentifier           OPTIONAL,
				   authorityCertIssuer       [1] GeneralNames            OPTIONAL,
				   authorityCertSerialNumber [2] CertificateSerialNumber OPTIONAL  }
			KeyIdentifier ::= OCTET STRING
		*/
		Ok(yasna::construct_der(|writer| {
			writer.write_sequence(|writer| {
				if let Some(key_id) = &key_id {
					writer
						.next()
						.write_tagged_implicit(Tag::context(0), |writer| {
							writer.write_bytes(key_id)
						});
				}
				if let Some((name_der, serial)) = &issuer_parts {
					writer
						.next()
						.write_tagged_implicit(Tag::context(1), |writer| {
							writer.write_sequence(|writer| {
								// directoryName [4] EXPLICIT Name
								writer.next().write_tagged(Tag::context(4), |writer| {
									writer.write_der(name_der)
								});
							})
						});
					writer
						.next()
						.write_tagged_implicit(Tag::context(2), |writer| {
							writer.write_bigint_bytes(serial, true)
						});
				}
			})
		}))
	}

	fn format_value(&self, der: &[u8]) -> Result<String, Error> {
		let (_, aki) = x509ext::AuthorityKeyIdentifier::from_der(der)
			.map_err(|e| Error::MalformedPayload(format!("invalid authorityKeyIdentifier: {}", e)))?;
		let mut parts = Vec::new();
		if let Some(key_id) = &aki.key_identifier {
			parts.push(format!("keyid:{}", format_key_id(key_id.0)));
		}
		if let Some(names) = &aki.authority_cert_issuer {
			for name in names {
				parts.push(san::format_single_name(&GeneralName::from_parsed(name)?));
			}
		}
		if let Some(serial) = &aki.authority_cert_serial {
			parts.push(format!("serial:{}", format_key_id(serial)));
		}
		Ok(parts.join(", "))
	}
}

/// The X.509v3 subject alternative name value syntax according to
/// [RFC 5280 4.2.1.6](https://www.rfc-editor.org/rfc/rfc5280#section-4.2.1.6).
///
/// Printing goes through the NUL-safe general name renderer in
/// [`crate::san`] rather than a generic string printer.
#[derive(Debug)]
struct SubjectAlternativeName;

impl ValueSyntax for SubjectAlternativeName {
	fn oid(&self) -> ObjectIdentifier {
		ObjectIdentifier::from_slice(oid::OID_SUBJECT_ALT_NAME)
	}

	fn short_name(&self) -> &'static str {
		"subjectAltName"
	}

	fn parse_value(&self, value: &str, _ctx: &EncodeContext) -> Result<Vec<u8>, Error> {
		/*
		   SubjectAltName ::= GeneralNames
		   GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName
		*/
		san::encode_general_names(&san::parse_value(value)?)
	}

	fn format_value(&self, der: &[u8]) -> Result<String, Error> {
		Ok(san::format_general_names(&san::decode_general_names(der)?))
	}
}

/// An X.509v3 CRL distribution points value syntax according to
/// [RFC 5280 4.2.1.13](https://www.rfc-editor.org/rfc/rfc5280#section-4.2.1.13),
/// limited to the plain `URI:` list form.
#[derive(Debug)]
struct CrlDistributionPoints;

impl ValueSyntax for CrlDistributionPoints {
	fn oid(&self) -> ObjectIdentifier {
		ObjectIdentifier::from_slice(oid::OID_CRL_DISTRIBUTION_POINTS)
	}

	fn short_name(&self) -> &'static str {
		"crlDistributionPoints"
	}

	fn parse_value(&self, value: &str, _ctx: &EncodeContext) -> Result<Vec<u8>, Error> {
		let mut uris = Vec::new();
		for entry in value.split(',').map(str::trim) {
			let uri = entry.strip_prefix("URI:").ok_or_else(|| {
				Error::InvalidValueSyntax(format!(
					"crlDistributionPoints entry {:?} is not a URI",
					entry
				))
			})?;
			if !uri.is_ascii() {
				return Err(Error::InvalidValueSyntax(format!(
					"URI {:?} is not an IA5 string",
					uri
				)));
			}
			uris.push(uri);
		}
		// CRLDistributionPoints ::= SEQUENCE SIZE (1..MAX) OF DistributionPoint
		Ok(yasna::construct_der(|writer| {
			writer.write_sequence(|writer| {
				for uri in &uris {
					// DistributionPoint ::= SEQUENCE {
					//     distributionPoint [0] DistributionPointName OPTIONAL }
					writer.next().write_sequence(|writer| {
						write_distribution_point_name_uri(writer.next(), uri);
					});
				}
			})
		}))
	}

	fn format_value(&self, der: &[u8]) -> Result<String, Error> {
		let (_, crl_points) = x509ext::CRLDistributionPoints::from_der(der)
			.map_err(|e| Error::MalformedPayload(format!("invalid crlDistributionPoints: {}", e)))?;
		let mut parts = Vec::new();
		for point in &crl_points.points {
			match &point.distribution_point {
				Some(x509ext::DistributionPointName::FullName(names)) => {
					for name in names {
						parts.push(san::format_single_name(&GeneralName::from_parsed(name)?));
					}
				},
				Some(_) => parts.push("Relative Name:<unsupported>".to_string()),
				None => {},
			}
		}
		Ok(parts.join(", "))
	}
}

fn write_distribution_point_name_uri(writer: DERWriter, uri: &str) {
	// distributionPoint DistributionPointName
	writer.write_tagged_implicit(Tag::context(0), |writer| {
		writer.write_sequence(|writer| {
			// fullName GeneralNames
			writer
				.next()
				.write_tagged_implicit(Tag::context(0), |writer| {
					// GeneralNames
					writer.write_sequence(|writer| {
						// uniformResourceIdentifier [6] IA5String,
						writer
							.next()
							.write_tagged_implicit(Tag::context(6), |writer| {
								writer.write_ia5_string(uri)
							});
					})
				});
		});
	});
}

/// The Netscape certificate comment value syntax, a free-form
/// IA5String.
#[derive(Debug)]
struct NsComment;

impl ValueSyntax for NsComment {
	fn oid(&self) -> ObjectIdentifier {
		ObjectIdentifier::from_slice(oid::OID_NS_COMMENT)
	}

	fn short_name(&self) -> &'static str {
		"nsComment"
	}

	fn parse_value(&self, value: &str, _ctx: &EncodeContext) -> Result<Vec<u8>, Error> {
		if !value.is_ascii() {
			return Err(Error::InvalidValueSyntax(format!(
				"comment {:?} is not an IA5 string",
				value
			)));
		}
		Ok(yasna::construct_der(|writer| {
			writer.write_ia5_string(value)
		}))
	}

	fn format_value(&self, der: &[u8]) -> Result<String, Error> {
		let data = decode_primitive(der, DerTag::Ia5String, "nsComment")?;
		String::from_utf8(data.to_vec())
			.map_err(|_| Error::MalformedPayload("nsComment is not valid IA5".to_string()))
	}
}

fn parse_bool(value: &str) -> Result<bool, Error> {
	// Boolean spellings accepted by the OpenSSL configuration syntax.
	if ["TRUE", "YES", "Y"].iter().any(|t| value.eq_ignore_ascii_case(t)) {
		Ok(true)
	} else if ["FALSE", "NO", "N"].iter().any(|f| value.eq_ignore_ascii_case(f)) {
		Ok(false)
	} else {
		Err(Error::InvalidValueSyntax(format!(
			"expected a boolean, got {:?}",
			value
		)))
	}
}

/// Render a key identifier as uppercase colon separated hex pairs.
fn format_key_id(key_id: &[u8]) -> String {
	let mut out = String::with_capacity(key_id.len() * 3);
	for (i, byte) in key_id.iter().enumerate() {
		if i > 0 {
			out.push(':');
		}
		out.push_str(&format!("{:02X}", byte));
	}
	out
}

fn parse_key_id(value: &str) -> Result<Vec<u8>, Error> {
	let cleaned: String = value.chars().filter(|c| *c != ':').collect();
	if cleaned.is_empty() {
		return Err(Error::InvalidValueSyntax(
			"empty key identifier".to_string(),
		));
	}
	hex::decode(&cleaned)
		.map_err(|_| Error::InvalidValueSyntax(format!("invalid hex key identifier {:?}", value)))
}

/// Decode a single primitive DER element of the expected universal tag.
fn decode_primitive<'a>(der: &'a [u8], tag: DerTag, what: &str) -> Result<&'a [u8], Error> {
	let (rem, any) =
		Any::from_der(der).map_err(|e| Error::MalformedPayload(format!("invalid {}: {}", what, e)))?;
	if !rem.is_empty() {
		return Err(Error::MalformedPayload(format!(
			"trailing bytes after {}",
			what
		)));
	}
	if any.header.class() != Class::Universal || any.header.tag() != tag {
		return Err(Error::MalformedPayload(format!(
			"{} has an unexpected tag",
			what
		)));
	}
	Ok(any.data)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ctx() -> EncodeContext<'static> {
		EncodeContext::new()
	}

	#[test]
	fn critical_prefix() {
		assert_eq!(prepend_critical(true, "CA:TRUE").unwrap(), "critical,CA:TRUE");
		assert_eq!(prepend_critical(false, "CA:TRUE").unwrap(), "CA:TRUE");
		assert_eq!(prepend_critical(true, "").unwrap(), "critical,");
		assert_eq!(prepend_critical(false, "").unwrap(), "");
	}

	#[test]
	fn critical_split() {
		assert_eq!(split_critical("critical,CA:TRUE"), (true, "CA:TRUE"));
		assert_eq!(split_critical("CA:TRUE"), (false, "CA:TRUE"));
		assert_eq!(split_critical("critical,"), (true, ""));
		assert_eq!(split_critical(""), (false, ""));
	}

	#[test]
	fn critical_marker_inside_value_is_honored() {
		// The marker is value syntax, so a value that spells it out
		// itself produces a critical extension.
		let registry = Registry::default();
		let ext = registry
			.encode("basicConstraints", false, "critical,CA:TRUE", &ctx())
			.unwrap();
		assert!(ext.critical());
	}

	#[test]
	fn basic_constraints_der() {
		let syntax = BasicConstraints;
		assert_eq!(
			syntax.parse_value("CA:TRUE", &ctx()).unwrap(),
			vec![0x30, 0x03, 0x01, 0x01, 0xFF]
		);
		assert_eq!(syntax.parse_value("CA:FALSE", &ctx()).unwrap(), vec![0x30, 0x00]);
		assert_eq!(
			syntax.parse_value("CA:TRUE, pathlen:3", &ctx()).unwrap(),
			vec![0x30, 0x06, 0x01, 0x01, 0xFF, 0x02, 0x01, 0x03]
		);
	}

	#[test]
	fn basic_constraints_format() {
		let syntax = BasicConstraints;
		let der = syntax.parse_value("CA:TRUE, pathlen:3", &ctx()).unwrap();
		assert_eq!(syntax.format_value(&der).unwrap(), "CA:TRUE, pathlen:3");
		let der = syntax.parse_value("CA:FALSE", &ctx()).unwrap();
		assert_eq!(syntax.format_value(&der).unwrap(), "CA:FALSE");
	}

	#[test]
	fn basic_constraints_rejects_junk() {
		assert!(matches!(
			BasicConstraints.parse_value("CA:MAYBE", &ctx()),
			Err(Error::InvalidValueSyntax(_))
		));
		assert!(matches!(
			BasicConstraints.parse_value("pathlen:1", &ctx()),
			Err(Error::InvalidValueSyntax(_))
		));
	}

	#[test]
	fn key_usage_single_byte() {
		let der = KeyUsage
			.parse_value("digitalSignature, keyEncipherment", &ctx())
			.unwrap();
		assert_eq!(der, vec![0x03, 0x02, 0x05, 0xA0]);
	}

	#[test]
	fn key_usage_two_bytes() {
		let der = KeyUsage.parse_value("decipherOnly", &ctx()).unwrap();
		assert_eq!(der, vec![0x03, 0x03, 0x07, 0x00, 0x80]);
	}

	#[test]
	fn key_usage_format() {
		let der = KeyUsage
			.parse_value("digitalSignature, cRLSign", &ctx())
			.unwrap();
		assert_eq!(
			KeyUsage.format_value(&der).unwrap(),
			"Digital Signature, CRL Sign"
		);
	}

	#[test]
	fn extended_key_usage_round_trip() {
		let der = ExtendedKeyUsage
			.parse_value("serverAuth, OCSPSigning", &ctx())
			.unwrap();
		assert_eq!(
			ExtendedKeyUsage.format_value(&der).unwrap(),
			"TLS Web Server Authentication, OCSP Signing"
		);
	}

	#[test]
	fn subject_key_identifier_literal() {
		let der = SubjectKeyIdentifier
			.parse_value("AB:CD:EF", &ctx())
			.unwrap();
		assert_eq!(der, vec![0x04, 0x03, 0xAB, 0xCD, 0xEF]);
		assert_eq!(
			SubjectKeyIdentifier.format_value(&der).unwrap(),
			"AB:CD:EF"
		);
	}

	#[test]
	fn subject_key_identifier_hash_needs_subject() {
		assert!(matches!(
			SubjectKeyIdentifier.parse_value("hash", &ctx()),
			Err(Error::InvalidValueSyntax(_))
		));
	}

	#[test]
	fn authority_key_identifier_needs_issuer() {
		assert!(matches!(
			AuthorityKeyIdentifier.parse_value("keyid,issuer", &ctx()),
			Err(Error::InvalidValueSyntax(_))
		));
	}

	#[test]
	fn ns_comment_round_trip() {
		let der = NsComment.parse_value("example comment", &ctx()).unwrap();
		let mut expected = vec![0x16, 0x0F];
		expected.extend_from_slice(b"example comment");
		assert_eq!(der, expected);
		assert_eq!(NsComment.format_value(&der).unwrap(), "example comment");
	}

	#[test]
	fn ns_comment_empty_value() {
		let der = NsComment.parse_value("", &ctx()).unwrap();
		assert_eq!(der, vec![0x16, 0x00]);
		assert_eq!(NsComment.format_value(&der).unwrap(), "");
	}

	#[test]
	fn bool_spellings() {
		assert!(parse_bool("TRUE").unwrap());
		assert!(parse_bool("true").unwrap());
		assert!(parse_bool("Y").unwrap());
		assert!(!parse_bool("FALSE").unwrap());
		assert!(!parse_bool("no").unwrap());
		assert!(parse_bool("1").is_err());
	}

	#[test]
	fn key_id_helpers() {
		assert_eq!(parse_key_id("ab:cd:ef").unwrap(), vec![0xAB, 0xCD, 0xEF]);
		assert_eq!(parse_key_id("ABCDEF").unwrap(), vec![0xAB, 0xCD, 0xEF]);
		assert!(parse_key_id("").is_err());
		assert!(parse_key_id("xy").is_err());
		assert_eq!(format_key_id(&[0xAB, 0xCD, 0xEF]), "AB:CD:EF");
		assert_eq!(format_key_id(&[]), "");
	}

	#[test]
	fn registry_lookup() {
		let registry = Registry::default();
		assert!(registry.by_name("basicConstraints").is_some());
		assert!(registry.by_name("bogusExtensionName").is_none());
		let san_oid = ObjectIdentifier::from_slice(oid::OID_SUBJECT_ALT_NAME);
		assert_eq!(registry.short_name_of(&san_oid), Some("subjectAltName"));
		let unknown = ObjectIdentifier::from_slice(&[1, 2, 3, 4]);
		assert_eq!(registry.short_name_of(&unknown), None);
	}

	#[test]
	fn registry_unknown_type() {
		let registry = Registry::default();
		assert_eq!(
			registry.encode("bogusExtensionName", false, "x", &ctx()),
			Err(Error::UnknownExtensionType("bogusExtensionName".to_string()))
		);
	}
}
