use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use yasna::models::ObjectIdentifier;
use yasna::Tag;

use x509_parser::extensions::GeneralName as ParsedGeneralName;
use x509_parser::extensions::SubjectAlternativeName as ParsedSubjectAltName;
use x509_parser::prelude::FromDer;

use crate::{oid_from_parsed, Error};

/// One entry of a subjectAltName extension, tagged by kind.
///
/// The `email`, `DNS`, `URI`, `IP` and `RID` kinds can be produced from
/// the textual value syntax. The remaining kinds only arise when
/// decoding an existing extension and have no textual spelling.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
#[allow(missing_docs)]
pub enum GeneralName {
	OtherName,
	/// Also known as E-Mail address
	Rfc822Name(String),
	DnsName(String),
	X400Address,
	/// Distinguished name in its display form
	DirectoryName(String),
	EdiPartyName,
	Uri(String),
	IpAddress(IpAddr),
	RegisteredId(ObjectIdentifier),
}

impl GeneralName {
	fn tag(&self) -> u64 {
		// Defined in the GeneralName list in
		// https://tools.ietf.org/html/rfc5280#page-38
		match self {
			GeneralName::OtherName => 0,
			GeneralName::Rfc822Name(_) => 1,
			GeneralName::DnsName(_) => 2,
			GeneralName::X400Address => 3,
			GeneralName::DirectoryName(_) => 4,
			GeneralName::EdiPartyName => 5,
			GeneralName::Uri(_) => 6,
			GeneralName::IpAddress(_) => 7,
			GeneralName::RegisteredId(_) => 8,
		}
	}

	fn type_name(&self) -> &'static str {
		match self {
			GeneralName::OtherName => "otherName",
			GeneralName::Rfc822Name(_) => "email",
			GeneralName::DnsName(_) => "DNS",
			GeneralName::X400Address => "X400Name",
			GeneralName::DirectoryName(_) => "dirName",
			GeneralName::EdiPartyName => "EDIPartyName",
			GeneralName::Uri(_) => "URI",
			GeneralName::IpAddress(_) => "IP",
			GeneralName::RegisteredId(_) => "RID",
		}
	}

	pub(crate) fn from_parsed(name: &ParsedGeneralName<'_>) -> Result<Self, Error> {
		Ok(match name {
			ParsedGeneralName::OtherName(..) => GeneralName::OtherName,
			ParsedGeneralName::RFC822Name(name) => GeneralName::Rfc822Name((*name).into()),
			ParsedGeneralName::DNSName(name) => GeneralName::DnsName((*name).into()),
			ParsedGeneralName::X400Address(..) => GeneralName::X400Address,
			ParsedGeneralName::DirectoryName(name) => GeneralName::DirectoryName(name.to_string()),
			ParsedGeneralName::EDIPartyName(..) => GeneralName::EdiPartyName,
			ParsedGeneralName::URI(name) => GeneralName::Uri((*name).into()),
			ParsedGeneralName::IPAddress(octets) => {
				GeneralName::IpAddress(ip_addr_from_octets(octets)?)
			},
			ParsedGeneralName::RegisteredID(oid) => GeneralName::RegisteredId(oid_from_parsed(oid)?),
			_ => {
				return Err(Error::MalformedPayload(
					"unsupported general name type".to_string(),
				))
			},
		})
	}

	/// Encode the name as a tagged GeneralName DER element.
	///
	/// Only the kinds the value syntax can express are encodable.
	pub(crate) fn to_der(&self) -> Result<Vec<u8>, Error> {
		match self {
			GeneralName::Rfc822Name(name) | GeneralName::DnsName(name) | GeneralName::Uri(name) => {
				check_ia5(name, self.type_name())?;
				Ok(yasna::construct_der(|writer| {
					writer.write_tagged_implicit(Tag::context(self.tag()), |writer| {
						writer.write_ia5_string(name)
					})
				}))
			},
			GeneralName::IpAddress(IpAddr::V4(addr)) => Ok(yasna::construct_der(|writer| {
				writer.write_tagged_implicit(Tag::context(self.tag()), |writer| {
					writer.write_bytes(&addr.octets())
				})
			})),
			GeneralName::IpAddress(IpAddr::V6(addr)) => Ok(yasna::construct_der(|writer| {
				writer.write_tagged_implicit(Tag::context(self.tag()), |writer| {
					writer.write_bytes(&addr.octets())
				})
			})),
			GeneralName::RegisteredId(oid) => Ok(yasna::construct_der(|writer| {
				writer.write_tagged_implicit(Tag::context(self.tag()), |writer| {
					writer.write_oid(oid)
				})
			})),
			other => Err(Error::InvalidValueSyntax(format!(
				"general names of type {} cannot be encoded from a value string",
				other.type_name()
			))),
		}
	}
}

fn ip_addr_from_octets(octets: &[u8]) -> Result<IpAddr, Error> {
	if let Ok(ipv6_octets) = <&[u8; 16]>::try_from(octets) {
		Ok(Ipv6Addr::from(*ipv6_octets).into())
	} else if let Ok(ipv4_octets) = <&[u8; 4]>::try_from(octets) {
		Ok(Ipv4Addr::from(*ipv4_octets).into())
	} else {
		Err(Error::MalformedPayload(format!(
			"invalid IP address length {}",
			octets.len()
		)))
	}
}

fn check_ia5(value: &str, what: &str) -> Result<(), Error> {
	if value.is_ascii() {
		Ok(())
	} else {
		Err(Error::InvalidValueSyntax(format!(
			"{} name {:?} is not an IA5 string",
			what, value
		)))
	}
}

fn parse_oid_text(value: &str) -> Result<ObjectIdentifier, Error> {
	let components = value
		.split('.')
		.map(|arc| arc.parse::<u64>())
		.collect::<Result<Vec<u64>, _>>()
		.map_err(|_| Error::InvalidValueSyntax(format!("invalid object identifier {:?}", value)))?;
	if components.len() < 2 {
		return Err(Error::InvalidValueSyntax(format!(
			"invalid object identifier {:?}",
			value
		)));
	}
	Ok(ObjectIdentifier::from_slice(&components))
}

/// Parse the subjectAltName value syntax, a comma separated list of
/// `type:value` entries.
pub(crate) fn parse_value(value: &str) -> Result<Vec<GeneralName>, Error> {
	let mut names = Vec::new();
	for entry in value.split(',') {
		let entry = entry.trim();
		let (kind, name) = entry.split_once(':').ok_or_else(|| {
			Error::InvalidValueSyntax(format!(
				"subjectAltName entry {:?} is missing a type prefix",
				entry
			))
		})?;
		if name == "copy" && (kind == "email" || kind == "DNS") {
			// OpenSSL's copy forms pull names out of the subject
			// distinguished name via the configuration database, which
			// does not exist here.
			return Err(Error::InvalidValueSyntax(format!(
				"{}:copy requires a configuration database",
				kind
			)));
		}
		names.push(match kind {
			"email" => GeneralName::Rfc822Name(name.to_string()),
			"DNS" => GeneralName::DnsName(name.to_string()),
			"URI" => GeneralName::Uri(name.to_string()),
			"IP" => GeneralName::IpAddress(name.parse().map_err(|_| {
				Error::InvalidValueSyntax(format!("invalid IP address {:?}", name))
			})?),
			"RID" => GeneralName::RegisteredId(parse_oid_text(name)?),
			_ => {
				return Err(Error::InvalidValueSyntax(format!(
					"unsupported subjectAltName type {:?}",
					kind
				)))
			},
		});
	}
	Ok(names)
}

/// Encode a GeneralNames SEQUENCE from parsed entries.
pub(crate) fn encode_general_names(names: &[GeneralName]) -> Result<Vec<u8>, Error> {
	let encoded = names
		.iter()
		.map(GeneralName::to_der)
		.collect::<Result<Vec<_>, Error>>()?;
	Ok(yasna::construct_der(|writer| {
		writer.write_sequence(|writer| {
			for der in &encoded {
				writer.next().write_der(der);
			}
		})
	}))
}

/// Decode a GeneralNames SEQUENCE into owned entries, in order.
pub(crate) fn decode_general_names(der: &[u8]) -> Result<Vec<GeneralName>, Error> {
	let (_, san) = ParsedSubjectAltName::from_der(der)
		.map_err(|e| Error::MalformedPayload(format!("invalid GeneralNames: {}", e)))?;
	san.general_names
		.iter()
		.map(GeneralName::from_parsed)
		.collect()
}

/// Render decoded general names for display.
///
/// The builtin printers of most X.509 toolkits treat names as
/// NUL-terminated strings, so a name like `safe.example.com\0evil.com`
/// displays as its safe-looking prefix. Every name is therefore written
/// here over its full, length-exact byte range, with `", "` between
/// entries and nothing after the last.
pub(crate) fn format_general_names(names: &[GeneralName]) -> String {
	let mut out = String::new();
	for (i, name) in names.iter().enumerate() {
		if i > 0 {
			out.push_str(", ");
		}
		match name {
			GeneralName::Rfc822Name(name) => {
				out.push_str("email:");
				out.push_str(name);
			},
			GeneralName::DnsName(name) => {
				out.push_str("DNS:");
				out.push_str(name);
			},
			GeneralName::Uri(name) => {
				out.push_str("URI:");
				out.push_str(name);
			},
			other => out.push_str(&format_single_name(other)),
		}
	}
	out
}

/// Render one general name the way OpenSSL's GENERAL_NAME_print does.
///
/// Used for the kinds without a simple length-exact text form; whether
/// those kinds are a realistic spoofing surface is an accepted residual
/// risk, though the strings built here are length-exact as well.
pub(crate) fn format_single_name(name: &GeneralName) -> String {
	match name {
		GeneralName::Rfc822Name(name) => format!("email:{}", name),
		GeneralName::DnsName(name) => format!("DNS:{}", name),
		GeneralName::Uri(name) => format!("URI:{}", name),
		GeneralName::IpAddress(addr) => format!("IP Address:{}", addr),
		GeneralName::RegisteredId(oid) => format!("Registered ID:{}", oid),
		GeneralName::DirectoryName(name) => format!("DirName:{}", name),
		GeneralName::OtherName => "othername:<unsupported>".to_string(),
		GeneralName::X400Address => "X400Name:<unsupported>".to_string(),
		GeneralName::EdiPartyName => "EDIPartyName:<unsupported>".to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_mixed_entries() {
		let names =
			parse_value("email:a@example.com, DNS:example.com,URI:https://example.com, IP:10.0.0.1")
				.unwrap();
		assert_eq!(
			names,
			vec![
				GeneralName::Rfc822Name("a@example.com".to_string()),
				GeneralName::DnsName("example.com".to_string()),
				GeneralName::Uri("https://example.com".to_string()),
				GeneralName::IpAddress(IpAddr::from([10, 0, 0, 1])),
			]
		);
	}

	#[test]
	fn parse_registered_id() {
		let names = parse_value("RID:1.2.3.4").unwrap();
		assert_eq!(
			names,
			vec![GeneralName::RegisteredId(ObjectIdentifier::from_slice(&[
				1, 2, 3, 4
			]))]
		);
	}

	#[test]
	fn parse_rejects_unknown_kind() {
		assert!(matches!(
			parse_value("dirName:section"),
			Err(Error::InvalidValueSyntax(_))
		));
	}

	#[test]
	fn parse_rejects_copy() {
		assert!(matches!(
			parse_value("email:copy"),
			Err(Error::InvalidValueSyntax(_))
		));
	}

	#[test]
	fn parse_rejects_bad_ip() {
		assert!(matches!(
			parse_value("IP:not-an-address"),
			Err(Error::InvalidValueSyntax(_))
		));
	}

	#[test]
	fn dns_name_der() {
		let der = GeneralName::DnsName("example.com".to_string())
			.to_der()
			.unwrap();
		let mut expected = vec![0x82, 0x0B];
		expected.extend_from_slice(b"example.com");
		assert_eq!(der, expected);
	}

	#[test]
	fn decode_round_trip() {
		let names = vec![
			GeneralName::Rfc822Name("a@example.com".to_string()),
			GeneralName::DnsName("example.com".to_string()),
			GeneralName::IpAddress(IpAddr::from([192, 0, 2, 1])),
		];
		let der = encode_general_names(&names).unwrap();
		assert_eq!(decode_general_names(&der).unwrap(), names);
	}

	#[test]
	fn decode_only_kinds_are_not_encodable() {
		assert!(matches!(
			GeneralName::OtherName.to_der(),
			Err(Error::InvalidValueSyntax(_))
		));
	}

	#[test]
	fn format_order_and_separators() {
		let names = vec![
			GeneralName::Rfc822Name("a@example.com".to_string()),
			GeneralName::DnsName("example.com".to_string()),
			GeneralName::Uri("https://example.com".to_string()),
		];
		assert_eq!(
			format_general_names(&names),
			"email:a@example.com, DNS:example.com, URI:https://example.com"
		);
	}

	#[test]
	fn format_keeps_embedded_nul() {
		let names = vec![GeneralName::DnsName(
			"safe.example.com\0evil.example.com".to_string(),
		)];
		let out = format_general_names(&names);
		assert_eq!(out, "DNS:safe.example.com\0evil.example.com");
		assert_ne!(out, "DNS:safe.example.com");
	}

	#[test]
	fn format_delegated_kinds() {
		assert_eq!(
			format_single_name(&GeneralName::IpAddress(IpAddr::from([192, 0, 2, 1]))),
			"IP Address:192.0.2.1"
		);
		assert_eq!(
			format_single_name(&GeneralName::OtherName),
			"othername:<unsupported>"
		);
	}

	#[test]
	fn nul_byte_survives_encoding() {
		let der = encode_general_names(&parse_value("DNS:safe.example.com\0evil.example.com").unwrap())
			.unwrap();
		let names = decode_general_names(&der).unwrap();
		assert_eq!(
			names,
			vec![GeneralName::DnsName(
				"safe.example.com\0evil.example.com".to_string()
			)]
		);
	}
}
