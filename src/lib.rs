/*!
X.509 certificate extension creation and display

This crate builds DER encoded X.509 v3 extensions from textual values
in the well-known OpenSSL extension mini-language, and renders stored
extensions back into display text. Construction goes through a
[`Registry`] of per-OID value syntaxes; rendering dispatches on the
extension's OID, with subjectAltName handled by a NUL-safe printer that
writes every name over its full byte range instead of stopping at the
first NUL byte the way NUL-terminated string printers do.

## Example

```
use x509_ext::{encode_extension, Registry};

let registry = Registry::default();
let ext = encode_extension(
	"subjectAltName",
	false,
	"DNS:example.com, email:admin@example.com",
	None,
	None,
)
.unwrap();
assert_eq!(ext.short_name(&registry), "subjectAltName");
assert_eq!(
	ext.format(&registry).unwrap(),
	"DNS:example.com, email:admin@example.com",
);
```

Values that refer to a subject or issuer certificate, such as
`subjectKeyIdentifier = hash` or `authorityKeyIdentifier = keyid,issuer`,
take the certificates as context; see [`EncodeContext`].
*/
#![forbid(unsafe_code)]
#![forbid(non_ascii_idents)]
#![deny(missing_docs)]

use yasna::models::ObjectIdentifier;

mod certificate;
mod error;
mod ext;
mod oid;
mod san;
mod syntax;

pub use crate::certificate::Certificate;
pub use crate::error::Error;
pub use crate::ext::Extension;
pub use crate::san::GeneralName;
pub use crate::syntax::{EncodeContext, Registry, ValueSyntax};

/// One-call construction of an extension from its textual value.
///
/// Uses the builtin [`Registry`]. `subject` and `issuer` supply the
/// optional certificate context some value syntaxes need, e.g.
/// `subjectKeyIdentifier = hash` reads the subject and
/// `authorityKeyIdentifier = keyid,issuer` reads the issuer. Neither
/// certificate is retained once the call returns.
pub fn encode_extension(
	type_name: &str,
	critical: bool,
	value: &str,
	subject: Option<&Certificate>,
	issuer: Option<&Certificate>,
) -> Result<Extension<'static>, Error> {
	let mut ctx = EncodeContext::new();
	if let Some(subject) = subject {
		ctx = ctx.with_subject(subject);
	}
	if let Some(issuer) = issuer {
		ctx = ctx.with_issuer(issuer);
	}
	Registry::default().encode(type_name, critical, value, &ctx)
}

pub(crate) fn oid_from_parsed(
	oid: &x509_parser::oid_registry::Oid<'_>,
) -> Result<ObjectIdentifier, Error> {
	let components = oid
		.iter()
		.ok_or_else(|| Error::MalformedPayload(format!("OID {} has an oversized arc", oid)))?
		.collect::<Vec<u64>>();
	Ok(ObjectIdentifier::from_slice(&components))
}
