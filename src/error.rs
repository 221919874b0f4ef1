use std::fmt;

/// The error type of the x509-ext crate
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum Error {
	/// No extension type is registered under the given short name
	UnknownExtensionType(String),
	/// The value string was rejected by the extension's value syntax,
	/// or the syntax required a subject/issuer certificate that was
	/// not supplied
	InvalidValueSyntax(String),
	/// Memory for the intermediate value string could not be allocated
	ResourceExhausted,
	/// The extension's DER payload could not be decoded
	MalformedPayload(String),
	/// No value syntax able to print the extension is registered for
	/// its OID
	NoPrinterAvailable(String),
	/// The given certificate couldn't be parsed
	CouldNotParseCertificate,
	/// A PEM document could not be parsed
	#[cfg(feature = "pem")]
	PemError(String),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		use self::Error::*;
		match self {
			UnknownExtensionType(name) => {
				write!(f, "No extension type is registered under the name {:?}", name)?
			},
			InvalidValueSyntax(detail) => write!(f, "Invalid extension value: {}", detail)?,
			ResourceExhausted => write!(f, "Could not allocate the intermediate value string")?,
			MalformedPayload(detail) => {
				write!(f, "Could not decode extension payload: {}", detail)?
			},
			NoPrinterAvailable(oid) => {
				write!(f, "No printer is registered for extensions with OID {}", oid)?
			},
			CouldNotParseCertificate => write!(f, "Could not parse certificate")?,
			#[cfg(feature = "pem")]
			PemError(detail) => write!(f, "PEM error: {}", detail)?,
		};
		Ok(())
	}
}

impl std::error::Error for Error {}
