//! SOAP transport
//!
//! Speaks the remote's SOAP 1.1 session and XML-processing services over
//! `reqwest`, building and reading envelopes with `quick-xml`.
//!
//! Requests are sent exactly once; failures surface to the caller unchanged.

mod envelope;
mod soap;

pub use envelope::{find_element_text, find_fault, SoapAction};
pub use soap::{SoapConfig, SoapConfigBuilder, SoapTransport, DEFAULT_LOGIN_URL};
