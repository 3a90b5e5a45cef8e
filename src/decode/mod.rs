//! Response decoding
//!
//! The remote answers every query with an XML document. This module turns a
//! browse response into ordered raw rows and offers the small XML helpers the
//! query store and SOAP transport share.
//!
//! # Browse response shape
//!
//! ```text
//! <browse result="1" ...>
//!   <th><td label="Periode">..</td><td label="Bank">..</td></th>   header
//!   <tr><td>2021/01</td><td>ING</td><key>..</key></tr>             rows
//! </browse>
//! ```
//!
//! Row cells are matched to header labels by position; cells past the last
//! label are dropped.

mod browse;
mod types;
mod xml;

pub use browse::{decode_browse, BrowseDecoder};
pub use types::BrowseTable;
pub use xml::{check_well_formed, pretty_print};

#[cfg(test)]
mod tests;
