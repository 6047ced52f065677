//! FatturaPA (Italian e-invoice, schema version 1.2) document assembly.
//!
//! The invoice model is laid out as two ordered field mappings (header and
//! body), converted with the tree builder, and attached under a
//! `p:FatturaElettronica` root carrying the namespace declarations, the
//! `versione` attribute and the schema location.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use fattura::fatturapa::*;
//! use rust_decimal_macros::dec;
//!
//! let address = AddressBuilder::new("Viale Roma 543", "07100", "Sassari", "IT").build();
//! let invoice = InvoiceBuilder::new("123", NaiveDate::from_ymd_opt(2017, 1, 18).unwrap())
//!     .sender(SenderBuilder::new("Alpha SRL", TaxId::new("IT", "01234567890"), address.clone()).build())
//!     .recipient(RecipientBuilder::company("Beta SPA", address).vat_id(TaxId::new("IT", "09876543210")).build())
//!     .add_line(LineItemBuilder::new("Consulenza", dec!(1), dec!(100)).build())
//!     .build()
//!     .unwrap();
//!
//! let xml = to_fattura_xml(&invoice).unwrap();
//! assert!(xml.contains("<ImportoTotaleDocumento>122.00</ImportoTotaleDocumento>"));
//! ```

mod builder;
mod sections;
mod types;
mod validate;

pub use builder::*;
pub use sections::{body_fields, format_amount, format_decimal, header_fields};
pub use types::*;
pub use validate::{calculate_totals, validate_fattura};

use crate::core::{FatturaError, convert};
use crate::xml::{RootElement, WriteOptions, to_xml_string};

/// Root element name.
pub const ROOT_TAG: &str = "p:FatturaElettronica";

/// Namespace URIs keyed by the prefixes used in the document.
pub mod ns {
    pub const P: &str = "http://ivaservizi.agenziaentrate.gov.it/docs/xsd/fatture/v1.2";
    pub const DS: &str = "http://www.w3.org/2000/09/xmldsig#";
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
}

/// Value of `xsi:schemaLocation`.
pub const SCHEMA_LOCATION: &str = "http://ivaservizi.agenziaentrate.gov.it/docs/xsd/fatture/v1.2 \
     http://www.fatturapa.gov.it/export/fatturazione/sdi/fatturapa/v1.2\
     /Schema_del_file_xml_FatturaPA_versione_1.2.xsd";

/// Build the complete element tree for an invoice.
pub fn to_document(invoice: &Invoice) -> Result<RootElement, FatturaError> {
    let header = convert(&header_fields(invoice))?;
    let body = convert(&body_fields(invoice)?)?;

    let root = RootElement::new(ROOT_TAG)
        .namespace("p", ns::P)
        .namespace("ds", ns::DS)
        .namespace("xsi", ns::XSI)
        .attribute("versione", invoice.transmission_format.code())
        .attribute("xsi:schemaLocation", SCHEMA_LOCATION)
        .append(header)
        .append(body);

    tracing::debug!(
        number = %invoice.number,
        lines = invoice.lines.len(),
        format = invoice.transmission_format.code(),
        "assembled FatturaPA document"
    );
    Ok(root)
}

/// Generate FatturaPA XML with the default output settings.
pub fn to_fattura_xml(invoice: &Invoice) -> Result<String, FatturaError> {
    to_fattura_xml_with(invoice, &WriteOptions::default())
}

/// Generate FatturaPA XML with explicit output settings.
pub fn to_fattura_xml_with(invoice: &Invoice, options: &WriteOptions) -> Result<String, FatturaError> {
    let root = to_document(invoice)?;
    let xml = to_xml_string(&root, options)?;
    tracing::debug!(number = %invoice.number, bytes = xml.len(), "serialized FatturaPA document");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_location_pairs_namespace_and_xsd() {
        let parts: Vec<_> = SCHEMA_LOCATION.split(' ').collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], ns::P);
        assert!(parts[1].ends_with("/v1.2/Schema_del_file_xml_FatturaPA_versione_1.2.xsd"));
    }
}
