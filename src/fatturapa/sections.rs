//! Field layout of the FatturaPA header and body.
//!
//! Each function returns a [`FieldMap`] whose key order is the schema's
//! element order. Optional business data is left out of the map when absent.

use rust_decimal::{Decimal, RoundingStrategy};

use super::types::*;
use crate::core::{FatturaError, FieldMap, FieldValue};
use crate::field_map;

/// `FatturaElettronicaHeader`: transmission data, seller and buyer.
pub fn header_fields(invoice: &Invoice) -> FieldMap {
    let mut transmission = field_map! {
        "IdTrasmittente" => tax_id_fields(&invoice.sender.transmitter),
        "ProgressivoInvio" => invoice.progressive.as_str(),
        "FormatoTrasmissione" => invoice.transmission_format.code(),
        "CodiceDestinatario" => invoice.recipient_code.as_str(),
    };
    put_opt(&mut transmission, "PECDestinatario", invoice.recipient_pec.as_deref());

    field_map! {
        "FatturaElettronicaHeader" => field_map! {
            "DatiTrasmissione" => transmission,
            "CedentePrestatore" => sender_fields(&invoice.sender),
            "CessionarioCommittente" => recipient_fields(&invoice.recipient),
        },
    }
}

/// `FatturaElettronicaBody`: general data, goods and services, payments.
///
/// Fails only when a line without a computed total overflows
/// `quantity * unit_price`.
pub fn body_fields(invoice: &Invoice) -> Result<FieldMap, FatturaError> {
    let mut document = field_map! {
        "TipoDocumento" => invoice.document_type.code(),
        "Divisa" => invoice.currency.as_str(),
        "Data" => invoice.date,
        "Numero" => invoice.number.as_str(),
    };
    put_opt(&mut document, "ImportoTotaleDocumento", invoice.total.map(format_amount));
    put(&mut document, "Causale", invoice.causal.clone());

    let mut general = field_map! {
        "DatiGeneraliDocumento" => document,
        "DatiOrdineAcquisto" => references(&invoice.purchase_orders),
        "DatiContratto" => references(&invoice.contracts),
        "DatiConvenzione" => references(&invoice.agreements),
        "DatiRicezione" => references(&invoice.receipts),
    };
    let transport = invoice
        .transport
        .as_ref()
        .filter(|t| t.carrier.is_some() || t.delivered_at.is_some());
    put_opt(&mut general, "DatiTrasporto", transport.map(transport_fields));

    let lines = invoice
        .lines
        .iter()
        .map(line_fields)
        .collect::<Result<Vec<_>, _>>()?;
    let summary: Vec<FieldMap> = invoice
        .vat_summary
        .iter()
        .map(|s| summary_fields(s, invoice.vat_exigibility))
        .collect();
    let payments: Vec<FieldMap> = invoice.payments.iter().map(payment_fields).collect();

    Ok(field_map! {
        "FatturaElettronicaBody" => field_map! {
            "DatiGenerali" => general,
            "DatiBeniServizi" => field_map! {
                "DettaglioLinee" => lines,
                "DatiRiepilogo" => summary,
            },
            "DatiPagamento" => payments,
        },
    })
}

fn tax_id_fields(id: &TaxId) -> FieldMap {
    field_map! {
        "IdPaese" => id.country_code.as_str(),
        "IdCodice" => id.code.as_str(),
    }
}

fn sender_fields(sender: &Sender) -> FieldMap {
    let mut personal = field_map! { "IdFiscaleIVA" => tax_id_fields(&sender.vat_id) };
    put_opt(&mut personal, "CodiceFiscale", sender.fiscal_code.as_deref());
    put(
        &mut personal,
        "Anagrafica",
        field_map! { "Denominazione" => sender.company_name.as_str() },
    );
    put(&mut personal, "RegimeFiscale", sender.tax_regime.as_str());

    field_map! {
        "DatiAnagrafici" => personal,
        "Sede" => address_fields(&sender.address),
    }
}

fn recipient_fields(recipient: &Recipient) -> FieldMap {
    let mut personal = FieldMap::new();
    put_opt(&mut personal, "IdFiscaleIVA", recipient.vat_id.as_ref().map(tax_id_fields));
    put_opt(&mut personal, "CodiceFiscale", recipient.fiscal_code.as_deref());
    let name = match &recipient.name {
        RecipientName::Company(name) => field_map! { "Denominazione" => name.as_str() },
        RecipientName::Person {
            first_name,
            last_name,
        } => field_map! {
            "Nome" => first_name.as_str(),
            "Cognome" => last_name.as_str(),
        },
    };
    put(&mut personal, "Anagrafica", name);

    field_map! {
        "DatiAnagrafici" => personal,
        "Sede" => address_fields(&recipient.address),
    }
}

fn address_fields(address: &Address) -> FieldMap {
    let mut sede = field_map! { "Indirizzo" => address.street.as_str() };
    put_opt(&mut sede, "NumeroCivico", address.street_number.as_deref());
    put(&mut sede, "CAP", address.postcode.as_str());
    put(&mut sede, "Comune", address.city.as_str());
    put_opt(&mut sede, "Provincia", address.province.as_deref());
    put(&mut sede, "Nazione", address.country_code.as_str());
    sede
}

fn references(refs: &[DocumentReference]) -> Vec<FieldMap> {
    refs.iter()
        .map(|r| {
            let mut map = FieldMap::new();
            put_opt(&mut map, "RiferimentoNumeroLinea", r.line_number);
            put(&mut map, "IdDocumento", r.document_id.as_str());
            put_opt(&mut map, "Data", r.date);
            put_opt(&mut map, "NumItem", r.item_number.as_deref());
            put_opt(&mut map, "CodiceCommessaConvenzione", r.order_code.as_deref());
            put_opt(&mut map, "CodiceCUP", r.cup.as_deref());
            put_opt(&mut map, "CodiceCIG", r.cig.as_deref());
            map
        })
        .collect()
}

fn transport_fields(transport: &Transport) -> FieldMap {
    let mut map = FieldMap::new();
    if let Some(carrier) = &transport.carrier {
        put(
            &mut map,
            "DatiAnagraficiVettore",
            field_map! {
                "IdFiscaleIVA" => tax_id_fields(&carrier.vat_id),
                "Anagrafica" => field_map! { "Denominazione" => carrier.name.as_str() },
            },
        );
    }
    put_opt(&mut map, "DataOraConsegna", transport.delivered_at);
    map
}

fn line_fields(line: &LineItem) -> Result<FieldMap, FatturaError> {
    let mut map = field_map! {
        "NumeroLinea" => line.number,
        "Descrizione" => line.description.as_str(),
        "Quantita" => format_decimal(line.quantity),
    };
    put_opt(&mut map, "UnitaMisura", line.unit.as_deref());
    put(&mut map, "PrezzoUnitario", format_decimal(line.unit_price));
    let total = match line.total {
        Some(total) => total,
        None => line.quantity.checked_mul(line.unit_price).ok_or_else(|| {
            FatturaError::Builder(format!("line {}: quantity * unit price overflows", line.number))
        })?,
    };
    put(&mut map, "PrezzoTotale", format_amount(total));
    put(&mut map, "AliquotaIVA", format_amount(line.vat_rate));
    put_opt(&mut map, "Natura", line.nature.as_deref());
    Ok(map)
}

fn summary_fields(summary: &VatSummary, exigibility: Option<VatExigibility>) -> FieldMap {
    let mut map = field_map! { "AliquotaIVA" => format_amount(summary.rate) };
    put_opt(&mut map, "Natura", summary.nature.as_deref());
    put(&mut map, "ImponibileImporto", format_amount(summary.taxable));
    put(&mut map, "Imposta", format_amount(summary.tax));
    put_opt(&mut map, "EsigibilitaIVA", exigibility.map(|e| e.code()));
    put_opt(&mut map, "RiferimentoNormativo", summary.legal_reference.as_deref());
    map
}

fn payment_fields(payment: &Payment) -> FieldMap {
    let details: Vec<FieldMap> = payment
        .details
        .iter()
        .map(|d| {
            let mut map = field_map! { "ModalitaPagamento" => d.method.code() };
            put_opt(&mut map, "DataScadenzaPagamento", d.due_date);
            put(&mut map, "ImportoPagamento", format_amount(d.amount));
            put_opt(&mut map, "IBAN", d.iban.as_deref());
            map
        })
        .collect();

    field_map! {
        "CondizioniPagamento" => payment.condition.code(),
        "DettaglioPagamento" => details,
    }
}

fn put(map: &mut FieldMap, key: &str, value: impl Into<FieldValue>) {
    map.insert(key.to_string(), value.into());
}

fn put_opt<T: Into<FieldValue>>(map: &mut FieldMap, key: &str, value: Option<T>) {
    if let Some(value) = value {
        put(map, key, value);
    }
}

/// Format a monetary amount or rate with exactly 2 decimal places.
pub fn format_amount(d: Decimal) -> String {
    let mut rounded = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Format a quantity or unit price with at least 2 decimal places,
/// keeping any further significant digits.
pub fn format_decimal(d: Decimal) -> String {
    let s = d.normalize().to_string();
    if let Some(dot_pos) = s.find('.') {
        let decimals = s.len() - dot_pos - 1;
        if decimals < 2 {
            format!("{s}{}", "0".repeat(2 - decimals))
        } else {
            s
        }
    } else {
        format!("{s}.00")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn format_amount_cases() {
        assert_eq!(format_amount(dec!(5)), "5.00");
        assert_eq!(format_amount(dec!(1.1)), "1.10");
        assert_eq!(format_amount(dec!(22)), "22.00");
        assert_eq!(format_amount(dec!(0.055)), "0.06");
        assert_eq!(format_amount(dec!(-3.456)), "-3.46");
    }

    #[test]
    fn format_decimal_cases() {
        assert_eq!(format_decimal(dec!(5)), "5.00");
        assert_eq!(format_decimal(dec!(1.0)), "1.00");
        assert_eq!(format_decimal(dec!(49.90)), "49.90");
        assert_eq!(format_decimal(dec!(0.12345678)), "0.12345678");
    }

    #[test]
    fn address_omits_missing_province() {
        let address = Address {
            street: "Via Roma 1".into(),
            street_number: None,
            postcode: "00100".into(),
            city: "Roma".into(),
            province: None,
            country_code: "IT".into(),
        };
        let map = address_fields(&address);
        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            ["Indirizzo", "CAP", "Comune", "Nazione"]
        );
    }

    #[test]
    fn reference_keeps_schema_order() {
        let r = DocumentReference {
            line_number: Some(1),
            cig: Some("456def".into()),
            cup: Some("123abc".into()),
            ..DocumentReference::new("66685")
        };
        let maps = references(&[r]);
        assert_eq!(
            maps[0].keys().collect::<Vec<_>>(),
            ["RiferimentoNumeroLinea", "IdDocumento", "CodiceCUP", "CodiceCIG"]
        );
    }
}
