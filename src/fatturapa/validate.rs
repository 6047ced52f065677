use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::types::*;
use crate::core::{FatturaError, ValidationError};

/// Compute line totals, the VAT summary and the document total.
///
/// Summary groups are keyed by (rate, nature) and kept in order of first
/// appearance among the lines. Arithmetic overflow is a builder error.
pub fn calculate_totals(invoice: &mut Invoice) -> Result<(), FatturaError> {
    for (i, line) in invoice.lines.iter_mut().enumerate() {
        let amount = checked(line.quantity.checked_mul(line.unit_price), || {
            format!("lines[{i}]: quantity * unit price")
        })?;
        line.total = Some(round_half_up(amount, 2));
    }

    let mut groups: Vec<VatSummary> = Vec::new();
    for line in &invoice.lines {
        let amount = line.total.unwrap_or(Decimal::ZERO);
        match groups
            .iter_mut()
            .find(|g| g.rate == line.vat_rate && g.nature == line.nature)
        {
            Some(group) => {
                group.taxable = checked(group.taxable.checked_add(amount), || {
                    format!("taxable amount at rate {}", group.rate)
                })?;
            }
            None => groups.push(VatSummary {
                rate: line.vat_rate,
                nature: line.nature.clone(),
                taxable: amount,
                tax: Decimal::ZERO,
                legal_reference: None,
            }),
        }
    }

    let mut total = Decimal::ZERO;
    for group in &mut groups {
        let tax = checked(
            group
                .taxable
                .checked_mul(group.rate)
                .and_then(|t| t.checked_div(dec!(100))),
            || format!("tax at rate {}", group.rate),
        )?;
        group.tax = round_half_up(tax, 2);
        total = checked(
            total
                .checked_add(group.taxable)
                .and_then(|t| t.checked_add(group.tax)),
            || "document total".to_string(),
        )?;
    }

    invoice.vat_summary = groups;
    invoice.total = Some(total);
    Ok(())
}

fn checked(value: Option<Decimal>, what: impl FnOnce() -> String) -> Result<Decimal, FatturaError> {
    value.ok_or_else(|| FatturaError::Builder(format!("{} overflows", what())))
}

/// Round a Decimal to `dp` decimal places using half-up (commercial rounding).
fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Validate an invoice against the structural FatturaPA constraints.
/// Returns all validation errors found (not just the first).
pub fn validate_fattura(invoice: &Invoice) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if invoice.number.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            "number",
            "invoice number must not be empty",
            "FPA-NUM",
        ));
    } else if invoice.number.chars().count() > 20 {
        errors.push(ValidationError::with_rule(
            "number",
            "invoice number cannot exceed 20 characters",
            "FPA-NUM",
        ));
    }

    if invoice.progressive.is_empty()
        || invoice.progressive.len() > 10
        || !invoice.progressive.chars().all(|c| c.is_ascii_alphanumeric())
    {
        errors.push(ValidationError::with_rule(
            "progressive",
            "transmission progressive must be 1-10 alphanumeric characters",
            "FPA-PRG",
        ));
    }

    if !is_upper_alpha(&invoice.currency, 3) {
        errors.push(ValidationError::with_rule(
            "currency",
            "currency code must be 3 uppercase letters (ISO 4217)",
            "FPA-CUR",
        ));
    }

    let expected = invoice.transmission_format.recipient_code_len();
    if invoice.recipient_code.len() != expected
        || !invoice
            .recipient_code
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
    {
        errors.push(ValidationError::with_rule(
            "recipient_code",
            format!(
                "recipient code must be {expected} alphanumeric characters for {}",
                invoice.transmission_format.code()
            ),
            "FPA-DST",
        ));
    }

    validate_sender(&invoice.sender, &mut errors);
    validate_recipient(&invoice.recipient, &mut errors);

    if invoice.lines.is_empty() {
        errors.push(ValidationError::with_rule(
            "lines",
            "at least one line item is required",
            "FPA-LIN",
        ));
    }
    for (i, line) in invoice.lines.iter().enumerate() {
        validate_line(line, &format!("lines[{i}]"), &mut errors);
    }

    for (i, payment) in invoice.payments.iter().enumerate() {
        if payment.details.is_empty() {
            errors.push(ValidationError::with_rule(
                format!("payments[{i}].details"),
                "payment must have at least one detail",
                "FPA-PAG",
            ));
        }
        for (j, detail) in payment.details.iter().enumerate() {
            if detail.amount < Decimal::ZERO {
                errors.push(ValidationError::with_rule(
                    format!("payments[{i}].details[{j}].amount"),
                    "payment amount must not be negative",
                    "FPA-PAG",
                ));
            }
        }
    }

    errors
}

fn validate_sender(sender: &Sender, errors: &mut Vec<ValidationError>) {
    validate_tax_id(&sender.transmitter, "sender.transmitter", errors);
    validate_tax_id(&sender.vat_id, "sender.vat_id", errors);

    if sender.company_name.trim().is_empty() {
        errors.push(ValidationError::new(
            "sender.company_name",
            "company name must not be empty",
        ));
    }

    let regime_ok = sender
        .tax_regime
        .strip_prefix("RF")
        .is_some_and(|n| n.len() == 2 && n.chars().all(|c| c.is_ascii_digit()));
    if !regime_ok {
        errors.push(ValidationError::with_rule(
            "sender.tax_regime",
            format!("tax regime '{}' must be RF followed by 2 digits", sender.tax_regime),
            "FPA-RF",
        ));
    }

    validate_address(&sender.address, "sender.address", errors);
}

fn validate_recipient(recipient: &Recipient, errors: &mut Vec<ValidationError>) {
    if recipient.vat_id.is_none() && recipient.fiscal_code.is_none() {
        errors.push(ValidationError::with_rule(
            "recipient",
            "recipient must have either a VAT number or a fiscal code",
            "FPA-CC",
        ));
    }
    if let Some(vat_id) = &recipient.vat_id {
        validate_tax_id(vat_id, "recipient.vat_id", errors);
    }

    match &recipient.name {
        RecipientName::Company(name) if name.trim().is_empty() => {
            errors.push(ValidationError::new(
                "recipient.name",
                "company name must not be empty",
            ));
        }
        RecipientName::Person {
            first_name,
            last_name,
        } if first_name.trim().is_empty() || last_name.trim().is_empty() => {
            errors.push(ValidationError::new(
                "recipient.name",
                "first and last name must not be empty",
            ));
        }
        _ => {}
    }

    validate_address(&recipient.address, "recipient.address", errors);
}

fn validate_tax_id(id: &TaxId, field: &str, errors: &mut Vec<ValidationError>) {
    if !is_upper_alpha(&id.country_code, 2) {
        errors.push(ValidationError::with_rule(
            format!("{field}.country_code"),
            "country code must be 2 uppercase letters (ISO 3166-1)",
            "FPA-NAZ",
        ));
    }
    if id.code.trim().is_empty() || id.code.len() > 28 {
        errors.push(ValidationError::new(
            format!("{field}.code"),
            "identifier must be 1-28 characters",
        ));
    } else if id.country_code == "IT"
        && field.ends_with("vat_id")
        && !(id.code.len() == 11 && id.code.chars().all(|c| c.is_ascii_digit()))
    {
        errors.push(ValidationError::with_rule(
            format!("{field}.code"),
            "Italian VAT number (partita IVA) must be 11 digits",
            "FPA-PIVA",
        ));
    }
}

fn validate_address(address: &Address, field: &str, errors: &mut Vec<ValidationError>) {
    if address.street.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{field}.street"),
            "street must not be empty",
        ));
    }
    if address.city.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{field}.city"),
            "city must not be empty",
        ));
    }
    if !is_upper_alpha(&address.country_code, 2) {
        errors.push(ValidationError::with_rule(
            format!("{field}.country_code"),
            "country code must be 2 uppercase letters (ISO 3166-1)",
            "FPA-NAZ",
        ));
    }
    if address.country_code == "IT"
        && !(address.postcode.len() == 5 && address.postcode.chars().all(|c| c.is_ascii_digit()))
    {
        errors.push(ValidationError::with_rule(
            format!("{field}.postcode"),
            "Italian postcode (CAP) must be 5 digits",
            "FPA-CAP",
        ));
    }
    if let Some(province) = &address.province {
        if !is_upper_alpha(province, 2) {
            errors.push(ValidationError::with_rule(
                format!("{field}.province"),
                "province must be 2 uppercase letters",
                "FPA-PRV",
            ));
        }
    }
}

fn validate_line(line: &LineItem, field: &str, errors: &mut Vec<ValidationError>) {
    if line.description.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{field}.description"),
            "description must not be empty",
        ));
    }
    if line.vat_rate < Decimal::ZERO || line.vat_rate > dec!(100) {
        errors.push(ValidationError::new(
            format!("{field}.vat_rate"),
            "VAT rate must be between 0 and 100",
        ));
    }
    match (&line.nature, line.vat_rate.is_zero()) {
        (None, true) => errors.push(ValidationError::with_rule(
            format!("{field}.nature"),
            "zero VAT rate requires a nature code",
            "FPA-NAT",
        )),
        (Some(_), false) => errors.push(ValidationError::with_rule(
            format!("{field}.nature"),
            "nature code is only allowed with a zero VAT rate",
            "FPA-NAT",
        )),
        _ => {}
    }
}

fn is_upper_alpha(s: &str, len: usize) -> bool {
    s.len() == len && s.chars().all(|c| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fatturapa::{AddressBuilder, InvoiceBuilder, LineItemBuilder, RecipientBuilder, SenderBuilder};
    use chrono::NaiveDate;

    fn invoice_with(lines: Vec<LineItem>) -> Invoice {
        let mut builder = InvoiceBuilder::new("1", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
            .recipient_code("ABC1234")
            .sender(
                SenderBuilder::new(
                    "Alpha SRL",
                    TaxId::new("IT", "01234567890"),
                    AddressBuilder::new("Viale Roma 543", "07100", "Sassari", "IT").build(),
                )
                .build(),
            )
            .recipient(
                RecipientBuilder::company(
                    "Beta SPA",
                    AddressBuilder::new("Via Milano 1", "20100", "Milano", "IT").build(),
                )
                .vat_id(TaxId::new("IT", "09876543210"))
                .build(),
            );
        for line in lines {
            builder = builder.add_line(line);
        }
        builder.build_unchecked().unwrap()
    }

    #[test]
    fn totals_group_by_rate_in_first_appearance_order() {
        let inv = invoice_with(vec![
            LineItemBuilder::new("a", dec!(2), dec!(10.00)).vat_rate(dec!(10)).build(),
            LineItemBuilder::new("b", dec!(1), dec!(100.00)).vat_rate(dec!(22)).build(),
            LineItemBuilder::new("c", dec!(3), dec!(5.00)).vat_rate(dec!(10)).build(),
        ]);

        assert_eq!(inv.lines[0].total, Some(dec!(20.00)));
        assert_eq!(inv.vat_summary.len(), 2);
        assert_eq!(inv.vat_summary[0].rate, dec!(10));
        assert_eq!(inv.vat_summary[0].taxable, dec!(35.00));
        assert_eq!(inv.vat_summary[0].tax, dec!(3.50));
        assert_eq!(inv.vat_summary[1].rate, dec!(22));
        assert_eq!(inv.vat_summary[1].tax, dec!(22.00));
        assert_eq!(inv.total, Some(dec!(160.50)));
    }

    #[test]
    fn summing_overflow_is_reported_not_panicked() {
        let mut inv = invoice_with(vec![LineItemBuilder::new("a", dec!(1), dec!(1)).build()]);
        inv.lines = vec![
            LineItemBuilder::new("a", Decimal::MAX, dec!(1)).build(),
            LineItemBuilder::new("b", Decimal::MAX, dec!(1)).build(),
        ];
        match calculate_totals(&mut inv) {
            Err(FatturaError::Builder(msg)) => assert!(msg.contains("overflows"), "{msg}"),
            other => panic!("expected Builder error, got {other:?}"),
        }
    }

    #[test]
    fn tax_rounds_half_up() {
        // 0.25 * 22% = 0.055 -> 0.06
        let inv = invoice_with(vec![LineItemBuilder::new("a", dec!(1), dec!(0.25)).build()]);
        assert_eq!(inv.vat_summary[0].tax, dec!(0.06));
    }

    #[test]
    fn exempt_lines_form_their_own_group() {
        let inv = invoice_with(vec![
            LineItemBuilder::new("a", dec!(1), dec!(10)).build(),
            LineItemBuilder::new("b", dec!(1), dec!(10)).exempt("N2.2").build(),
        ]);
        assert_eq!(inv.vat_summary.len(), 2);
        assert_eq!(inv.vat_summary[1].nature.as_deref(), Some("N2.2"));
        assert_eq!(inv.vat_summary[1].tax, dec!(0));
        assert!(validate_fattura(&inv).is_empty());
    }

    #[test]
    fn valid_invoice_has_no_errors() {
        let inv = invoice_with(vec![LineItemBuilder::new("a", dec!(1), dec!(10)).build()]);
        assert!(validate_fattura(&inv).is_empty(), "{:?}", validate_fattura(&inv));
    }

    #[test]
    fn zero_rate_without_nature_is_rejected() {
        let inv = invoice_with(vec![
            LineItemBuilder::new("a", dec!(1), dec!(10)).vat_rate(dec!(0)).build(),
        ]);
        let errors = validate_fattura(&inv);
        assert!(errors.iter().any(|e| e.rule.as_deref() == Some("FPA-NAT")));
    }

    #[test]
    fn bad_postcode_and_province_are_reported_together() {
        let mut inv = invoice_with(vec![LineItemBuilder::new("a", dec!(1), dec!(10)).build()]);
        inv.sender.address.postcode = "7100".into();
        inv.sender.address.province = Some("sassari".into());
        let errors = validate_fattura(&inv);
        assert!(errors.iter().any(|e| e.field == "sender.address.postcode"));
        assert!(errors.iter().any(|e| e.field == "sender.address.province"));
    }

    #[test]
    fn recipient_code_length_follows_format() {
        let mut inv = invoice_with(vec![LineItemBuilder::new("a", dec!(1), dec!(10)).build()]);
        inv.transmission_format = TransmissionFormat::PublicAdministration;
        let errors = validate_fattura(&inv);
        assert!(errors.iter().any(|e| e.rule.as_deref() == Some("FPA-DST")));

        inv.recipient_code = "UFXYZ1".into();
        assert!(validate_fattura(&inv).is_empty());
    }

    #[test]
    fn italian_vat_number_must_be_eleven_digits() {
        let mut inv = invoice_with(vec![LineItemBuilder::new("a", dec!(1), dec!(10)).build()]);
        inv.sender.vat_id.code = "123".into();
        let errors = validate_fattura(&inv);
        assert!(errors.iter().any(|e| e.field == "sender.vat_id.code"));
    }
}
