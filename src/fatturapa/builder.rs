use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;

use super::types::*;
use super::validate;
use crate::core::FatturaError;

/// Builder for constructing valid invoices.
///
/// ```
/// use chrono::NaiveDate;
/// use fattura::fatturapa::*;
/// use rust_decimal_macros::dec;
///
/// let sender = SenderBuilder::new(
///     "Alpha SRL",
///     TaxId::new("IT", "01234567890"),
///     AddressBuilder::new("Viale Roma 543", "07100", "Sassari", "IT").province("SS").build(),
/// )
/// .build();
/// let recipient = RecipientBuilder::person(
///     "Mario",
///     "Rossi",
///     AddressBuilder::new("Via Verdi 1", "00100", "Roma", "IT").province("RM").build(),
/// )
/// .fiscal_code("RSSMRA80A01H501U")
/// .build();
///
/// let invoice = InvoiceBuilder::new("123", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
///     .recipient_code("ABC1234")
///     .sender(sender)
///     .recipient(recipient)
///     .add_line(LineItemBuilder::new("Consulenza", dec!(5), dec!(1.00)).vat_rate(dec!(22)).build())
///     .build()
///     .unwrap();
///
/// assert_eq!(invoice.total, Some(dec!(6.10)));
/// ```
pub struct InvoiceBuilder {
    number: String,
    date: NaiveDate,
    document_type: DocumentType,
    currency: String,
    transmission_format: TransmissionFormat,
    progressive: Option<String>,
    recipient_code: String,
    recipient_pec: Option<String>,
    causal: Vec<String>,
    sender: Option<Sender>,
    recipient: Option<Recipient>,
    lines: Vec<LineItem>,
    vat_exigibility: Option<VatExigibility>,
    legal_references: Vec<(String, String)>,
    purchase_orders: Vec<DocumentReference>,
    contracts: Vec<DocumentReference>,
    agreements: Vec<DocumentReference>,
    receipts: Vec<DocumentReference>,
    transport: Option<Transport>,
    payments: Vec<Payment>,
    full_payment: Option<FullPayment>,
}

/// Single full payment whose amount is only known once totals are computed.
struct FullPayment {
    method: PaymentMethod,
    due_date: Option<NaiveDate>,
    iban: Option<String>,
}

impl InvoiceBuilder {
    pub fn new(number: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            number: number.into(),
            date,
            document_type: DocumentType::Invoice,
            currency: "EUR".to_string(),
            transmission_format: TransmissionFormat::Private,
            progressive: None,
            recipient_code: "0000000".to_string(),
            recipient_pec: None,
            causal: Vec::new(),
            sender: None,
            recipient: None,
            lines: Vec::new(),
            vat_exigibility: Some(VatExigibility::Immediate),
            legal_references: Vec::new(),
            purchase_orders: Vec::new(),
            contracts: Vec::new(),
            agreements: Vec::new(),
            receipts: Vec::new(),
            transport: None,
            payments: Vec::new(),
            full_payment: None,
        }
    }

    pub fn document_type(mut self, document_type: DocumentType) -> Self {
        self.document_type = document_type;
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn transmission_format(mut self, format: TransmissionFormat) -> Self {
        self.transmission_format = format;
        self
    }

    /// ProgressivoInvio; defaults to the alphanumeric tail of the invoice number.
    pub fn progressive(mut self, progressive: impl Into<String>) -> Self {
        self.progressive = Some(progressive.into());
        self
    }

    pub fn recipient_code(mut self, code: impl Into<String>) -> Self {
        self.recipient_code = code.into();
        self
    }

    pub fn recipient_pec(mut self, pec: impl Into<String>) -> Self {
        self.recipient_pec = Some(pec.into());
        self
    }

    pub fn causal(mut self, text: impl Into<String>) -> Self {
        self.causal.push(text.into());
        self
    }

    pub fn sender(mut self, sender: Sender) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn recipient(mut self, recipient: Recipient) -> Self {
        self.recipient = Some(recipient);
        self
    }

    pub fn add_line(mut self, line: LineItem) -> Self {
        self.lines.push(line);
        self
    }

    /// EsigibilitaIVA; `None` omits the element.
    pub fn vat_exigibility(mut self, exigibility: Option<VatExigibility>) -> Self {
        self.vat_exigibility = exigibility;
        self
    }

    /// RiferimentoNormativo for every summary group with the given nature code.
    pub fn legal_reference(mut self, nature: impl Into<String>, reference: impl Into<String>) -> Self {
        self.legal_references.push((nature.into(), reference.into()));
        self
    }

    pub fn purchase_order(mut self, reference: DocumentReference) -> Self {
        self.purchase_orders.push(reference);
        self
    }

    pub fn contract(mut self, reference: DocumentReference) -> Self {
        self.contracts.push(reference);
        self
    }

    pub fn agreement(mut self, reference: DocumentReference) -> Self {
        self.agreements.push(reference);
        self
    }

    pub fn receipt(mut self, reference: DocumentReference) -> Self {
        self.receipts.push(reference);
        self
    }

    pub fn carrier(mut self, vat_id: TaxId, name: impl Into<String>) -> Self {
        let transport = self.transport.get_or_insert(Transport {
            carrier: None,
            delivered_at: None,
        });
        transport.carrier = Some(Carrier {
            vat_id,
            name: name.into(),
        });
        self
    }

    pub fn delivered_at(mut self, at: DateTime<FixedOffset>) -> Self {
        let transport = self.transport.get_or_insert(Transport {
            carrier: None,
            delivered_at: None,
        });
        transport.delivered_at = Some(at);
        self
    }

    pub fn payment(mut self, payment: Payment) -> Self {
        self.payments.push(payment);
        self
    }

    /// Add a TP02 payment for the full document total, computed at build time.
    pub fn pay_in_full(
        mut self,
        method: PaymentMethod,
        due_date: Option<NaiveDate>,
        iban: Option<String>,
    ) -> Self {
        self.full_payment = Some(FullPayment {
            method,
            due_date,
            iban,
        });
        self
    }

    /// Build the invoice, calculating totals and running validation.
    /// Returns all validation errors (not just the first).
    pub fn build(self) -> Result<Invoice, FatturaError> {
        let invoice = self.assemble()?;

        let errors = validate::validate_fattura(&invoice);
        if !errors.is_empty() {
            let msg = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(FatturaError::Validation(msg));
        }

        Ok(invoice)
    }

    /// Build without running validation.
    pub fn build_unchecked(self) -> Result<Invoice, FatturaError> {
        self.assemble()
    }

    fn assemble(self) -> Result<Invoice, FatturaError> {
        let sender = self
            .sender
            .ok_or_else(|| FatturaError::Builder("sender is required".into()))?;
        let recipient = self
            .recipient
            .ok_or_else(|| FatturaError::Builder("recipient is required".into()))?;

        if self.lines.is_empty() {
            return Err(FatturaError::Builder(
                "at least one line item is required".into(),
            ));
        }
        if self.lines.len() > 10_000 {
            return Err(FatturaError::Builder(
                "invoice cannot have more than 10,000 line items".into(),
            ));
        }

        let lines = self
            .lines
            .into_iter()
            .zip(1u32..)
            .map(|(line, number)| LineItem { number, ..line })
            .collect();

        let mut invoice = Invoice {
            progressive: self
                .progressive
                .unwrap_or_else(|| default_progressive(&self.number)),
            number: self.number,
            date: self.date,
            document_type: self.document_type,
            currency: self.currency,
            transmission_format: self.transmission_format,
            recipient_code: self.recipient_code,
            recipient_pec: self.recipient_pec,
            causal: self.causal,
            sender,
            recipient,
            lines,
            vat_summary: Vec::new(),
            vat_exigibility: self.vat_exigibility,
            total: None,
            purchase_orders: self.purchase_orders,
            contracts: self.contracts,
            agreements: self.agreements,
            receipts: self.receipts,
            transport: self.transport,
            payments: self.payments,
        };

        validate::calculate_totals(&mut invoice)?;

        for summary in &mut invoice.vat_summary {
            if let Some(nature) = &summary.nature {
                summary.legal_reference = self
                    .legal_references
                    .iter()
                    .find(|(n, _)| n == nature)
                    .map(|(_, r)| r.clone());
            }
        }

        if let Some(full) = self.full_payment {
            invoice.payments.push(Payment {
                condition: PaymentCondition::Full,
                details: vec![PaymentDetail {
                    method: full.method,
                    due_date: full.due_date,
                    amount: invoice.total.unwrap_or(Decimal::ZERO),
                    iban: full.iban,
                }],
            });
        }

        Ok(invoice)
    }
}

/// `ProgressivoInvio` derived from the invoice number: its ASCII alphanumeric
/// characters, keeping the last 10.
fn default_progressive(number: &str) -> String {
    let kept: Vec<char> = number.chars().filter(char::is_ascii_alphanumeric).collect();
    kept[kept.len().saturating_sub(10)..].iter().collect()
}

/// Builder for the seller.
pub struct SenderBuilder {
    transmitter: Option<TaxId>,
    vat_id: TaxId,
    fiscal_code: Option<String>,
    company_name: String,
    tax_regime: String,
    address: Address,
}

impl SenderBuilder {
    pub fn new(company_name: impl Into<String>, vat_id: TaxId, address: Address) -> Self {
        Self {
            transmitter: None,
            vat_id,
            fiscal_code: None,
            company_name: company_name.into(),
            tax_regime: "RF01".to_string(),
            address,
        }
    }

    /// IdTrasmittente; defaults to the VAT registration.
    pub fn transmitter(mut self, transmitter: TaxId) -> Self {
        self.transmitter = Some(transmitter);
        self
    }

    pub fn fiscal_code(mut self, code: impl Into<String>) -> Self {
        self.fiscal_code = Some(code.into());
        self
    }

    pub fn tax_regime(mut self, regime: impl Into<String>) -> Self {
        self.tax_regime = regime.into();
        self
    }

    pub fn build(self) -> Sender {
        Sender {
            transmitter: self.transmitter.unwrap_or_else(|| self.vat_id.clone()),
            vat_id: self.vat_id,
            fiscal_code: self.fiscal_code,
            company_name: self.company_name,
            tax_regime: self.tax_regime,
            address: self.address,
        }
    }
}

/// Builder for the buyer.
pub struct RecipientBuilder {
    vat_id: Option<TaxId>,
    fiscal_code: Option<String>,
    name: RecipientName,
    address: Address,
}

impl RecipientBuilder {
    pub fn company(name: impl Into<String>, address: Address) -> Self {
        Self {
            vat_id: None,
            fiscal_code: None,
            name: RecipientName::Company(name.into()),
            address,
        }
    }

    pub fn person(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: Address,
    ) -> Self {
        Self {
            vat_id: None,
            fiscal_code: None,
            name: RecipientName::Person {
                first_name: first_name.into(),
                last_name: last_name.into(),
            },
            address,
        }
    }

    pub fn vat_id(mut self, vat_id: TaxId) -> Self {
        self.vat_id = Some(vat_id);
        self
    }

    pub fn fiscal_code(mut self, code: impl Into<String>) -> Self {
        self.fiscal_code = Some(code.into());
        self
    }

    pub fn build(self) -> Recipient {
        Recipient {
            vat_id: self.vat_id,
            fiscal_code: self.fiscal_code,
            name: self.name,
            address: self.address,
        }
    }
}

/// Builder for Address.
pub struct AddressBuilder {
    street: String,
    street_number: Option<String>,
    postcode: String,
    city: String,
    province: Option<String>,
    country_code: String,
}

impl AddressBuilder {
    pub fn new(
        street: impl Into<String>,
        postcode: impl Into<String>,
        city: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            street_number: None,
            postcode: postcode.into(),
            city: city.into(),
            province: None,
            country_code: country_code.into(),
        }
    }

    pub fn street_number(mut self, number: impl Into<String>) -> Self {
        self.street_number = Some(number.into());
        self
    }

    pub fn province(mut self, province: impl Into<String>) -> Self {
        self.province = Some(province.into());
        self
    }

    pub fn build(self) -> Address {
        Address {
            street: self.street,
            street_number: self.street_number,
            postcode: self.postcode,
            city: self.city,
            province: self.province,
            country_code: self.country_code,
        }
    }
}

/// Builder for LineItem.
pub struct LineItemBuilder {
    description: String,
    quantity: Decimal,
    unit: Option<String>,
    unit_price: Decimal,
    vat_rate: Decimal,
    nature: Option<String>,
}

impl LineItemBuilder {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit: None,
            unit_price,
            vat_rate: Decimal::new(22, 0),
            nature: None,
        }
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn vat_rate(mut self, rate: Decimal) -> Self {
        self.vat_rate = rate;
        self
    }

    /// Zero-rate line with an exemption nature code.
    pub fn exempt(mut self, nature: impl Into<String>) -> Self {
        self.vat_rate = Decimal::ZERO;
        self.nature = Some(nature.into());
        self
    }

    pub fn build(self) -> LineItem {
        LineItem {
            number: 0,
            description: self.description,
            quantity: self.quantity,
            unit: self.unit,
            unit_price: self.unit_price,
            total: None,
            vat_rate: self.vat_rate,
            nature: self.nature,
        }
    }
}
