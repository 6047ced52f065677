use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A FatturaPA invoice (one `FatturaElettronicaBody` per document).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Numero: invoice number, max 20 characters.
    pub number: String,
    /// Data: issue date.
    pub date: NaiveDate,
    /// TipoDocumento.
    pub document_type: DocumentType,
    /// Divisa: ISO 4217 currency code.
    pub currency: String,
    /// FormatoTrasmissione; also the `versione` attribute of the root.
    pub transmission_format: TransmissionFormat,
    /// ProgressivoInvio: transmission sequence, alphanumeric, max 10 characters.
    pub progressive: String,
    /// CodiceDestinatario: SdI routing code of the recipient.
    pub recipient_code: String,
    /// PECDestinatario: certified mail address, used when the routing code is `0000000`.
    pub recipient_pec: Option<String>,
    /// Causale: free-text reasons, one element each.
    pub causal: Vec<String>,
    /// CedentePrestatore.
    pub sender: Sender,
    /// CessionarioCommittente.
    pub recipient: Recipient,
    /// DettaglioLinee.
    pub lines: Vec<LineItem>,
    /// DatiRiepilogo, computed from the lines.
    pub vat_summary: Vec<VatSummary>,
    /// EsigibilitaIVA applied to every summary entry.
    pub vat_exigibility: Option<VatExigibility>,
    /// ImportoTotaleDocumento, computed (taxable + tax).
    pub total: Option<Decimal>,
    /// DatiOrdineAcquisto.
    pub purchase_orders: Vec<DocumentReference>,
    /// DatiContratto.
    pub contracts: Vec<DocumentReference>,
    /// DatiConvenzione.
    pub agreements: Vec<DocumentReference>,
    /// DatiRicezione.
    pub receipts: Vec<DocumentReference>,
    /// DatiTrasporto.
    pub transport: Option<Transport>,
    /// DatiPagamento.
    pub payments: Vec<Payment>,
}

/// Country-qualified tax identifier (IdFiscaleIVA / IdTrasmittente).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxId {
    /// IdPaese: ISO 3166-1 alpha-2.
    pub country_code: String,
    /// IdCodice.
    pub code: String,
}

impl TaxId {
    pub fn new(country_code: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            code: code.into(),
        }
    }
}

/// CedentePrestatore: the seller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sender {
    /// IdTrasmittente: the subject transmitting the file to SdI.
    pub transmitter: TaxId,
    /// IdFiscaleIVA: VAT registration.
    pub vat_id: TaxId,
    /// CodiceFiscale.
    pub fiscal_code: Option<String>,
    /// Denominazione.
    pub company_name: String,
    /// RegimeFiscale, `RF01`..`RF19`.
    pub tax_regime: String,
    /// Sede.
    pub address: Address,
}

/// CessionarioCommittente: the buyer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    /// IdFiscaleIVA, for VAT-registered buyers.
    pub vat_id: Option<TaxId>,
    /// CodiceFiscale, for private individuals and public bodies.
    pub fiscal_code: Option<String>,
    pub name: RecipientName,
    /// Sede.
    pub address: Address,
}

/// Anagrafica: a company name or a person's first and last name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecipientName {
    Company(String),
    Person { first_name: String, last_name: String },
}

/// Sede: postal address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// Indirizzo.
    pub street: String,
    /// NumeroCivico.
    pub street_number: Option<String>,
    /// CAP: 5 digits for Italian addresses.
    pub postcode: String,
    /// Comune.
    pub city: String,
    /// Provincia: 2-letter code.
    pub province: Option<String>,
    /// Nazione: ISO 3166-1 alpha-2.
    pub country_code: String,
}

/// DettaglioLinee: a single invoice line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// NumeroLinea, assigned 1..n by the builder.
    pub number: u32,
    /// Descrizione.
    pub description: String,
    /// Quantita.
    pub quantity: Decimal,
    /// UnitaMisura.
    pub unit: Option<String>,
    /// PrezzoUnitario.
    pub unit_price: Decimal,
    /// PrezzoTotale, computed as quantity × unit price.
    pub total: Option<Decimal>,
    /// AliquotaIVA in percent.
    pub vat_rate: Decimal,
    /// Natura: exemption code, required when the rate is zero (e.g. `N2.2`).
    pub nature: Option<String>,
}

/// DatiRiepilogo: totals for one (rate, nature) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatSummary {
    /// AliquotaIVA.
    pub rate: Decimal,
    /// Natura.
    pub nature: Option<String>,
    /// ImponibileImporto.
    pub taxable: Decimal,
    /// Imposta.
    pub tax: Decimal,
    /// RiferimentoNormativo: legal reference for exempt groups.
    pub legal_reference: Option<String>,
}

/// Reference to a related document (order, contract, agreement, receipt).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentReference {
    /// RiferimentoNumeroLinea: line the reference applies to.
    pub line_number: Option<u32>,
    /// IdDocumento.
    pub document_id: String,
    /// Data.
    pub date: Option<NaiveDate>,
    /// NumItem.
    pub item_number: Option<String>,
    /// CodiceCommessaConvenzione.
    pub order_code: Option<String>,
    /// CodiceCUP: public project code.
    pub cup: Option<String>,
    /// CodiceCIG: tender code.
    pub cig: Option<String>,
}

impl DocumentReference {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            ..Default::default()
        }
    }
}

/// DatiTrasporto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transport {
    /// DatiAnagraficiVettore: carrier VAT registration and name.
    pub carrier: Option<Carrier>,
    /// DataOraConsegna.
    pub delivered_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Carrier {
    pub vat_id: TaxId,
    pub name: String,
}

/// DatiPagamento: one payment plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// CondizioniPagamento.
    pub condition: PaymentCondition,
    /// DettaglioPagamento.
    pub details: Vec<PaymentDetail>,
}

/// DettaglioPagamento.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetail {
    /// ModalitaPagamento.
    pub method: PaymentMethod,
    /// DataScadenzaPagamento.
    pub due_date: Option<NaiveDate>,
    /// ImportoPagamento.
    pub amount: Decimal,
    /// IBAN.
    pub iban: Option<String>,
}

/// FormatoTrasmissione.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransmissionFormat {
    /// FPA12: invoice to a public administration.
    PublicAdministration,
    /// FPR12: invoice to a private party.
    Private,
}

impl TransmissionFormat {
    pub fn code(&self) -> &'static str {
        match self {
            Self::PublicAdministration => "FPA12",
            Self::Private => "FPR12",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "FPA12" => Some(Self::PublicAdministration),
            "FPR12" => Some(Self::Private),
            _ => None,
        }
    }

    /// Required length of CodiceDestinatario.
    pub fn recipient_code_len(&self) -> usize {
        match self {
            Self::PublicAdministration => 6,
            Self::Private => 7,
        }
    }
}

/// TipoDocumento (subset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    /// TD01: invoice.
    Invoice,
    /// TD02: advance or down payment on invoice.
    AdvanceOnInvoice,
    /// TD03: advance or down payment on fee.
    AdvanceOnFee,
    /// TD04: credit note.
    CreditNote,
    /// TD05: debit note.
    DebitNote,
    /// TD06: fee note (parcella).
    Fee,
}

impl DocumentType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invoice => "TD01",
            Self::AdvanceOnInvoice => "TD02",
            Self::AdvanceOnFee => "TD03",
            Self::CreditNote => "TD04",
            Self::DebitNote => "TD05",
            Self::Fee => "TD06",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "TD01" => Some(Self::Invoice),
            "TD02" => Some(Self::AdvanceOnInvoice),
            "TD03" => Some(Self::AdvanceOnFee),
            "TD04" => Some(Self::CreditNote),
            "TD05" => Some(Self::DebitNote),
            "TD06" => Some(Self::Fee),
            _ => None,
        }
    }
}

/// CondizioniPagamento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentCondition {
    /// TP01: payment in installments.
    Installments,
    /// TP02: full payment.
    Full,
    /// TP03: advance payment.
    Advance,
}

impl PaymentCondition {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Installments => "TP01",
            Self::Full => "TP02",
            Self::Advance => "TP03",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "TP01" => Some(Self::Installments),
            "TP02" => Some(Self::Full),
            "TP03" => Some(Self::Advance),
            _ => None,
        }
    }
}

/// ModalitaPagamento (`MP01`..`MP23`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// MP01: cash.
    Cash,
    /// MP02: cheque.
    Cheque,
    /// MP05: bank transfer.
    BankTransfer,
    /// MP08: payment card.
    PaymentCard,
    /// MP12: RIBA.
    Riba,
    /// MP19: SEPA direct debit.
    SepaDirectDebit,
    /// MP23: PagoPA.
    PagoPa,
    /// Any other `MPnn` code.
    Other(u8),
}

impl PaymentMethod {
    pub fn number(&self) -> u8 {
        match self {
            Self::Cash => 1,
            Self::Cheque => 2,
            Self::BankTransfer => 5,
            Self::PaymentCard => 8,
            Self::Riba => 12,
            Self::SepaDirectDebit => 19,
            Self::PagoPa => 23,
            Self::Other(n) => *n,
        }
    }

    pub fn code(&self) -> String {
        format!("MP{:02}", self.number())
    }

    /// Parse an `MPnn` code.
    pub fn from_code(code: &str) -> Option<Self> {
        let digits = code.strip_prefix("MP")?;
        if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let n: u8 = digits.parse().ok()?;
        Some(match n {
            1 => Self::Cash,
            2 => Self::Cheque,
            5 => Self::BankTransfer,
            8 => Self::PaymentCard,
            12 => Self::Riba,
            19 => Self::SepaDirectDebit,
            23 => Self::PagoPa,
            n => Self::Other(n),
        })
    }
}

/// EsigibilitaIVA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VatExigibility {
    /// I: immediate.
    Immediate,
    /// D: deferred.
    Deferred,
    /// S: split payment.
    SplitPayment,
}

impl VatExigibility {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Immediate => "I",
            Self::Deferred => "D",
            Self::SplitPayment => "S",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "I" => Some(Self::Immediate),
            "D" => Some(Self::Deferred),
            "S" => Some(Self::SplitPayment),
            _ => None,
        }
    }
}
