use chrono::NaiveDate;
use fattura::fatturapa::*;
use rust_decimal_macros::dec;

fn main() {
    let date = NaiveDate::from_ymd_opt(2017, 1, 18).unwrap();

    // Private-party invoice (FPR12) with one standard-rate and one exempt line
    let invoice = InvoiceBuilder::new("123", date)
        .recipient_code("ABC1234")
        .causal("LA FATTURA FA RIFERIMENTO AD UNA OPERAZIONE AAAA")
        .sender(
            SenderBuilder::new(
                "Alpha SRL",
                TaxId::new("IT", "01234567890"),
                AddressBuilder::new("Viale Roma 543", "07100", "Sassari", "IT")
                    .province("SS")
                    .build(),
            )
            .build(),
        )
        .recipient(
            RecipientBuilder::company(
                "Beta SPA",
                AddressBuilder::new("Corso Buenos Aires", "20124", "Milano", "IT")
                    .street_number("5")
                    .province("MI")
                    .build(),
            )
            .vat_id(TaxId::new("IT", "09876543210"))
            .build(),
        )
        .add_line(
            LineItemBuilder::new("DESCRIZIONE DELLA FORNITURA", dec!(5), dec!(1.00)).build(),
        )
        .add_line(
            LineItemBuilder::new("Bollo", dec!(1), dec!(2.00))
                .exempt("N1")
                .build(),
        )
        .legal_reference("N1", "Escluse ex art. 15 DPR 633/72")
        .purchase_order(DocumentReference::new("66685"))
        .pay_in_full(
            PaymentMethod::BankTransfer,
            NaiveDate::from_ymd_opt(2017, 2, 18),
            Some("IT60X0542811101000000123456".into()),
        )
        .build()
        .expect("invoice should be valid");

    println!("Invoice: {} ({})", invoice.number, invoice.document_type.code());
    for summary in &invoice.vat_summary {
        println!(
            "  rate {} nature {:?}: taxable {} tax {}",
            summary.rate, summary.nature, summary.taxable, summary.tax
        );
    }
    if let Some(total) = invoice.total {
        println!("Total:   {} {}", total, invoice.currency);
    }

    match to_fattura_xml(&invoice) {
        Ok(xml) => println!("\n{xml}"),
        Err(e) => eprintln!("XML generation failed: {e}"),
    }

    // Validation collects every problem, not just the first
    let result = InvoiceBuilder::new("", date)
        .sender(
            SenderBuilder::new(
                "Alpha SRL",
                TaxId::new("IT", "123"),
                AddressBuilder::new("Viale Roma 543", "7100", "Sassari", "IT").build(),
            )
            .build(),
        )
        .recipient(
            RecipientBuilder::person(
                "Mario",
                "Rossi",
                AddressBuilder::new("Via Verdi 12", "00100", "Roma", "IT").build(),
            )
            .build(),
        )
        .add_line(LineItemBuilder::new("Servizio", dec!(1), dec!(10)).build())
        .build();
    if let Err(e) = result {
        println!("\nRejected: {e}");
    }
}
