use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fattura::fatturapa::*;
use fattura::xml::{RootElement, WriteOptions, parse_document, to_xml_string};
use fattura::{FieldMap, convert, field_map};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn line_map(n: usize) -> FieldMap {
    field_map! {
        "NumeroLinea" => n as i64,
        "Descrizione" => format!("Articolo {n}"),
        "Quantita" => dec!(2.00),
        "PrezzoUnitario" => dec!(12.50),
        "PrezzoTotale" => dec!(25.00),
        "AliquotaIVA" => dec!(22.00),
    }
}

fn body_with_lines(count: usize) -> FieldMap {
    let lines: Vec<FieldMap> = (1..=count).map(line_map).collect();
    field_map! {
        "DatiBeniServizi" => field_map! { "DettaglioLinee" => lines },
    }
}

fn build_invoice(lines: usize) -> Invoice {
    let sender = SenderBuilder::new(
        "Alpha SRL",
        TaxId::new("IT", "01234567890"),
        AddressBuilder::new("Viale Roma 543", "07100", "Sassari", "IT")
            .province("SS")
            .build(),
    )
    .build();
    let recipient = RecipientBuilder::company(
        "Beta SPA",
        AddressBuilder::new("Corso Buenos Aires", "20124", "Milano", "IT").build(),
    )
    .vat_id(TaxId::new("IT", "09876543210"))
    .build();

    let mut builder = InvoiceBuilder::new("2024/001", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        .progressive("00001")
        .recipient_code("ABC1234")
        .sender(sender)
        .recipient(recipient);
    for i in 0..lines {
        let rate = if i % 3 == 0 { dec!(10) } else { dec!(22) };
        builder = builder.add_line(
            LineItemBuilder::new(format!("Articolo {i}"), Decimal::from(i as i64 + 1), dec!(9.99))
                .vat_rate(rate)
                .build(),
        );
    }
    builder.build().unwrap()
}

fn bench_convert(c: &mut Criterion) {
    let small = body_with_lines(10);
    let large = body_with_lines(1000);
    c.bench_function("convert_10_lines", |b| {
        b.iter(|| black_box(convert(black_box(&small))));
    });
    c.bench_function("convert_1000_lines", |b| {
        b.iter(|| black_box(convert(black_box(&large))));
    });
}

fn bench_write_and_parse(c: &mut Criterion) {
    let nodes = convert(&body_with_lines(1000)).unwrap();
    let root = RootElement::new("FatturaElettronicaBody").append(nodes);
    let options = WriteOptions::default();
    c.bench_function("write_1000_lines", |b| {
        b.iter(|| black_box(to_xml_string(black_box(&root), &options)));
    });

    let xml = to_xml_string(&root, &options).unwrap();
    c.bench_function("parse_1000_lines", |b| {
        b.iter(|| black_box(parse_document(black_box(&xml))));
    });
}

fn bench_fattura(c: &mut Criterion) {
    c.bench_function("build_invoice_100_lines", |b| {
        b.iter(|| black_box(build_invoice(100)));
    });

    let invoice = build_invoice(100);
    c.bench_function("fattura_xml_100_lines", |b| {
        b.iter(|| black_box(to_fattura_xml(black_box(&invoice))));
    });
}

criterion_group!(benches, bench_convert, bench_write_and_parse, bench_fattura);
criterion_main!(benches);
