use chrono::NaiveDate;
use fattura::xml::{RootElement, WriteOptions, to_xml_string};
use fattura::*;
use rust_decimal_macros::dec;

fn main() {
    // Key order is document order; a list repeats its key once per item
    let mapping = field_map! {
        "DatiGeneraliDocumento" => field_map! {
            "TipoDocumento" => "TD01",
            "Divisa" => "EUR",
            "Data" => NaiveDate::from_ymd_opt(2017, 1, 18).unwrap(),
            "Numero" => "123",
            "Causale" => vec!["PRIMA RIGA DI CAUSALE", "SECONDA RIGA DI CAUSALE"],
        },
        "DettaglioLinee" => vec![
            field_map! { "NumeroLinea" => 1, "Descrizione" => "Consulenza", "PrezzoTotale" => dec!(150.00) },
            field_map! { "NumeroLinea" => 2, "Descrizione" => "Trasferta", "PrezzoTotale" => dec!(42.50) },
        ],
        "DatiRicezione" => field_map! {},
    };

    let nodes = match convert(&mapping) {
        Ok(nodes) => nodes,
        Err(e) => {
            eprintln!("conversion failed: {e}");
            return;
        }
    };
    println!("{} top-level elements", nodes.len());
    for node in &nodes {
        println!("  <{}> leaf={}", node.tag, node.is_leaf());
    }

    let root = RootElement::new("Documento").append(nodes);
    match to_xml_string(&root, &WriteOptions::default()) {
        Ok(xml) => println!("\n{xml}"),
        Err(e) => eprintln!("write failed: {e}"),
    }

    // A null anywhere fails the whole call
    let broken = field_map! {
        "Sede" => field_map! { "Indirizzo" => "Via Roma", "Provincia" => FieldValue::Null },
    };
    if let Err(e) = convert(&broken) {
        println!("rejected: {e}");
    }
}
