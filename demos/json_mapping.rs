use fattura::xml::{WriteOptions, nodes_to_xml_string};
use fattura::{convert, field_map_from_json};
use serde_json::json;

fn main() {
    let input = json!({
        "CedentePrestatore": {
            "DatiAnagrafici": {
                "IdFiscaleIVA": { "IdPaese": "IT", "IdCodice": "01234567890" },
                "Anagrafica": { "Denominazione": "Alpha SRL" },
                "RegimeFiscale": "RF01"
            },
            "Sede": {
                "Indirizzo": "Viale Roma 543",
                "CAP": "07100",
                "Comune": "Sassari",
                "Provincia": "SS",
                "Nazione": "IT"
            }
        },
        "Causale": ["PRIMA RIGA", "SECONDA RIGA"]
    });

    let map = match field_map_from_json(input) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("invalid input: {e}");
            return;
        }
    };

    match convert(&map).and_then(|nodes| nodes_to_xml_string(&nodes, &WriteOptions::default())) {
        Ok(xml) => println!("{xml}"),
        Err(e) => eprintln!("conversion failed: {e}"),
    }

    // Booleans have no canonical text form
    if let Err(e) = field_map_from_json(json!({ "Flag": true })) {
        println!("rejected: {e}");
    }
}
