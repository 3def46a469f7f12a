//! Marketplace listing text for a stored product.

use crate::product::{format_price, ProductRecord};
use crate::taxonomy::{condition_label, is_new, size_label, status_label, Measurement};

const DEADSTOCK_PARAGRAPH: &str = "✨ Esta es una prenda deadstock, es decir, de colecciones pasadas que nunca llegó a venderse ni usarse y se encuentra nueva.\n";

const FOOTER: &str = "📸 Las primeras fotos están editadas por estética. Las tomadas en el suelo muestran el color real.

🤖 La prenda es real, la modelo que la posa no. La imagen fue creada con IA y es solo una referencia para que te inspires en como combinarla. Cada pieza tiene su propio fit y estilo único 💃
";

/// Whether the listing carries the deadstock paragraph: new garments, or
/// anything explicitly flagged as deadstock.
#[must_use]
pub fn is_deadstock_listing(record: &ProductRecord) -> bool {
    is_new(&record.status) || record.is_deadstock
}

/// Measurement lines, `"{label} {value}cm"`, in listing order. Absent and
/// zero measurements are left out.
#[must_use]
pub fn measurement_lines(record: &ProductRecord) -> Vec<String> {
    Measurement::DESCRIPTION_ORDER
        .into_iter()
        .filter_map(|kind| {
            record
                .measurements
                .get(kind)
                .filter(|value| !value.is_zero())
                .map(|value| format!("{} {value}cm", kind.label()))
        })
        .collect()
}

/// Builds the listing text posted to the marketplace.
#[must_use]
pub fn create_product_description(record: &ProductRecord) -> String {
    let status = status_label(&record.status);
    let size = size_label(&record.size);
    let price = format_price(record.price);
    let condition = condition_label(&record.condition);
    let measurements = measurement_lines(record).join("\n");

    let deadstock_section = if is_deadstock_listing(record) {
        format!("\n{DEADSTOCK_PARAGRAPH}")
    } else {
        String::new()
    };
    let details_section = match record.description.as_deref() {
        Some(details) if !details.is_empty() => format!("\n* {details}"),
        _ => String::new(),
    };

    format!(
        "🟢 DISPONIBLE - {name} - {status} - Talla {size}

Si te interesa envíanos un mensaje directo 😊

PRECIO: {price}

📏 Medidas

{measurements}

* {condition}
{deadstock_section}{details_section}

{FOOTER}",
        name = record.name,
    )
}
