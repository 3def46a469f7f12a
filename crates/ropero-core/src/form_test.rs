use serde_json::json;

use super::*;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn valid_form() -> ProductForm {
    serde_json::from_value(json!({
        "name": "Camisa de lino",
        "status": "used",
        "price": "25",
        "condition": "good",
        "size": "m",
        "type": "shirt",
        "size_shoulder": "42",
        "size_chest": 50,
        "size_waist": "",
        "size_length": null
    }))
    .expect("form should deserialize")
}

#[test]
fn valid_form_produces_typed_input() {
    let input = valid_form().validate().expect("form should be valid");
    assert_eq!(input.name, "Camisa de lino");
    assert_eq!(input.status, ProductStatus::Used);
    assert_eq!(input.condition, ProductCondition::Good);
    assert_eq!(input.size, ProductSize::M);
    assert_eq!(input.clothing_type, ClothingType::Shirt);
    assert_eq!(input.price, dec("25"));
    assert_eq!(input.measurements.shoulder, Some(dec("42")));
    assert_eq!(input.measurements.chest, Some(dec("50")));
    assert_eq!(input.measurements.length, None);
    assert!(!input.is_deadstock);
}

#[test]
fn details_alias_is_accepted() {
    let form: ProductForm = serde_json::from_value(json!({
        "name": "Vestido largo",
        "details": "  Tejido fluido  "
    }))
    .unwrap();
    assert_eq!(form.description.as_deref(), Some("  Tejido fluido  "));
}

#[test]
fn blank_description_becomes_none() {
    let mut form = valid_form();
    form.description = Some("   ".to_string());
    let input = form.validate().unwrap();
    assert!(input.description.is_none());
}

#[test]
fn short_name_is_rejected() {
    let mut form = valid_form();
    form.name = "Top".to_string();
    let err = form.validate().unwrap_err();
    assert!(err.has_field("name"));
    assert_eq!(err.fields.len(), 1);
}

#[test]
fn name_length_counts_characters_not_bytes() {
    let mut form = valid_form();
    form.name = "Añoñé".to_string();
    assert!(form.validate().is_ok());
}

#[test]
fn all_invalid_fields_are_reported() {
    let form = ProductForm {
        name: "abc".to_string(),
        status: "vintage".to_string(),
        price: Some(FormValue::from("0")),
        condition: String::new(),
        size: "huge".to_string(),
        clothing_type: "poncho".to_string(),
        ..ProductForm::default()
    };
    let err = form.validate().unwrap_err();
    for field in ["name", "status", "price", "condition", "size", "type"] {
        assert!(err.has_field(field), "expected error for {field}");
    }
}

#[test]
fn price_must_be_positive_number() {
    for bad in [json!("abc"), json!(""), json!(-3), json!(0)] {
        let mut form = valid_form();
        form.price = serde_json::from_value(bad.clone()).unwrap();
        let err = form.validate().unwrap_err();
        assert!(err.has_field("price"), "price {bad} should be rejected");
    }

    let mut form = valid_form();
    form.price = None;
    assert!(form.validate().unwrap_err().has_field("price"));
}

#[test]
fn price_accepts_decimal_number() {
    let mut form = valid_form();
    form.price = serde_json::from_value(json!(19.9)).unwrap();
    assert_eq!(form.validate().unwrap().price, dec("19.9"));
}

#[test]
fn negative_or_garbage_measurement_is_rejected() {
    let mut form = valid_form();
    form.size_chest = Some(FormValue::from("-2"));
    form.size_length = Some(FormValue::from("long"));
    let err = form.validate().unwrap_err();
    assert!(err.has_field("size_chest"));
    assert!(err.has_field("size_length"));
}

#[test]
fn oversized_measurement_is_rejected_before_doubling() {
    let mut form = valid_form();
    form.size_chest = Some(FormValue::from("50000000000000000000000000000"));
    let err = form.validate().unwrap_err();
    assert!(err.has_field("size_chest"));

    form.size_chest = Some(FormValue::from("1000"));
    let input = form.validate().expect("1000 cm is within range");
    let doubled = crate::transform::transform_before_write(&input);
    assert_eq!(doubled.measurements.chest, Some(dec("2000")));
}

#[test]
fn oversized_price_is_rejected() {
    let mut form = valid_form();
    form.price = serde_json::from_value(json!("79228162514264337593543950335")).unwrap();
    let err = form.validate().unwrap_err();
    assert!(err.has_field("price"));
    assert_eq!(err.fields.iter().filter(|f| f.field == "price").count(), 1);
}

#[test]
fn measurements_outside_type_are_dropped() {
    let mut form = valid_form();
    form.size_waist = Some(FormValue::from("40"));
    form.size_leg = Some(FormValue::from("80"));
    let input = form.validate().unwrap();
    assert_eq!(input.measurements.waist, None);
    assert_eq!(input.measurements.leg, None);
    assert_eq!(input.measurements.chest, Some(dec("50")));
}

#[test]
fn bodysuit_keeps_no_measurements() {
    let mut form = valid_form();
    form.clothing_type = "bodysuit".to_string();
    let input = form.validate().unwrap();
    assert!(input.measurements.is_empty());
}

#[test]
fn name_change_infers_type_and_clears_measurements() {
    let mut state = FormState::default();
    state.measurement_changed(Measurement::Chest, Some(dec("50")));

    state.name_changed("Pantalón de pinzas");
    assert_eq!(state.clothing_type, ClothingType::Pant);
    assert!(state.measurements.is_empty());
}

#[test]
fn name_change_without_match_keeps_type() {
    let mut state = FormState::default();
    state.type_changed(ClothingType::Dress);
    state.measurement_changed(Measurement::Hip, Some(dec("45")));

    state.name_changed("Pieza única");
    assert_eq!(state.clothing_type, ClothingType::Dress);
    assert_eq!(state.measurements.hip, Some(dec("45")));
}

#[test]
fn same_type_does_not_clear_measurements() {
    let mut state = FormState::default();
    state.measurement_changed(Measurement::Chest, Some(dec("50")));

    state.name_changed("Camisa oversize");
    assert_eq!(state.clothing_type, ClothingType::Shirt);
    assert_eq!(state.measurements.chest, Some(dec("50")));
}

#[test]
fn explicit_type_overrides_inferred_type() {
    let mut state = FormState::default();
    state.name_changed("Set de falda y top");
    assert_eq!(state.clothing_type, ClothingType::Top);

    state.type_changed(ClothingType::Set);
    assert_eq!(state.clothing_type, ClothingType::Set);
    assert_eq!(state.name, "Set de falda y top");
}
