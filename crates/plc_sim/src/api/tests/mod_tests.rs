use super::*;

fn write_value(value: Value, source: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "writeValue",
        "params": { "value": value, "source": source },
        "id": 17
    })
}

#[test]
fn valid_write_is_recorded() {
    let mut register = Register::new([]);
    let response = register.handle(&write_value(json!(3), "Voz"));

    assert!(response.error.is_none());
    assert_eq!(response.id, Some(17));
    assert_eq!(
        response.result,
        Some(json!({ "written": 3, "source": "Voz" }))
    );
    let last = register.last().expect("written");
    assert_eq!(last.value.get(), 3);
    assert_eq!(last.source, ActivationSource::Voice);
    assert_eq!(last.request_id, Some(17));
    assert_eq!(register.writes(), 1);
}

#[test]
fn out_of_range_value_is_invalid_params() {
    let mut register = Register::new([]);
    let response = register.handle(&write_value(json!(7), "Manual"));

    let error = response.error.expect("error");
    assert_eq!(error.code, -32602);
    assert!(error.message.contains("outside the allowed range"));
    assert!(register.last().is_none());
}

#[test]
fn non_integer_value_is_invalid_params() {
    let mut register = Register::new([]);
    let response = register.handle(&write_value(json!("tres"), "Manual"));
    assert_eq!(response.error.expect("error").code, -32602);
}

#[test]
fn unknown_source_is_invalid_params() {
    let mut register = Register::new([]);
    let response = register.handle(&write_value(json!(2), "Teclado"));
    assert_eq!(response.error.expect("error").code, -32602);
}

#[test]
fn unknown_method_is_reported() {
    let mut register = Register::new([]);
    let response = register.handle(&json!({
        "jsonrpc": "2.0",
        "method": "readValue",
        "id": 1
    }));
    let error = response.error.expect("error");
    assert_eq!(error.code, -32601);
    assert_eq!(error.message, "Method not found: readValue");
}

#[test]
fn wrong_version_is_invalid_request() {
    let mut register = Register::new([]);
    let mut request = write_value(json!(1), "Manual");
    request["jsonrpc"] = json!("1.0");
    assert_eq!(register.handle(&request).error.expect("error").code, -32600);
}

#[test]
fn configured_values_are_rejected_with_server_error() {
    let mut register = Register::new([4]);
    let response = register.handle(&write_value(json!(4), "Aleatorio"));

    let error = response.error.expect("error");
    assert_eq!(error.code, REJECTED_VALUE_CODE);
    assert_eq!(error.message, "value 4 rejected by controller");
    assert_eq!(register.writes(), 0);
}
