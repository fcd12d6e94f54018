//! Canonical serializer - turns a key value into the string a cache indexes by.
//!
//! The output is deterministic for a given value, but it is not an
//! order-independent canonical form: record fields are written in insertion
//! order, so two records with the same fields built in a different order can
//! produce different keys.

use std::fmt::Write;

use super::Value;

/// Serialize a value into its canonical key string.
pub fn serialize(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

/// Append the canonical key of `value` to `out`.
///
/// Nested records and sequences are written into the same buffer.
pub fn write_canonical(value: &Value, out: &mut String) {
    match value {
        // Quoted verbatim; embedded quotes are not escaped.
        Value::String(s) => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
        Value::Number(n) => write_number(*n, out),
        Value::Record(fields) => {
            out.push('{');
            for (i, (name, field)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('"');
                out.push_str(name);
                out.push_str("\":");
                write_canonical(field, out);
            }
            out.push('}');
        }
        Value::Sequence(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Null => out.push_str("null"),
        Value::Undefined => out.push_str("undefined"),
        Value::Opaque(text) => out.push_str(text),
    }
}

fn write_number(n: f64, out: &mut String) {
    if n.is_nan() {
        out.push_str("NaN");
    } else if n.is_infinite() {
        out.push_str(if n > 0.0 { "Infinity" } else { "-Infinity" });
    } else if n == 0.0 {
        // -0 prints as 0
        out.push('0');
    } else {
        // f64 Display is shortest round-trip and drops a zero fraction.
        let _ = write!(out, "{n}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_record() {
        let value = Value::record([("a", 1), ("b", 2)]);
        assert_eq!(serialize(&value), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn test_serialize_sequence() {
        assert_eq!(serialize(&Value::from(vec![1, 2, 3])), "[1,2,3]");
        assert_eq!(serialize(&Value::Sequence(vec![])), "[]");
    }

    #[test]
    fn test_serialize_string() {
        assert_eq!(serialize(&Value::from("x")), r#""x""#);
        assert_eq!(serialize(&Value::from("")), r#""""#);
    }

    #[test]
    fn test_serialize_string_does_not_escape_quotes() {
        assert_eq!(serialize(&Value::from(r#"a"b"#)), r#""a"b""#);
    }

    #[test]
    fn test_serialize_numbers() {
        assert_eq!(serialize(&Value::from(42)), "42");
        assert_eq!(serialize(&Value::from(-7)), "-7");
        assert_eq!(serialize(&Value::from(1.5)), "1.5");
        assert_eq!(serialize(&Value::from(0.1)), "0.1");
        assert_eq!(serialize(&Value::from(-0.0)), "0");
        assert_eq!(serialize(&Value::from(f64::NAN)), "NaN");
        assert_eq!(serialize(&Value::from(f64::INFINITY)), "Infinity");
        assert_eq!(serialize(&Value::from(f64::NEG_INFINITY)), "-Infinity");
    }

    #[test]
    fn test_serialize_fallbacks() {
        assert_eq!(serialize(&Value::from(true)), "true");
        assert_eq!(serialize(&Value::from(false)), "false");
        assert_eq!(serialize(&Value::Null), "null");
        assert_eq!(serialize(&Value::Undefined), "undefined");
        assert_eq!(
            serialize(&Value::opaque("Mon Jan 01 2024")),
            "Mon Jan 01 2024"
        );
    }

    #[test]
    fn test_serialize_nested() {
        let value = Value::record([
            ("name", Value::from("n")),
            (
                "tags",
                Value::Sequence(vec![Value::from("a"), Value::record([("x", Value::Null)])]),
            ),
        ]);
        assert_eq!(serialize(&value), r#"{"name":"n","tags":["a",{"x":null}]}"#);
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let value = Value::record([("a", Value::from(vec![1, 2])), ("b", Value::from("c"))]);
        assert_eq!(serialize(&value), serialize(&value.clone()));
    }

    #[test]
    fn test_field_order_is_not_normalized() {
        let ab = Value::record([("a", 1), ("b", 2)]);
        let ba = Value::record([("b", 2), ("a", 1)]);
        // Structurally equal records may map to different keys.
        assert_ne!(serialize(&ab), serialize(&ba));
        assert_eq!(serialize(&ba), r#"{"b":2,"a":1}"#);
    }

    #[test]
    fn test_write_canonical_appends() {
        let mut buf = String::from("prefix:");
        write_canonical(&Value::from(vec![true]), &mut buf);
        assert_eq!(buf, "prefix:[true]");
    }
}
