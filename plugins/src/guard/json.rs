use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

/// Compact JSON whose numbers read the way ECMAScript's `Number#toString`
/// writes them: `1.0` as `1`, `1e21` as `1e+21`, `-0` as `0`.
pub(crate) fn to_string<T>(value: &T) -> Result<String, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    let mut out = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut out, EcmaNumbers);
    value.serialize(&mut ser)?;
    String::from_utf8(out).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

struct EcmaNumbers;

impl Formatter for EcmaNumbers {
    // serde_json writes non-finite floats as `null` before reaching here.
    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let value = if value == 0.0 { 0.0 } else { value };
        let mut buf = ryu_js::Buffer::new();
        writer.write_all(buf.format(value).as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_whole_floats_print_as_integers() {
        let v = json!({ "a": 1.0, "b": 1e3, "c": -2.0, "d": 123456789012.0 });
        assert_eq!(to_string(&v).unwrap(), r#"{"a":1,"b":1000,"c":-2,"d":123456789012}"#);
    }

    #[test]
    fn test_exponent_and_signed_zero() {
        let v = json!([1e21, -0.0, 0.5, 1.5e300]);
        assert_eq!(to_string(&v).unwrap(), "[1e+21,0,0.5,1.5e+300]");
    }

    #[test]
    fn test_integers_and_strings_unchanged() {
        let v = json!({
            "n": 42,
            "neg": -7,
            "s": "1.0",
            "nested": [{ "x": 9007199254740991_u64 }]
        });
        assert_eq!(to_string(&v).unwrap(), serde_json::to_string(&v).unwrap());
    }
}
