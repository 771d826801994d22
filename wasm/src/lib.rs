use pocsag_core::{BaudRate, DecodedMessage, Decoder, Encoder, FunctionCode, Message, ModemConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct JsMessage<'a> {
    address: u32,
    function: u8,
    message: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
}

impl<'a> From<&'a DecodedMessage> for JsMessage<'a> {
    fn from(message: &'a DecodedMessage) -> Self {
        Self {
            address: message.address,
            function: message.function.as_u8(),
            message: &message.text,
            kind: if message.is_numeric { "numeric" } else { "alphanumeric" },
        }
    }
}

fn modem_config(baud: u32) -> Result<ModemConfig, String> {
    BaudRate::try_from(baud)
        .map(ModemConfig::with_baud_rate)
        .map_err(|e| e.to_string())
}

fn encode_page(encoder: &Encoder, address: u32, text: &str, function: u8) -> Result<Vec<u8>, String> {
    let function = FunctionCode::try_from(function).map_err(|e| e.to_string())?;
    encoder
        .encode(&[Message::new(address, text, function)])
        .map_err(|e| e.to_string())
}

fn decode_to_json(decoder: &Decoder, wav: &[u8]) -> Result<String, String> {
    let messages = decoder.decode(wav).map_err(|e| e.to_string())?;
    let entries: Vec<JsMessage> = messages.iter().map(JsMessage::from).collect();
    serde_json::to_string(&entries).map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub struct WasmEncoder {
    inner: Encoder,
}

#[wasm_bindgen]
impl WasmEncoder {
    #[wasm_bindgen(constructor)]
    pub fn new(baud: u32) -> Result<WasmEncoder, JsValue> {
        modem_config(baud)
            .map(|config| WasmEncoder { inner: Encoder::new(config) })
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Encode one page and return a complete WAV file as a Uint8Array
    #[wasm_bindgen]
    pub fn encode(&self, address: u32, text: &str, function: u8) -> Result<Vec<u8>, JsValue> {
        encode_page(&self.inner, address, text, function).map_err(|e| JsValue::from_str(&e))
    }
}

#[wasm_bindgen]
pub struct WasmDecoder {
    inner: Decoder,
}

#[wasm_bindgen]
impl WasmDecoder {
    #[wasm_bindgen(constructor)]
    pub fn new(baud: u32) -> Result<WasmDecoder, JsValue> {
        modem_config(baud)
            .map(|config| WasmDecoder { inner: Decoder::new(config) })
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Decode a WAV file; returns a JSON array of
    /// `{address, function, message, type}` objects
    #[wasm_bindgen]
    pub fn decode(&self, wav: &[u8]) -> Result<String, JsValue> {
        decode_to_json(&self.inner, wav).map_err(|e| JsValue::from_str(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_json() {
        let config = modem_config(2400).unwrap();
        let wav = encode_page(&Encoder::new(config), 123456, "from the browser", 3).unwrap();
        let json = decode_to_json(&Decoder::new(config), &wav).unwrap();

        assert_eq!(
            json,
            r#"[{"address":123456,"function":3,"message":"from the browser","type":"alphanumeric"}]"#
        );
    }

    #[test]
    fn test_invalid_inputs_reported() {
        assert!(modem_config(300).unwrap_err().contains("unsupported baud rate"));
        let encoder = Encoder::new(ModemConfig::default());
        assert!(encode_page(&encoder, 8, "x", 2).unwrap_err().contains("tone-only"));
        assert!(decode_to_json(&Decoder::default(), &[0u8; 10]).unwrap_err().contains("too short"));
    }
}
