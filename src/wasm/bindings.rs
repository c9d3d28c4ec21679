//! JavaScript bindings for the OT core

use crate::error::OtError;
use crate::ot::{apply, transform, Operation, StateId};
use wasm_bindgen::prelude::*;

/// Route Rust panics to the browser console
#[wasm_bindgen(js_name = initPanicHook)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js_error(err: OtError) -> JsValue {
    if !err.is_recoverable() {
        tracing::error!(%err, "malformed operation reached the OT core");
    }
    JsValue::from_str(&err.to_string())
}

/// JavaScript-friendly wrapper for Operation
#[wasm_bindgen]
pub struct WasmOperation {
    inner: Operation,
}

#[wasm_bindgen]
impl WasmOperation {
    /// Create an insert of `text` at `position`
    #[wasm_bindgen(js_name = insert)]
    pub fn insert(position: f64, text: String, state: String) -> WasmOperation {
        Self {
            inner: Operation::insert(position as i64, text, StateId::new(state)),
        }
    }

    /// Create a delete of `num` UTF-16 code units at `position`
    #[wasm_bindgen(js_name = delete)]
    pub fn delete(position: f64, num: f64, state: String) -> WasmOperation {
        Self {
            inner: Operation::delete(position as i64, num as usize, StateId::new(state)),
        }
    }

    /// Decode an operation sent by a peer
    #[wasm_bindgen(js_name = fromJSON)]
    pub fn from_json(json: &str) -> Result<WasmOperation, JsValue> {
        let inner = Operation::from_json(json).map_err(to_js_error)?;
        Ok(Self { inner })
    }

    /// Encode for sending to a peer
    #[wasm_bindgen(js_name = toJSON)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.inner.to_json().map_err(to_js_error)
    }

    /// "InsertOperation" or "DeleteOperation"
    #[wasm_bindgen(getter)]
    pub fn kind(&self) -> String {
        self.inner.kind().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn position(&self) -> f64 {
        self.inner.position() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.state().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn identity(&self) -> String {
        self.inner.identity().to_string()
    }
}

/// Apply an operation to a buffer; throws if it is out of bounds
#[wasm_bindgen(js_name = applyOperation)]
pub fn apply_operation(buffer: &str, op: &WasmOperation) -> Result<String, JsValue> {
    apply(buffer, &op.inner).map_err(to_js_error)
}

/// Rebase a client/server pair; returns `[client', server']`
#[wasm_bindgen(js_name = transformOperations)]
pub fn transform_operations(client: &WasmOperation, server: &WasmOperation) -> Vec<WasmOperation> {
    let (client, server) = transform(&client.inner, &server.inner);
    vec![
        WasmOperation { inner: client },
        WasmOperation { inner: server },
    ]
}

/// State token for a buffer
#[wasm_bindgen(js_name = stateOf)]
pub fn state_of(text: &str) -> String {
    StateId::of(text).to_string()
}
