//! Browser worker binding
//!
//! A JS `onmessage` handler forwards `JSON.stringify(event.data)` here and
//! posts every element of the returned array back to the page.

use wasm_bindgen::prelude::*;

use crate::dispatch::handle;
use crate::protocol::Reply;

/// Handle one `{type, data}` message; returns a JSON array of replies
#[wasm_bindgen(js_name = handleMessage)]
pub fn handle_message(message: &str) -> String {
    replies_json(&handle(message))
}

pub(crate) fn replies_json(replies: &[Reply]) -> String {
    serde_json::to_string(replies).unwrap_or_else(|e| {
        format!(
            r#"[{{"type":"error","error":"failed to encode replies: {}","code":"internal"}}]"#,
            e.to_string().replace('"', "'")
        )
    })
}
