use std::any::Any;

/// Best-effort extraction of the message carried by a panic payload.
pub fn panic_payload_to_str(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return message;
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.as_str();
    }
    "<non-string panic payload>"
}
