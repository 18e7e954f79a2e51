//! Gemini response fixtures for integration tests.

#![allow(dead_code)]

use serde_json::json;
use wiremock::ResponseTemplate;

/// A successful generateContent response carrying one text part.
pub fn gemini_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": text }]
            },
            "finishReason": "STOP"
        }]
    }))
}

/// A fenced-python response, the shape the model is instructed to produce.
pub fn fenced_python_response(code: &str) -> ResponseTemplate {
    gemini_response(&format!("```python\n{code}\n```"))
}

/// An error response with the standard Gemini error envelope.
pub fn gemini_error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": {
            "code": status,
            "message": message,
            "status": "INVALID_ARGUMENT"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_python_response_wraps_code() {
        // Constructing the template must not panic on multi-line code.
        let _ = fenced_python_response("a = 1\nprint(a)");
    }

    #[test]
    fn test_gemini_error_builds() {
        let _ = gemini_error(401, "API key not valid");
    }
}
