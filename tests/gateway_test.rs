use remote_function::{
    BoxError, BoxFuture, BufferSink, ErrorOutput, ErrorResponseMode, Function, GatewayConfig,
    GatewayHandler, GatewayRequest, GatewayResponse, HandlerError, JsonEventDecoder,
    JsonOutputEncoder, OutputEncoder, ResponseSink,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DoubleRequest {
    name: String,
    value: i64,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct DoubleResponse {
    name: String,
    doubled: i64,
}

struct DoubleFieldFunction {
    calls: Arc<AtomicUsize>,
}

impl Function for DoubleFieldFunction {
    type Input = DoubleRequest;
    type Output = DoubleResponse;

    fn execute(&self, input: DoubleRequest) -> BoxFuture<'_, Result<DoubleResponse, BoxError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            let doubled = input
                .value
                .checked_mul(2)
                .ok_or("value out of range")?;
            Ok(DoubleResponse {
                name: input.name,
                doubled,
            })
        })
    }
}

fn double_handler() -> (GatewayHandler<DoubleFieldFunction>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler = GatewayHandler::new(DoubleFieldFunction {
        calls: calls.clone(),
    });
    (handler, calls)
}

fn gateway_event(body: serde_json::Value, base64: bool) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "version": "2.0",
        "routeKey": "POST /double",
        "rawPath": "/double",
        "headers": {"content-type": "application/json"},
        "body": body,
        "isBase64Encoded": base64
    }))
    .unwrap()
}

#[derive(Default)]
struct CountingSink {
    writes: Vec<Vec<u8>>,
}

impl ResponseSink for CountingSink {
    fn write_and_finish(&mut self, buf: Vec<u8>) -> BoxFuture<'_, remote_function::Result<()>> {
        self.writes.push(buf);
        Box::pin(async { Ok(()) })
    }
}

async fn handle(handler: &GatewayHandler<DoubleFieldFunction>, event: &[u8]) -> Vec<u8> {
    let mut sink = CountingSink::default();
    handler.handle(event, &mut sink).await.unwrap();
    assert_eq!(sink.writes.len(), 1, "expected exactly one write");
    sink.writes.remove(0)
}

// ---------------------------------------------------------------------------
// Success path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_well_formed_request() {
    let (handler, calls) = double_handler();
    let event = gateway_event(json!(r#"{"name":"alice","value":21}"#), false);

    let response: GatewayResponse = serde_json::from_slice(&handle(&handler, &event).await).unwrap();

    assert_eq!(response.status_code, 200);
    assert!(!response.is_base64_encoded);
    assert!(response.headers.is_empty());
    let body: DoubleResponse = serde_json::from_str(&response.body).unwrap();
    assert_eq!(
        body,
        DoubleResponse {
            name: "alice".into(),
            doubled: 42
        }
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_response_wire_shape() {
    let (handler, _calls) = double_handler();
    let event = gateway_event(json!(r#"{"name":"bob","value":1}"#), false);

    let raw: serde_json::Value = serde_json::from_slice(&handle(&handler, &event).await).unwrap();
    assert_eq!(
        raw,
        json!({
            "statusCode": 200,
            "body": "{\"name\":\"bob\",\"doubled\":2}",
            "isBase64Encoded": false
        })
    );
}

#[tokio::test]
async fn test_base64_body() {
    let (handler, calls) = double_handler();
    let request = GatewayRequest::base64(r#"{"name":"carol","value":-4}"#);
    let event = serde_json::to_vec(&request).unwrap();

    let response: GatewayResponse = serde_json::from_slice(&handle(&handler, &event).await).unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, r#"{"name":"carol","doubled":-8}"#);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_idempotent_responses() {
    let (handler, _calls) = double_handler();
    let event = gateway_event(json!(r#"{"name":"dave","value":5}"#), false);

    let first = handle(&handler, &event).await;
    let second = handle(&handler, &event).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_respond_returns_envelope_bytes() {
    let (handler, _calls) = double_handler();
    let event = gateway_event(json!(r#"{"name":"erin","value":0}"#), false);

    let bytes = handler.respond(&event).await.unwrap();
    assert_eq!(bytes, handle(&handler, &event).await);
}

// ---------------------------------------------------------------------------
// Error envelope (reference behaviour)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_null_body_is_no_request_body() {
    let (handler, calls) = double_handler();
    let event = gateway_event(serde_json::Value::Null, false);

    let raw = handle(&handler, &event).await;
    assert_eq!(
        String::from_utf8(raw.clone()).unwrap(),
        "{\n  \"error\": \"no request body\"\n}"
    );
    let envelope: ErrorOutput = serde_json::from_slice(&raw).unwrap();
    assert_eq!(envelope.error, HandlerError::NoRequestBody.to_string());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_body_is_no_request_body() {
    let (handler, calls) = double_handler();

    let envelope: ErrorOutput =
        serde_json::from_slice(&handle(&handler, br#"{"isBase64Encoded":false}"#).await).unwrap();
    assert_eq!(envelope.error, "no request body");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_base64_is_invalid_request_body() {
    let (handler, calls) = double_handler();
    let event = gateway_event(json!("this is *not* base64!"), true);

    let envelope: ErrorOutput = serde_json::from_slice(&handle(&handler, &event).await).unwrap();
    assert!(
        envelope.error.starts_with("invalid request body"),
        "unexpected {}",
        envelope.error
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unparseable_request_is_decode_error() {
    let (handler, calls) = double_handler();

    let envelope: ErrorOutput = serde_json::from_slice(&handle(&handler, b"<xml/>").await).unwrap();
    assert!(envelope.error.starts_with("decode error"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_body_of_wrong_shape_is_decode_error() {
    let (handler, calls) = double_handler();
    let event = gateway_event(json!(r#"{"name":"alice"}"#), false);

    let envelope: ErrorOutput = serde_json::from_slice(&handle(&handler, &event).await).unwrap();
    assert!(envelope.error.starts_with("decode error"));
    assert!(envelope.error.contains("value"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_function_error_is_enveloped() {
    let (handler, calls) = double_handler();
    let event = gateway_event(json!(format!(r#"{{"name":"big","value":{}}}"#, i64::MAX)), false);

    let envelope: ErrorOutput = serde_json::from_slice(&handle(&handler, &event).await).unwrap();
    assert_eq!(envelope.error, "function error: value out of range");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_compact_error_envelope() {
    let (handler, _calls) = double_handler();
    let handler = handler.with_config(GatewayConfig::new().pretty_errors(false));

    let raw = handle(&handler, &gateway_event(serde_json::Value::Null, false)).await;
    assert_eq!(raw, br#"{"error":"no request body"}"#);
}

#[tokio::test]
async fn test_sink_failure_is_returned() {
    let (handler, _calls) = double_handler();
    let mut sink = BufferSink::new();
    sink.write_and_finish(Vec::new()).await.unwrap();

    let err = handler
        .handle(&gateway_event(serde_json::Value::Null, false), &mut sink)
        .await
        .unwrap_err();
    assert!(matches!(err, HandlerError::Sink(_)));
}

// ---------------------------------------------------------------------------
// Error envelope wrapped in a gateway response
// ---------------------------------------------------------------------------

fn gateway_mode(handler: GatewayHandler<DoubleFieldFunction>) -> GatewayHandler<DoubleFieldFunction> {
    handler.with_config(GatewayConfig::new().error_response(ErrorResponseMode::Gateway))
}

#[tokio::test]
async fn test_gateway_mode_bad_request() {
    let (handler, _calls) = double_handler();
    let handler = gateway_mode(handler);

    let response: GatewayResponse =
        serde_json::from_slice(&handle(&handler, &gateway_event(serde_json::Value::Null, false)).await)
            .unwrap();

    assert_eq!(response.status_code, 400);
    assert_eq!(response.headers["content-type"], "application/json");
    let envelope: ErrorOutput = serde_json::from_str(&response.body).unwrap();
    assert_eq!(envelope.error, "no request body");
}

#[tokio::test]
async fn test_gateway_mode_function_failure() {
    let (handler, _calls) = double_handler();
    let handler = gateway_mode(handler);
    let event = gateway_event(json!(format!(r#"{{"name":"big","value":{}}}"#, i64::MIN)), false);

    let response: GatewayResponse = serde_json::from_slice(&handle(&handler, &event).await).unwrap();
    assert_eq!(response.status_code, 500);
    assert!(response.body.contains("value out of range"));
}

#[tokio::test]
async fn test_gateway_mode_success_unchanged() {
    let (handler, _calls) = double_handler();
    let handler = gateway_mode(handler);
    let event = gateway_event(json!(r#"{"name":"frank","value":3}"#), false);

    let response: GatewayResponse = serde_json::from_slice(&handle(&handler, &event).await).unwrap();
    assert_eq!(response, GatewayResponse::ok(r#"{"name":"frank","doubled":6}"#));
}

#[test]
fn test_gateway_mode_is_configured() {
    let (handler, _calls) = double_handler();
    assert_eq!(handler.config().error_response, ErrorResponseMode::Bare);

    let handler = gateway_mode(handler);
    assert_eq!(handler.config().error_response, ErrorResponseMode::Gateway);
    assert!(handler.config().pretty_errors);
}

struct RejectingEncoder;

impl OutputEncoder for RejectingEncoder {
    fn encode<T: Serialize + ?Sized>(
        &self,
        _value: &T,
        _buf: &mut Vec<u8>,
    ) -> remote_function::Result<()> {
        Err(HandlerError::Encode("unsupported".to_string()))
    }
}

#[tokio::test]
async fn test_gateway_mode_response_encoder_failure_still_writes() {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler = GatewayHandler::with_codecs(
        DoubleFieldFunction {
            calls: calls.clone(),
        },
        RejectingEncoder,
        JsonEventDecoder,
        JsonOutputEncoder::new(),
        JsonEventDecoder,
    )
    .with_config(GatewayConfig::new().error_response(ErrorResponseMode::Gateway));

    let mut sink = CountingSink::default();
    let event = gateway_event(json!(r#"{"name":"gina","value":1}"#), false);
    handler.handle(&event, &mut sink).await.unwrap();

    assert_eq!(sink.writes.len(), 1);
    let envelope: ErrorOutput = serde_json::from_slice(&sink.writes[0]).unwrap();
    assert_eq!(envelope.error, "encode error: unsupported");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
