use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use order_notify::utils::{logger, validation::Validate};
use order_notify::{AppConfig, HttpRequest, NotifyRouter};
use serde_json::Value;

async fn function_handler(router: &NotifyRouter, event: LambdaEvent<Value>) -> Result<Value, Error> {
    let (payload, context) = event.into_parts();
    tracing::info!("Handling request {}", context.request_id);

    // function URL / API Gateway 事件回傳 HTTP 格式，直接呼叫則回傳 JSON 信封
    if HttpRequest::is_http_event(&payload) {
        let response = router.handle_event(payload).await;
        Ok(serde_json::to_value(response)?)
    } else {
        let response = router.handle_direct(payload).await;
        Ok(serde_json::to_value(response.body)?)
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = AppConfig::from_env()?;
    config.validate()?;

    let router = NotifyRouter::from_config(&config);
    let router = &router;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        function_handler(router, event).await
    }))
    .await
}
