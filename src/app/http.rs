use crate::adapters::{FonnteProvider, WebhookProvider};
use crate::config::AppConfig;
use crate::core::notifier::OrderNotifier;
use crate::domain::model::{NotifyResponse, OrderPayload, ProviderKind, INVALID_ORDER_MESSAGE};
use crate::core::notifier::error_response;
use crate::domain::ports::MessageProvider;
use crate::utils::error::NotifyError;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use subtle::ConstantTimeEq;

pub const FONNTE_ROUTE: &str = "/api/send-whatsapp";
pub const WEBHOOK_ROUTE: &str = "/api/send-whatsapp-webhook";

const API_KEY_HEADER: &str = "x-api-key";

/// Lambda function URL / API Gateway 的 HTTP 事件 (v2，兼容 v1 欄位)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpRequest {
    pub request_context: Option<RequestContext>,
    pub raw_path: Option<String>,
    pub http_method: Option<String>,
    pub path: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub body: Option<String>,
    #[serde(deserialize_with = "null_as_false")]
    pub is_base64_encoded: bool,
}

fn null_as_false<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestContext {
    pub http: Option<HttpContext>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpContext {
    pub method: Option<String>,
    pub path: Option<String>,
}

impl HttpRequest {
    /// 判斷 Lambda 事件是 HTTP 事件還是直接呼叫的訂單
    pub fn is_http_event(event: &serde_json::Value) -> bool {
        event.get("requestContext").is_some() || event.get("httpMethod").is_some()
    }

    pub fn post(path: &str, body: impl Into<String>) -> Self {
        Self {
            http_method: Some("POST".to_string()),
            path: Some(path.to_string()),
            body: Some(body.into()),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn method(&self) -> String {
        self.request_context
            .as_ref()
            .and_then(|ctx| ctx.http.as_ref())
            .and_then(|http| http.method.clone())
            .or_else(|| self.http_method.clone())
            .unwrap_or_else(|| "POST".to_string())
            .to_ascii_uppercase()
    }

    pub fn path(&self) -> Option<&str> {
        self.request_context
            .as_ref()
            .and_then(|ctx| ctx.http.as_ref())
            .and_then(|http| http.path.as_deref())
            .or(self.raw_path.as_deref())
            .or(self.path.as_deref())
    }

    /// 標頭名稱不分大小寫
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.as_ref().and_then(|headers| {
            headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }

    fn decoded_body(&self) -> Option<Vec<u8>> {
        let body = self.body.as_ref()?;
        if self.is_base64_encoded {
            base64::engine::general_purpose::STANDARD
                .decode(body.trim())
                .ok()
        } else {
            Some(body.as_bytes().to_vec())
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl HttpResponse {
    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// 兩個端點共用的請求處理：CORS、方法、API key、路由到對應的發送服務
pub struct NotifyRouter {
    notifier: OrderNotifier,
    providers: HashMap<ProviderKind, Arc<dyn MessageProvider>>,
    api_key: Option<String>,
    allowed_origin: String,
    default_provider: ProviderKind,
}

impl NotifyRouter {
    pub fn new(notifier: OrderNotifier) -> Self {
        Self {
            notifier,
            providers: HashMap::new(),
            api_key: None,
            allowed_origin: "*".to_string(),
            default_provider: ProviderKind::Fonnte,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let notification = &config.notification;
        let mut router = Self::new(OrderNotifier::new(
            notification.admin_phone.clone(),
            notification.store_name.clone(),
        ))
        .with_api_key(notification.api_key.clone())
        .with_allowed_origin(notification.allowed_origin.clone())
        .with_default_provider(notification.default_provider);

        if let Some(fonnte) = FonnteProvider::from_config(&config.fonnte, config.timeout()) {
            router = router.with_provider(Arc::new(fonnte));
        }
        if let Some(webhook) = WebhookProvider::from_config(&config.webhook, config.timeout()) {
            router = router.with_provider(Arc::new(webhook));
        }

        tracing::info!("🔧 Notification router ready: {}", config.summary());
        router
    }

    pub fn with_provider(mut self, provider: Arc<dyn MessageProvider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_allowed_origin(mut self, origin: impl Into<String>) -> Self {
        self.allowed_origin = origin.into();
        self
    }

    pub fn with_default_provider(mut self, kind: ProviderKind) -> Self {
        self.default_provider = kind;
        self
    }

    pub fn notifier(&self) -> &OrderNotifier {
        &self.notifier
    }

    pub fn has_provider(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    /// 路徑對應的發送服務；事件沒有路徑時用預設值，"/" 不算
    pub fn route(&self, path: Option<&str>) -> Option<ProviderKind> {
        let Some(path) = path else {
            return Some(self.default_provider);
        };
        let path = path.trim_end_matches('/');
        if path.is_empty() {
            None
        } else if path.ends_with(WEBHOOK_ROUTE) {
            Some(ProviderKind::Webhook)
        } else if path.ends_with(FONNTE_ROUTE) {
            Some(ProviderKind::Fonnte)
        } else {
            None
        }
    }

    /// 原始 Lambda HTTP 事件；格式錯誤時仍回傳帶 CORS 的 500
    pub async fn handle_event(&self, event: serde_json::Value) -> HttpResponse {
        match serde_json::from_value::<HttpRequest>(event) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                let err = NotifyError::from(e);
                tracing::error!("❌ Malformed HTTP event: {}", err);
                self.to_http(error_response(&err))
            }
        }
    }

    pub async fn handle(&self, request: HttpRequest) -> HttpResponse {
        let method = request.method();
        let path = request.path().unwrap_or("/").to_string();
        tracing::info!("📨 {} {}", method, path);

        let response = self.process(&request, &method).await;
        if response.status_code >= 400 {
            tracing::warn!(
                "{} {} -> {} {}",
                method,
                path,
                response.status_code,
                response.body.error.as_deref().unwrap_or_default()
            );
        }
        self.to_http(response)
    }

    async fn process(&self, request: &HttpRequest, method: &str) -> NotifyResponse {
        if method == "OPTIONS" {
            return NotifyResponse::ok();
        }

        let Some(kind) = self.route(request.path()) else {
            return NotifyResponse::error(404, "Not found");
        };

        if method != "POST" {
            return NotifyResponse::error(405, "Method not allowed");
        }

        if !self.is_authorized(request) {
            return NotifyResponse::from_error(&NotifyError::Unauthorized);
        }

        let order = match request
            .decoded_body()
            .and_then(|bytes| serde_json::from_slice::<serde_json::Value>(&bytes).ok())
        {
            Some(value) => match OrderPayload::from_value(value) {
                Ok(order) => order,
                Err(e) => return NotifyResponse::from_error(&e),
            },
            None => return NotifyResponse::error(400, INVALID_ORDER_MESSAGE),
        };

        self.dispatch(kind, &order).await
    }

    fn is_authorized(&self, request: &HttpRequest) -> bool {
        let Some(expected) = &self.api_key else {
            return true;
        };
        let provided = request.header(API_KEY_HEADER).unwrap_or_default();
        // 固定時間比較
        expected.as_bytes().ct_eq(provided.as_bytes()).into()
    }

    /// Lambda 直接呼叫 (非 HTTP 事件)：整個事件就是訂單，用預設發送服務
    pub async fn handle_direct(&self, event: serde_json::Value) -> NotifyResponse {
        match OrderPayload::from_value(event) {
            Ok(order) => self.dispatch(self.default_provider, &order).await,
            Err(e) => NotifyResponse::from_error(&e),
        }
    }

    pub async fn dispatch(&self, kind: ProviderKind, order: &OrderPayload) -> NotifyResponse {
        match self.providers.get(&kind) {
            Some(provider) => self.notifier.notify(provider.as_ref(), order).await,
            None => NotifyResponse::error(
                500,
                format!("WhatsApp provider '{}' is not configured", kind),
            ),
        }
    }

    fn to_http(&self, response: NotifyResponse) -> HttpResponse {
        let mut headers = BTreeMap::new();
        headers.insert(
            "Access-Control-Allow-Origin".to_string(),
            self.allowed_origin.clone(),
        );
        headers.insert(
            "Access-Control-Allow-Methods".to_string(),
            "GET, POST, OPTIONS".to_string(),
        );
        headers.insert(
            "Access-Control-Allow-Headers".to_string(),
            "Content-Type, x-api-key".to_string(),
        );
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let (status_code, body) = match serde_json::to_string(&response.body) {
            Ok(body) => (response.status_code, body),
            Err(e) => (
                500,
                serde_json::json!({
                    "success": false,
                    "error": format!("Internal server error: {}", e)
                })
                .to_string(),
            ),
        };

        HttpResponse {
            status_code,
            headers,
            body,
            is_base64_encoded: false,
        }
    }
}
