pub mod http;

pub use http::{HttpRequest, HttpResponse, NotifyRouter};
