//! Request dispatch with session handling.

mod api_client;
mod interceptor;
mod request;

pub use api_client::ApiClient;
pub use request::ApiRequest;
