pub mod http;
pub mod schema;
