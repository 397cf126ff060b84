pub mod headers;

pub mod http_client;

pub mod request;

pub mod response;
