pub mod logger;

pub mod storage_url;
