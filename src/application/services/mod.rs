pub mod comment_service;

pub mod organisation_service;

pub mod payment_service;

pub mod project_service;

pub mod transfer_service;

pub mod user_service;
