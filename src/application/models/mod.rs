pub mod comment;

pub mod organisation;

pub mod payment;

pub mod project;

pub mod transaction;

pub mod user;
