/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 3/9/24
******************************************************************************/

//! Client library for the investment platform REST API.
//!
//! The [`transport::http_client::ApiClient`] attaches the current access token to every
//! outbound call and, on a first `401`, refreshes it through `/user/refresh` before resending
//! the request once. A failed refresh clears the [`session::store::SessionStore`].

pub mod config;

pub mod constants;

pub mod error;

pub mod application;

pub mod presentation;

pub mod session;

pub mod transport;

pub mod utils;
