/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 7/9/24
******************************************************************************/

pub(crate) const AUTHORIZATION_HEADER_KEY: &str = "Authorization";
pub(crate) const BEARER_PREFIX: &str = "Bearer ";

pub(crate) const LOGIN_ENDPOINT: &str = "/user/login";
pub(crate) const REGISTER_ENDPOINT: &str = "/user/create";
pub(crate) const REFRESH_ENDPOINT: &str = "/user/refresh";
pub(crate) const LOGOUT_ENDPOINT: &str = "/user/logout";

/// Keys of the persisted session mirror.
pub(crate) const MIRROR_USER_KEY: &str = "user";
pub(crate) const MIRROR_TOKEN_KEY: &str = "token";

pub(crate) const DEFAULT_ERROR_MESSAGE: &str = "unknown error";

pub(crate) const DEFAULT_PAGE_LIMIT: u32 = 50;
