//! Cookie module
//!
//! Read-only views over request/response cookies and the chained-HMAC
//! signing codec for tamper-evident cookie values.

mod record;
mod signing;
mod view;

pub use record::{parse_cookie_pair, parse_set_cookie, CookieRecord};
pub use signing::{sign, sign_cookie, verify, verify_cookie, CookieError, HashAlgorithm};
pub use view::{cookies_from_request, cookies_from_response, extract_from_header_list, lookup};
