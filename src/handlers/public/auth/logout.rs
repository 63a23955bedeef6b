use axum::response::Redirect;
use tower_cookies::Cookies;

use crate::middleware::end_session;

/// GET /logout
pub async fn logout(cookies: Cookies) -> Redirect {
    end_session(&cookies);
    Redirect::to("/")
}
