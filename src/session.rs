use axum::http::{header, HeaderMap, HeaderName};
use uuid::Uuid;

pub const COOKIE_NAME: &str = "tracker_session";

/// Session id from the request cookie. Values that are not UUIDs are ignored.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == COOKIE_NAME)
        .find_map(|(_, value)| Uuid::parse_str(value).ok())
}

pub fn session_cookie(id: Uuid) -> [(HeaderName, String); 1] {
    [(
        header::SET_COOKIE,
        format!("{COOKIE_NAME}={id}; Path=/; HttpOnly; SameSite=Lax"),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_cookie(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn reads_existing_cookie() {
        let headers =
            with_cookie("theme=dark; tracker_session=67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert_eq!(
            session_id(&headers),
            Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").ok()
        );
    }

    #[test]
    fn ignores_missing_or_malformed_cookie() {
        assert!(session_id(&HeaderMap::new()).is_none());
        assert!(session_id(&with_cookie("tracker_session=abc-123")).is_none());
        assert!(session_id(&with_cookie("tracker_session=")).is_none());
    }

    #[test]
    fn cookie_carries_the_id() {
        let id = Uuid::new_v4();
        let [(name, value)] = session_cookie(id);
        assert_eq!(name, header::SET_COOKIE);
        assert!(value.starts_with(&format!("tracker_session={id};")));
    }
}
