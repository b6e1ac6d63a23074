use std::{convert::Infallible, sync::Arc};

use warp::{
    reject::{self, Rejection},
    Filter,
};

use crate::{constants::SESSION_COOKIE, filter::RecipeFilter};

use super::{
    jwt::{verify_jwt_session, SessionData},
    permissions::Viewer,
};

#[derive(Debug)]
struct Unauthorized;

impl reject::Reject for Unauthorized {}

/// Requires a valid session cookie.
pub fn with_session(
    secret: Arc<String>,
) -> impl Filter<Extract = (SessionData,), Error = Rejection> + Clone {
    warp::cookie::<String>(SESSION_COOKIE).and_then(move |session: String| {
        let secret = secret.clone();
        async move {
            verify_jwt_session(&session, &secret).map_err(|_| warp::reject::custom(Unauthorized))
        }
    })
}

/// Resolves the acting user, falling back to anonymous when the cookie is
/// missing or invalid.
pub fn with_viewer(secret: Arc<String>) -> impl Filter<Extract = (Viewer,), Error = Infallible> + Clone {
    warp::cookie::optional::<String>(SESSION_COOKIE).map(move |session: Option<String>| {
        session
            .and_then(|token| verify_jwt_session(&token, &secret).ok())
            .map(|session| session.viewer())
            .unwrap_or(Viewer::Anonymous)
    })
}

pub fn with_recipe_filter() -> impl Filter<Extract = (RecipeFilter,), Error = Rejection> + Clone {
    warp::query::<Vec<(String, String)>>()
        .map(|pairs: Vec<(String, String)>| RecipeFilter::from_pairs(pairs))
}

#[cfg(test)]
mod tests {
    use crate::{jwt::generate_jwt_session, schema::User};

    use super::*;

    fn token() -> String {
        let user = User {
            id: 12,
            email: String::from("chef@example.com"),
            username: String::from("chef"),
            first_name: String::from("Chef"),
            last_name: String::from("Example"),
            password: String::new(),
        };
        generate_jwt_session(&user, "secret").unwrap()
    }

    #[tokio::test]
    async fn resolves_viewer_from_cookie() {
        let filter = with_viewer(Arc::new(String::from("secret")));

        let viewer = warp::test::request()
            .header("cookie", format!("session={}", token()))
            .filter(&filter)
            .await
            .unwrap();
        assert_eq!(viewer, Viewer::User(12));

        let viewer = warp::test::request().filter(&filter).await.unwrap();
        assert_eq!(viewer, Viewer::Anonymous);

        let viewer = warp::test::request()
            .header("cookie", "session=forged")
            .filter(&filter)
            .await
            .unwrap();
        assert_eq!(viewer, Viewer::Anonymous);
    }

    #[tokio::test]
    async fn session_is_required() {
        let filter = with_session(Arc::new(String::from("secret")));

        assert!(warp::test::request().filter(&filter).await.is_err());

        let session = warp::test::request()
            .header("cookie", format!("session={}", token()))
            .filter(&filter)
            .await
            .unwrap();
        assert_eq!(session.user_id, 12);
    }

    #[tokio::test]
    async fn parses_recipe_filter_from_query() {
        let filter = warp::test::request()
            .path("/recipes?tags=breakfast&tags=dinner&is_favorited=1")
            .filter(&with_recipe_filter())
            .await
            .unwrap();

        assert_eq!(filter.tags, vec!["breakfast", "dinner"]);
        assert_eq!(filter.is_favorited, Some(1));
    }
}
