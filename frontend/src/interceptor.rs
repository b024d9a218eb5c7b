use crate::session::SessionStore;
use crate::web::http::HttpRequest;
use crate::web::storage::KeyValueStore;
use eduweb_shared::HEADER_AUTHORIZATION;

/// 为请求附加 `Authorization: Bearer <token>`
///
/// 没有 token 时请求原样返回，不发送空的 Bearer 头。
pub fn authorize(request: HttpRequest, token: Option<&str>) -> HttpRequest {
    match token.filter(|t| !t.is_empty()) {
        Some(token) => request.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token)),
        None => request,
    }
}

/// 认证拦截器
///
/// 每次请求时重新读取 token，登录/登出后立即生效。
pub struct AuthInterceptor<S> {
    session: SessionStore<S>,
}

impl<S> Clone for AuthInterceptor<S> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
        }
    }
}

impl<S: KeyValueStore> AuthInterceptor<S> {
    pub fn new(session: SessionStore<S>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn intercept(&self, request: HttpRequest) -> HttpRequest {
        authorize(request, self.session.token().as_deref())
    }
}
