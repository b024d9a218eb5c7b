//! EduWeb 管理前端
//!
//! 分层：
//! - `web`: 浏览器能力封装（HTTP、LocalStorage、History 路由）
//! - `session` / `interceptor` / `api`: 会话存储、鉴权拦截与 API 网关
//! - `forms` / `auth` / `dashboard`: 表单校验与无界面控制器，可在原生测试中驱动
//! - `components`: UI 组件层

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod interceptor;
pub mod session;

mod components {
    pub mod dashboard;
    mod icons;
    pub mod login;
}

pub(crate) mod web {
    pub mod http;
    pub mod route;
    pub mod router;
    pub mod storage;
}

use crate::api::BrowserApi;
use crate::auth::AuthContext;
use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;
use crate::config::AppConfig;
use leptos::prelude::*;
use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 认证状态由会话中已保存的 token 初始化
    let auth_ctx = AuthContext::new(BrowserApi::browser(AppConfig::from_build_env()));
    provide_context(auth_ctx);

    view! {
        <Router is_authenticated=auth_ctx.is_authenticated_signal()>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
