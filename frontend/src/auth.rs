//! 认证模块
//!
//! - `AuthContext`: 全局认证状态，供路由守卫注入
//! - `AuthFlow`: 登录/注册页面的无界面控制器，可在原生测试中直接驱动

use crate::api::{ApiClient, BrowserApi};
use crate::forms::{FieldErrors, LoginForm, RegisterForm, check};
use crate::web::http::{FetchHttpClient, HttpClient};
use crate::web::storage::{BrowserStorage, KeyValueStore};
use leptos::logging::{error, log};
use leptos::prelude::*;

// =========================================================
// 全局认证上下文
// =========================================================

/// 认证上下文
///
/// 通过 Context 在组件间共享。`is_authenticated` 在启动时由会话中的 token 初始化。
#[derive(Clone, Copy)]
pub struct AuthContext {
    api: StoredValue<BrowserApi, LocalStorage>,
    is_authenticated: RwSignal<bool>,
}

impl AuthContext {
    pub fn new(api: BrowserApi) -> Self {
        let authenticated = api.session().is_authenticated();
        Self {
            api: StoredValue::new_local(api),
            is_authenticated: RwSignal::new(authenticated),
        }
    }

    pub fn api(&self) -> BrowserApi {
        self.api.get_value()
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        self.is_authenticated.into()
    }

    pub fn mark_authenticated(&self) {
        self.is_authenticated.set(true);
    }

    /// 清除 token；导航由路由服务监听认证状态自动处理
    pub fn logout(&self) {
        self.api.with_value(|api| api.session().clear_token());
        self.is_authenticated.set(false);
        log!("[Auth] 会话已结束");
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

// =========================================================
// 登录 / 注册控制器
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Success,
}

/// 一次提交的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 表单校验未通过，未发出请求
    Invalid,
    /// 已有请求在进行中
    Busy,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub mode: AuthMode,
    pub status: SubmitStatus,
    pub login: LoginForm,
    pub register: RegisterForm,
    pub field_errors: FieldErrors,
    pub error: Option<String>,
    pub show_login_password: bool,
    pub show_register_password: bool,
}

impl AuthState {
    pub fn is_submitting(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }

    pub fn field_error(&self, field: &str) -> Option<String> {
        self.field_errors.get(field).cloned()
    }
}

pub type BrowserAuthFlow = AuthFlow<FetchHttpClient, BrowserStorage>;

pub struct AuthFlow<C, S> {
    api: ApiClient<C, S>,
    state: ArcRwSignal<AuthState>,
}

impl<C, S> Clone for AuthFlow<C, S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
        }
    }
}

impl<C: HttpClient, S: KeyValueStore> AuthFlow<C, S> {
    pub fn new(api: ApiClient<C, S>) -> Self {
        Self {
            api,
            state: ArcRwSignal::new(AuthState::default()),
        }
    }

    pub fn state(&self) -> ArcRwSignal<AuthState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.get_untracked()
    }

    // --- 同步操作 ---

    pub fn update_login(&self, f: impl FnOnce(&mut LoginForm)) {
        self.state.update(|s| f(&mut s.login));
    }

    pub fn update_register(&self, f: impl FnOnce(&mut RegisterForm)) {
        self.state.update(|s| f(&mut s.register));
    }

    pub fn toggle_login_password(&self) {
        self.state
            .update(|s| s.show_login_password = !s.show_login_password);
    }

    pub fn toggle_register_password(&self) {
        self.state
            .update(|s| s.show_register_password = !s.show_register_password);
    }

    /// 切换登录/注册模式，清除错误并隐藏密码
    pub fn switch_mode(&self) {
        self.state.update(|s| {
            s.mode = match s.mode {
                AuthMode::Login => AuthMode::Register,
                AuthMode::Register => AuthMode::Login,
            };
            s.error = None;
            s.field_errors.clear();
            s.show_login_password = false;
            s.show_register_password = false;
        });
    }

    /// 校验通过则进入 Submitting 状态
    fn begin<F: validator::Validate>(&self, pick: impl Fn(&AuthState) -> &F) -> Option<SubmitOutcome> {
        let mut blocked = None;
        self.state.update(|s| {
            if s.is_submitting() {
                blocked = Some(SubmitOutcome::Busy);
                return;
            }
            match check(pick(s)) {
                Ok(()) => {
                    s.field_errors.clear();
                    s.error = None;
                    s.status = SubmitStatus::Submitting;
                }
                Err(errors) => {
                    s.field_errors = errors;
                    blocked = Some(SubmitOutcome::Invalid);
                }
            }
        });
        blocked
    }

    fn fail(&self, message: String) -> SubmitOutcome {
        self.state.update(|s| {
            s.status = SubmitStatus::Idle;
            s.error = Some(message);
        });
        SubmitOutcome::Failed
    }

    // --- 异步操作 ---

    /// 登录成功后持久化 token
    pub async fn submit_login(&self) -> SubmitOutcome {
        if let Some(outcome) = self.begin(|s| &s.login) {
            return outcome;
        }
        let credentials = self.state.with_untracked(|s| s.login.credentials());

        match self.api.login(&credentials).await {
            Ok(token) => {
                self.api.session().set_token(&token.access_token);
                self.state.update(|s| s.status = SubmitStatus::Success);
                log!("[Auth] 登录成功: {}", credentials.username);
                SubmitOutcome::Succeeded
            }
            Err(e) => {
                error!("[Auth] 登录失败: {}", e);
                self.fail(
                    e.detail()
                        .unwrap_or_else(|| "Error al iniciar sesión".to_string()),
                )
            }
        }
    }

    /// 注册成功后切回登录模式，并以注册邮箱预填用户名
    pub async fn submit_register(&self) -> SubmitOutcome {
        if let Some(outcome) = self.begin(|s| &s.register) {
            return outcome;
        }
        let user = self.state.with_untracked(|s| s.register.to_user());

        match self.api.register(&user).await {
            Ok(_) => {
                self.state.update(|s| {
                    s.status = SubmitStatus::Idle;
                    s.mode = AuthMode::Login;
                    s.login = LoginForm {
                        username: user.email.clone(),
                        password: String::new(),
                    };
                    s.register = RegisterForm::default();
                    s.show_login_password = false;
                    s.show_register_password = false;
                });
                log!("[Auth] 注册成功: {}", user.email);
                SubmitOutcome::Succeeded
            }
            Err(e) => {
                error!("[Auth] 注册失败: {}", e);
                self.fail(
                    e.detail()
                        .unwrap_or_else(|| "Error al registrar usuario".to_string()),
                )
            }
        }
    }
}
