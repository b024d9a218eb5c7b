//! 管理面板页面
//!
//! 页面只做渲染与事件转发，业务逻辑全部在 `crate::dashboard` 控制器中。

mod contenidos;
mod ejercicios;
mod materias;
mod unidades;

use crate::auth::use_auth;
use crate::components::icons::{GraduationCap, LogOut};
use crate::config::NOTICE_TIMEOUT_MS;
use crate::dashboard::{BrowserDashboard, ConfirmFn, DashboardController, DashboardState};
use contenidos::{ContenidosPanel, TemaDetalleModal};
use ejercicios::EjerciciosPanel;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use materias::MateriasPanel;
use std::future::Future;
use std::rc::Rc;
use unidades::UnidadesPanel;

// =========================================================
// 控制器句柄
// =========================================================

/// 面板子组件共享的控制器句柄
#[derive(Clone, Copy)]
pub(crate) struct DashboardHandle {
    ctrl: StoredValue<BrowserDashboard, LocalStorage>,
    state: RwSignal<DashboardState>,
}

impl DashboardHandle {
    fn new(ctrl: BrowserDashboard) -> Self {
        let state = RwSignal::from(ctrl.state());
        Self {
            ctrl: StoredValue::new_local(ctrl),
            state,
        }
    }

    pub fn state(&self) -> RwSignal<DashboardState> {
        self.state
    }

    /// 同步操作
    pub fn with<R>(&self, f: impl FnOnce(&BrowserDashboard) -> R) -> R {
        self.ctrl.with_value(f)
    }

    /// 异步操作：克隆控制器后交给 `spawn_local`
    pub fn spawn<F, Fut>(&self, f: F)
    where
        F: FnOnce(BrowserDashboard) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        spawn_local(f(self.ctrl.get_value()));
    }
}

pub(crate) fn use_dashboard() -> DashboardHandle {
    use_context::<DashboardHandle>().expect("DashboardHandle should be provided")
}

/// 浏览器原生确认框；无法弹出时视为取消
fn browser_confirm() -> ConfirmFn {
    Rc::new(|message: &str| {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    })
}

// =========================================================
// 表单辅助
// =========================================================

/// 带标签与错误提示的表单项
pub(crate) fn form_field(
    label: &'static str,
    error: impl Fn() -> Option<String> + Send + Sync + 'static,
    input: impl IntoView,
) -> impl IntoView {
    view! {
        <label class="form-control w-full">
            <div class="label">
                <span class="label-text">{label}</span>
            </div>
            {input}
            {move || error().map(|msg| view! { <span class="text-error text-xs mt-1">{msg}</span> })}
        </label>
    }
}

/// 数字输入框的值；无法解析时为 0，由表单校验拦截
pub(crate) fn parse_number(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

// =========================================================
// 页面
// =========================================================

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let dashboard = DashboardHandle::new(DashboardController::new(auth.api(), browser_confirm()));
    provide_context(dashboard);
    let state = dashboard.state();

    // 初始加载
    dashboard.spawn(|c| async move { c.load_materias().await });
    dashboard.spawn(|c| async move { c.load_estadisticas().await });

    // 通知 3 秒后自动消失
    let notice_id = Memo::new(move |_| state.with(|s| s.notice.as_ref().map(|n| n.id)));
    Effect::new(move |_| {
        if let Some(id) = notice_id.get() {
            let ctrl = dashboard.with(Clone::clone);
            spawn_local(async move {
                TimeoutFuture::new(NOTICE_TIMEOUT_MS).await;
                ctrl.dismiss_notice(id);
            });
        }
    });

    let on_logout = move |_| auth.logout();

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-6">
                <NoticeToast />

                // 顶栏
                <div class="navbar bg-base-100 rounded-box shadow-sm">
                    <div class="flex-1 gap-2">
                        <GraduationCap attr:class="h-6 w-6 text-primary" />
                        <span class="text-xl font-bold">"EduWeb"</span>
                        <span class="text-base-content/60 hidden md:inline">
                            "Panel de administración"
                        </span>
                    </div>
                    <div class="flex-none">
                        <button class="btn btn-ghost btn-sm" on:click=on_logout>
                            <LogOut attr:class="h-4 w-4" />
                            "Cerrar sesión"
                        </button>
                    </div>
                </div>

                <StatsBar />

                <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                    <MateriasPanel />
                    <UnidadesPanel />
                    <ContenidosPanel />
                </div>

                <EjerciciosPanel />
            </div>

            <TemaDetalleModal />
        </div>
    }
}

#[component]
fn NoticeToast() -> impl IntoView {
    let dashboard = use_dashboard();
    let state = dashboard.state();

    move || {
        state.with(|s| s.notice.clone()).map(|notice| {
            let class = if notice.is_error {
                "alert alert-error shadow-lg"
            } else {
                "alert alert-success shadow-lg"
            };
            let id = notice.id;
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=class>
                        <span>{notice.message}</span>
                        <button
                            class="btn btn-ghost btn-xs"
                            on:click=move |_| dashboard.with(|c| c.dismiss_notice(id))
                        >
                            "✕"
                        </button>
                    </div>
                </div>
            }
        })
    }
}

/// 统计栏；统计接口不可用时整体隐藏
#[component]
fn StatsBar() -> impl IntoView {
    let state = use_dashboard().state();

    move || {
        state.with(|s| s.estadisticas.clone()).map(|stats| {
            let items = [
                ("Usuarios", stats.total_usuarios),
                ("Administradores", stats.total_admins),
                ("Materias", stats.total_materias),
                ("Unidades", stats.total_unidades),
                ("Contenidos", stats.total_contenidos),
                ("Ejercicios", stats.total_ejercicios),
            ];
            view! {
                <div class="stats stats-vertical md:stats-horizontal shadow w-full bg-base-100">
                    {items
                        .into_iter()
                        .map(|(title, value)| {
                            view! {
                                <div class="stat">
                                    <div class="stat-title">{title}</div>
                                    <div class="stat-value text-primary">{value}</div>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            }
        })
    }
}
